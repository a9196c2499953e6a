use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Inquiry;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInquiryRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub event_date: String,
    pub event_type: String,
    pub guest_count: i32,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InquiryStatusUpdate {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct InquiryList {
    #[schema(value_type = Vec<Inquiry>)]
    pub items: Vec<Inquiry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EventTypeCount {
    #[serde(rename = "type")]
    pub event_type: String,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InquiryStats {
    pub total_inquiries: u64,
    pub pending_inquiries: u64,
    pub confirmed_inquiries: u64,
    pub conversion_rate: f64,
    pub event_types: Vec<EventTypeCount>,
}
