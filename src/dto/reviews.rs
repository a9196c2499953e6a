use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Review;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    pub name: String,
    pub email: String,
    pub rating: i32,
    pub review_text: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ReviewList {
    #[schema(value_type = Vec<Review>)]
    pub items: Vec<Review>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewStats {
    pub total_reviews: u64,
    pub approved_reviews: u64,
    pub pending_reviews: u64,
    pub average_rating: f64,
}
