use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    domain::{OrderStatus, PaymentStatus},
    models::{Order, OrderLine},
};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub menu_id: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    #[schema(value_type = Object)]
    pub customer_address: Value,
    pub customer_email: Option<String>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub items: Vec<OrderLine>,
    pub total: Decimal,
    pub payment_method: Option<String>,
    pub special_instructions: Option<String>,
}

/// Fields a caterer may change on an existing order.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub special_instructions: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderUpdateResponse {
    pub order_id: i32,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
}

/// One entry of a batch update: the target order plus the same fields as [`OrderUpdate`].
#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderBatchEntry {
    pub order_id: i32,
    #[serde(flatten)]
    pub changes: OrderUpdate,
}

/// Outcome for one order in a batch; a failed entry carries the error instead of statuses.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderBatchResult {
    pub order_id: i32,
    pub success: bool,
    pub message: String,
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct OrderBatchResults {
    #[schema(value_type = Vec<OrderBatchResult>)]
    pub items: Vec<OrderBatchResult>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MenuDateQuery {
    pub menu_date: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct OrderList {
    #[schema(value_type = Vec<Order>)]
    pub items: Vec<Order>,
}
