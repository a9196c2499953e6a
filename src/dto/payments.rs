use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::PaymentStatus,
    models::{Payment, PaymentWithOrder},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    pub payment_method: String,
    pub amount: Decimal,
    pub currency: Option<String>,
    pub order_id: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateIntentRequest {
    pub order_id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateIntentResponse {
    pub client_secret: String,
    pub payment_id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConfirmPaymentResponse {
    /// Status reported by the processor.
    pub status: String,
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct PaymentList {
    #[schema(value_type = Vec<Payment>)]
    pub items: Vec<Payment>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct PaymentReport {
    #[schema(value_type = Vec<PaymentWithOrder>)]
    pub items: Vec<PaymentWithOrder>,
}
