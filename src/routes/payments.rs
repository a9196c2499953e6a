use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::NaiveDate;

use crate::{
    dto::payments::{
        ConfirmPaymentResponse, CreateIntentRequest, CreateIntentResponse, CreatePaymentRequest,
        PaymentList, PaymentReport,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Payment,
    response::ApiResponse,
    routes::params::Pagination,
    services::payment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_payment).get(list_payments))
        .route("/stripe/create-intent", post(create_intent))
        .route("/stripe/confirm/{intent_id}", post(confirm_payment))
        .route("/{menu_date}/", get(payments_by_menu_date))
}

#[utoipa::path(
    post,
    path = "/api/payments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 200, description = "Payment recorded", body = ApiResponse<Payment>),
        (status = 400, description = "Invalid amount or method"),
        (status = 403, description = "Staff only")
    ),
    tag = "Payments"
)]
pub async fn create_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePaymentRequest>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    let resp = payment_service::create_payment(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/payments",
    params(Pagination),
    responses((status = 200, description = "Payments, newest first", body = ApiResponse<PaymentList>)),
    tag = "Payments"
)]
pub async fn list_payments(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<PaymentList>>> {
    let resp = payment_service::list_payments(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/payments/stripe/create-intent",
    request_body = CreateIntentRequest,
    responses(
        (status = 200, description = "Intent created", body = ApiResponse<CreateIntentResponse>),
        (status = 400, description = "Order already paid, cancelled, or refused by the processor"),
        (status = 404, description = "Order not found")
    ),
    tag = "Payments"
)]
pub async fn create_intent(
    State(state): State<AppState>,
    Json(payload): Json<CreateIntentRequest>,
) -> AppResult<Json<ApiResponse<CreateIntentResponse>>> {
    let resp = payment_service::create_intent(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/payments/stripe/confirm/{intent_id}",
    params(("intent_id" = String, Path, description = "Processor intent id")),
    responses(
        (status = 200, description = "Payment reconciled", body = ApiResponse<ConfirmPaymentResponse>),
        (status = 404, description = "No payment for this intent"),
        (status = 400, description = "Processor rejected the request")
    ),
    tag = "Payments"
)]
pub async fn confirm_payment(
    State(state): State<AppState>,
    Path(intent_id): Path<String>,
) -> AppResult<Json<ApiResponse<ConfirmPaymentResponse>>> {
    let resp = payment_service::confirm_payment(&state, &intent_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/payments/{menu_date}/",
    params(("menu_date" = String, Path, description = "YYYY-MM-DD")),
    responses(
        (status = 200, description = "Payments joined with their orders", body = ApiResponse<PaymentReport>),
        (status = 403, description = "Staff only")
    ),
    tag = "Payments"
)]
pub async fn payments_by_menu_date(
    State(state): State<AppState>,
    user: AuthUser,
    Path(menu_date): Path<NaiveDate>,
) -> AppResult<Json<ApiResponse<PaymentReport>>> {
    let resp = payment_service::payments_by_menu_date(&state, &user, menu_date).await?;
    Ok(Json(resp))
}
