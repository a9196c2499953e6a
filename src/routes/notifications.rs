use axum::{Json, Router, extract::State, routing::post};

use crate::{
    error::AppResult,
    middleware::auth::AuthUser,
    notify::{EmailMessage, SmsMessage},
    response::ApiResponse,
    services::notification_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/send-email", post(send_email))
        .route("/send-sms", post(send_sms))
}

#[utoipa::path(
    post,
    path = "/api/notifications/send-email",
    request_body = EmailMessage,
    responses(
        (status = 200, description = "Email queued"),
        (status = 400, description = "Invalid address or attachment")
    ),
    tag = "Notifications"
)]
pub async fn send_email(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<EmailMessage>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = notification_service::send_email(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/notifications/send-sms",
    request_body = SmsMessage,
    responses(
        (status = 200, description = "SMS queued"),
        (status = 400, description = "Invalid phone number")
    ),
    tag = "Notifications"
)]
pub async fn send_sms(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SmsMessage>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = notification_service::send_sms(&state, &user, payload).await?;
    Ok(Json(resp))
}
