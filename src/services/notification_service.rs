use crate::{
    domain::validation,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    notify::{EmailMessage, SmsMessage, dispatch_email, dispatch_sms},
    response::ApiResponse,
    state::AppState,
};

pub async fn send_email(
    state: &AppState,
    user: &AuthUser,
    mut payload: EmailMessage,
) -> AppResult<ApiResponse<serde_json::Value>> {
    payload.to = validation::normalize_email(&payload.to)?;
    if payload.subject.trim().is_empty() {
        return Err(AppError::BadRequest("Subject cannot be empty".into()));
    }
    // reject bad attachments now, before the background task owns the message
    payload.decoded_attachments()?;

    tracing::debug!(
        requested_by = user.user_id,
        to = %payload.to,
        attachments = payload.attachments.len(),
        "queueing email"
    );
    dispatch_email(state.notifier.clone(), payload);

    Ok(ApiResponse::message_only("Email is being sent"))
}

pub async fn send_sms(
    state: &AppState,
    user: &AuthUser,
    payload: SmsMessage,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let to = validation::phone_number(&payload.to)?;
    if payload.message.trim().is_empty() {
        return Err(AppError::BadRequest("Message cannot be empty".into()));
    }

    tracing::debug!(requested_by = user.user_id, to = %to, "queueing sms");
    dispatch_sms(
        state.notifier.clone(),
        SmsMessage {
            to,
            message: payload.message,
        },
    );

    Ok(ApiResponse::message_only("SMS is being sent"))
}
