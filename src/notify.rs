//! Fire-and-forget email/SMS side effects.

use std::sync::Arc;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::error::AppError;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("attachment {0} is not valid base64")]
    InvalidAttachment(String),
}

impl From<NotifyError> for AppError {
    fn from(err: NotifyError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmailAttachment {
    pub filename: String,
    /// Base64 encoded file content.
    pub content: String,
    #[serde(rename = "type", default = "default_attachment_type")]
    pub content_type: String,
}

fn default_attachment_type() -> String {
    "application/pdf".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    #[serde(default)]
    pub attachments: Vec<EmailAttachment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SmsMessage {
    pub to: String,
    pub message: String,
}

impl EmailMessage {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            html: html.into(),
            attachments: Vec::new(),
        }
    }

    /// Decode every attachment, failing on the first one that is not base64.
    pub fn decoded_attachments(&self) -> Result<Vec<(String, Vec<u8>)>, NotifyError> {
        self.attachments
            .iter()
            .map(|a| {
                STANDARD
                    .decode(a.content.trim())
                    .map(|bytes| (a.filename.clone(), bytes))
                    .map_err(|_| NotifyError::InvalidAttachment(a.filename.clone()))
            })
            .collect()
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_email(&self, message: EmailMessage) -> Result<(), NotifyError>;

    async fn send_sms(&self, message: SmsMessage) -> Result<(), NotifyError>;
}

/// Records outgoing messages in the log instead of delivering them.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_email(&self, message: EmailMessage) -> Result<(), NotifyError> {
        let attachments = message.decoded_attachments()?;
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            attachments = attachments.len(),
            bytes = attachments.iter().map(|(_, b)| b.len()).sum::<usize>(),
            "email queued"
        );
        Ok(())
    }

    async fn send_sms(&self, message: SmsMessage) -> Result<(), NotifyError> {
        tracing::info!(to = %message.to, chars = message.message.len(), "sms queued");
        Ok(())
    }
}

/// Send an email in the background; failures are logged and dropped.
pub fn dispatch_email(notifier: Arc<dyn Notifier>, message: EmailMessage) {
    tokio::spawn(async move {
        let to = message.to.clone();
        if let Err(err) = notifier.send_email(message).await {
            tracing::warn!(error = %err, to = %to, "email notification failed");
        }
    });
}

/// Send an SMS in the background; failures are logged and dropped.
pub fn dispatch_sms(notifier: Arc<dyn Notifier>, message: SmsMessage) {
    tokio::spawn(async move {
        let to = message.to.clone();
        if let Err(err) = notifier.send_sms(message).await {
            tracing::warn!(error = %err, to = %to, "sms notification failed");
        }
    });
}
