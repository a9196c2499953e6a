//! Outbound client for the card processor.
//!
//! Services only see [`PaymentProcessor`]; [`StripeClient`] talks to the Stripe
//! REST API and tests substitute an in-memory implementation.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::error::AppError;

pub const STRIPE_GATEWAY: &str = "stripe";

#[derive(Debug, Error)]
pub enum ProcessorError {
    /// The processor answered but refused the request.
    #[error("{0}")]
    Rejected(String),

    #[error("processor unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("processor is not configured")]
    NotConfigured,
}

impl From<ProcessorError> for AppError {
    fn from(err: ProcessorError) -> Self {
        AppError::Gateway(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIntent {
    /// Amount in minor units.
    pub amount: i64,
    pub currency: String,
    pub order_id: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
    pub status: String,
    pub amount: i64,
    pub currency: String,
    /// Message of the last failed charge attempt, when the processor reports one.
    pub last_error: Option<String>,
    /// The processor's response body, kept verbatim for auditing.
    pub raw: Value,
}

#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn create_intent(&self, request: CreateIntent) -> Result<PaymentIntent, ProcessorError>;

    async fn retrieve_intent(&self, intent_id: &str) -> Result<PaymentIntent, ProcessorError>;
}

#[derive(Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    api_base: String,
    secret_key: String,
}

#[derive(Deserialize)]
struct StripeIntent {
    id: String,
    client_secret: Option<String>,
    status: String,
    #[serde(default)]
    amount: i64,
    #[serde(default)]
    currency: String,
    last_payment_error: Option<StripeErrorDetail>,
}

#[derive(Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

#[derive(Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

impl StripeClient {
    pub fn new(api_base: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        }
    }

    fn ensure_configured(&self) -> Result<(), ProcessorError> {
        if self.secret_key.is_empty() {
            return Err(ProcessorError::NotConfigured);
        }
        Ok(())
    }

    async fn parse(response: reqwest::Response) -> Result<PaymentIntent, ProcessorError> {
        let status = response.status();
        let body: Value = response.json().await?;

        if !status.is_success() {
            let message = serde_json::from_value::<StripeErrorBody>(body)
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or_else(|| format!("processor returned {status}"));
            return Err(ProcessorError::Rejected(message));
        }

        let intent: StripeIntent = serde_json::from_value(body.clone())
            .map_err(|e| ProcessorError::Rejected(format!("unexpected intent payload: {e}")))?;

        Ok(PaymentIntent {
            id: intent.id,
            client_secret: intent.client_secret,
            status: intent.status,
            amount: intent.amount,
            currency: intent.currency,
            last_error: intent.last_payment_error.and_then(|e| e.message),
            raw: body,
        })
    }
}

#[async_trait]
impl PaymentProcessor for StripeClient {
    async fn create_intent(&self, request: CreateIntent) -> Result<PaymentIntent, ProcessorError> {
        self.ensure_configured()?;
        let form = [
            ("amount", request.amount.to_string()),
            ("currency", request.currency.to_lowercase()),
            ("metadata[order_id]", request.order_id.to_string()),
        ];

        tracing::debug!(
            order_id = request.order_id,
            amount = request.amount,
            currency = %request.currency,
            "creating payment intent"
        );

        let response = self
            .http
            .post(format!("{}/v1/payment_intents", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await?;

        Self::parse(response).await
    }

    async fn retrieve_intent(&self, intent_id: &str) -> Result<PaymentIntent, ProcessorError> {
        self.ensure_configured()?;
        let response = self
            .http
            .get(format!("{}/v1/payment_intents/{intent_id}", self.api_base))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        Self::parse(response).await
    }
}
