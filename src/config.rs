use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_expire_minutes: i64,
    pub stripe_secret_key: String,
    pub stripe_api_base: String,
    pub payment_currency: String,
    pub confirmation_ttl_hours: i64,
    pub public_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let jwt_expire_minutes = env::var("JWT_EXPIRE_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(30);
        let stripe_secret_key = env::var("STRIPE_SECRET_KEY").unwrap_or_default();
        if stripe_secret_key.is_empty() {
            tracing::warn!("STRIPE_SECRET_KEY is not set; payment intents will be rejected");
        }
        let stripe_api_base = env::var("STRIPE_API_BASE")
            .unwrap_or_else(|_| "https://api.stripe.com".to_string());
        let payment_currency = env::var("PAYMENT_CURRENCY")
            .map(|c| c.to_lowercase())
            .unwrap_or_else(|_| "gbp".to_string());
        let confirmation_ttl_hours = env::var("CONFIRMATION_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(24);
        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000/".to_string());

        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            jwt_expire_minutes,
            stripe_secret_key,
            stripe_api_base,
            payment_currency,
            confirmation_ttl_hours,
            public_base_url,
        })
    }

    /// Configuration for tests and tools that never read the environment.
    pub fn for_database(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            host: "127.0.0.1".into(),
            port: 3000,
            jwt_secret: "test-secret".into(),
            jwt_expire_minutes: 30,
            stripe_secret_key: String::new(),
            stripe_api_base: "https://api.stripe.com".into(),
            payment_currency: "gbp".into(),
            confirmation_ttl_hours: 24,
            public_base_url: "http://localhost:3000/".into(),
        }
    }
}
