use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    /// Base URL under which uploaded objects are publicly reachable,
    /// e.g. `https://cdn.example.com/portfolio-assets`.
    pub public_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    pub api_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub chat: ChatConfig,
    /// Optional webhook hit when new feedback arrives. Absent disables
    /// the notification side channel.
    pub feedback_webhook_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "portfolio".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "portfolio-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24),
        };
        let storage = StorageConfig {
            endpoint: std::env::var("S3_ENDPOINT")?,
            bucket: std::env::var("S3_BUCKET")?,
            access_key: std::env::var("S3_ACCESS_KEY")?,
            secret_key: std::env::var("S3_SECRET_KEY")?,
            region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into()),
            public_base_url: std::env::var("S3_PUBLIC_BASE_URL")?,
        };
        let chat = ChatConfig {
            api_url: std::env::var("CHAT_API_URL").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-pro:generateContent"
                    .into()
            }),
            api_key: std::env::var("CHAT_API_KEY")?,
            timeout_secs: std::env::var("CHAT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        };
        let feedback_webhook_url = std::env::var("FEEDBACK_WEBHOOK_URL").ok();
        Ok(Self {
            database_url,
            jwt,
            storage,
            chat,
            feedback_webhook_url,
        })
    }
}
