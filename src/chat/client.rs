use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tracing::{debug, error};

use crate::chat::dto::{GenerateRequest, GenerateResponse, UpstreamErrorBody};
use crate::config::ChatConfig;

/// Narrow seam to the generative-language vendor: the rest of the system
/// only ever sees prompt-in, text-out.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(cfg: &ChatConfig) -> anyhow::Result<Self> {
        // The vendor gives no latency bound, so the client enforces one.
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build chat http client")?;
        Ok(Self {
            http,
            api_url: cfg.api_url.clone(),
            api_key: cfg.api_key.clone(),
        })
    }
}

#[async_trait]
impl ChatClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        let resp = self
            .http
            .post(&self.api_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&GenerateRequest::from_prompt(prompt))
            .send()
            .await
            .context("chat api request")?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp
                .json::<UpstreamErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error)
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Unknown error".into());
            error!(%status, %detail, "chat api error");
            anyhow::bail!("{detail}");
        }

        let body: GenerateResponse = resp.json().await.context("decode chat api response")?;
        let reply = body
            .first_text()
            .unwrap_or("Unexpected API response format.")
            .to_string();
        debug!(reply_len = reply.len(), "chat reply received");
        Ok(reply)
    }
}
