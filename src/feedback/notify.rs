use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

/// Outbound notification side channel for new feedback. Implementations must
/// be safe to call from a detached task; failures are the caller's to log,
/// never to propagate into the request that triggered them.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn feedback_received(&self, from: &str, message: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Serialize)]
struct FeedbackEvent<'a> {
    event: &'static str,
    from: &'a str,
    message: &'a str,
}

/// POSTs a small JSON event to a configured webhook.
pub struct WebhookNotifier {
    http: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: String) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("build webhook http client")?;
        Ok(Self { http, url })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn feedback_received(&self, from: &str, message: &str) -> anyhow::Result<()> {
        let resp = self
            .http
            .post(&self.url)
            .json(&FeedbackEvent {
                event: "feedback_received",
                from,
                message,
            })
            .send()
            .await
            .context("send feedback webhook")?;
        resp.error_for_status().context("feedback webhook status")?;
        debug!(%from, "feedback notification delivered");
        Ok(())
    }
}

/// Used when no webhook is configured.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn feedback_received(&self, from: &str, _message: &str) -> anyhow::Result<()> {
        warn!(%from, "feedback received but no notification webhook configured");
        Ok(())
    }
}
