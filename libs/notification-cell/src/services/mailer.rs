use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, error, info};

use shared_config::AppConfig;

/// Outbound notification capability consumed by the booking flow.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()>;
}

/// Delivers mail through an HTTP mail API (JSON POST with a bearer key).
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.mail_api_url.clone(),
            api_key: config.mail_api_key.clone(),
            from: config.mail_from.clone(),
        }
    }
}

#[async_trait]
impl Notifier for HttpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        debug!("Sending email to {} via {}", to, self.api_url);

        let payload = json!({
            "from": self.from,
            "to": [to],
            "subject": subject,
            "html": html_body,
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Mail API error ({}): {}", status, error_text);
            return Err(anyhow!("mail API error ({}): {}", status, error_text));
        }

        info!("Email sent to {}", to);
        Ok(())
    }
}

/// Development fallback when no mail transport is configured: logs the
/// message envelope and delivers nothing.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to: &str, subject: &str, _html_body: &str) -> Result<()> {
        info!("=== EMAIL (development mode) ===");
        info!("To: {}", to);
        info!("Subject: {}", subject);
        info!("================================");
        Ok(())
    }
}

pub fn notifier_from_config(config: &AppConfig) -> Arc<dyn Notifier> {
    if config.is_mailer_configured() {
        Arc::new(HttpMailer::new(config))
    } else {
        Arc::new(LogNotifier)
    }
}
