//! Payment service health poller

use super::Poller;
use crate::config::PaymentConfig;
use crate::error::Result;
use crate::messages::{AppEvent, PaymentHealth};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HealthServices {
    walletrpc: bool,
    sqlite: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HealthBody {
    status: u16,
    services: HealthServices,
}

/// Combine the HTTP status with the health document
pub fn parse_health(http_status: u16, body: &str) -> PaymentHealth {
    let parsed: HealthBody = serde_json::from_str(body).unwrap_or_default();
    PaymentHealth {
        status: if parsed.status != 0 {
            parsed.status
        } else {
            http_status
        },
        walletrpc: parsed.services.walletrpc,
        sqlite: parsed.services.sqlite,
    }
}

/// Display text for a health report
pub fn describe(health: &PaymentHealth) -> &'static str {
    match health.status {
        200 => "ready",
        503 => "degraded",
        _ => "dead",
    }
}

pub struct PaymentPoller {
    client: Client,
    url: String,
    interval: Duration,
}

impl PaymentPoller {
    pub fn new(config: &PaymentConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            url: format!("{}/health", config.url.trim_end_matches('/')),
            interval: config.interval(),
        })
    }

    async fn health(&self) -> Result<PaymentHealth> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(parse_health(status, &body))
    }
}

#[async_trait]
impl Poller for PaymentPoller {
    fn name(&self) -> &str {
        "payment_health"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn poll(&self) -> Option<AppEvent> {
        let outcome = self.health().await.map_err(|e| {
            debug!("Payment health check failed: {}", e);
            e.to_string()
        });
        Some(AppEvent::Payment(outcome))
    }
}
