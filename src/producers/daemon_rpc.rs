//! Daemon JSON-RPC `get_info` poller

use super::Poller;
use crate::config::DaemonConfig;
use crate::error::Result;
use crate::messages::{AppEvent, DaemonInfo};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<DaemonInfo>,
    error: Option<RpcError>,
}

/// JSON-RPC 2.0 request body for `method`
pub fn request_body(method: &str) -> serde_json::Value {
    json!({ "jsonrpc": "2.0", "id": 0, "method": method })
}

/// Decode a `get_info` response
pub fn parse_response(body: &str) -> std::result::Result<DaemonInfo, String> {
    let response: RpcResponse =
        serde_json::from_str(body).map_err(|e| format!("invalid response: {}", e))?;
    if let Some(error) = response.error {
        return Err(format!("rpc error {}: {}", error.code, error.message));
    }
    response
        .result
        .ok_or_else(|| "response has no result".to_string())
}

pub struct DaemonPoller {
    client: Client,
    url: String,
    interval: Duration,
}

impl DaemonPoller {
    pub fn new(config: &DaemonConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
            interval: config.interval(),
        })
    }

    async fn get_info(&self) -> Result<String> {
        let body = self
            .client
            .post(&self.url)
            .json(&request_body("get_info"))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}

#[async_trait]
impl Poller for DaemonPoller {
    fn name(&self) -> &str {
        "daemon_rpc"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn poll(&self) -> Option<AppEvent> {
        let outcome = match self.get_info().await {
            Ok(body) => parse_response(&body),
            Err(e) => Err(e.to_string()),
        };
        if let Err(reason) = &outcome {
            debug!("get_info failed: {}", reason);
        }
        Some(AppEvent::Daemon(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body() {
        let body = request_body("get_info");
        assert_eq!(body["jsonrpc"], "2.0");
        assert_eq!(body["method"], "get_info");
    }

    #[test]
    fn test_parse_result() {
        let info = parse_response(
            r#"{"id":0,"jsonrpc":"2.0","result":{"height":3100000,"target_height":3100002,
               "busy_syncing":true,"outgoing_connections_count":12,"status":"OK"}}"#,
        )
        .unwrap();
        assert_eq!(info.height, 3_100_000);
        assert_eq!(info.outgoing_connections_count, 12);
        assert!(info.busy_syncing);
    }

    #[test]
    fn test_parse_error() {
        let err = parse_response(
            r#"{"id":0,"jsonrpc":"2.0","error":{"code":-32601,"message":"Method not found"}}"#,
        )
        .unwrap_err();
        assert_eq!(err, "rpc error -32601: Method not found");
        assert!(parse_response("not json").is_err());
    }

    #[tokio::test]
    async fn test_unreachable_daemon_reports_error() {
        let poller = DaemonPoller::new(&DaemonConfig {
            url: "http://127.0.0.1:9/json_rpc".to_string(),
            interval_secs: 5,
            timeout_secs: 1,
        })
        .unwrap();
        assert!(matches!(poller.poll().await, Some(AppEvent::Daemon(Err(_)))));
    }
}
