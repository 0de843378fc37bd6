use crate::config::Settings;
use crate::domain::contract::{ChatRequest, ChatResponse};
use crate::gateway::error::GatewayDiagnosticsError;
use crate::gateway::AdvisoryBackend;
use anyhow::Context;

#[derive(Debug, Clone)]
pub struct HttpAdvisoryBackend {
    http: reqwest::Client,
    url: String,
}

impl HttpAdvisoryBackend {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        // Without a configured timeout a hung backend keeps the conversation pending.
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .context("failed to build advisory http client")?;

        Ok(Self {
            http,
            url: settings.api_url().to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl AdvisoryBackend for HttpAdvisoryBackend {
    fn backend_name(&self) -> &'static str {
        "http_json"
    }

    async fn exchange(&self, req: ChatRequest) -> anyhow::Result<ChatResponse> {
        let res = self
            .http
            .post(&self.url)
            .json(&req)
            .send()
            .await
            .map_err(|e| GatewayDiagnosticsError {
                stage: transport_stage(&e),
                detail: e.to_string(),
                raw_body: None,
            })?;

        let status = res.status();
        let text = res.text().await.map_err(|e| GatewayDiagnosticsError {
            stage: transport_stage(&e),
            detail: format!("failed to read response body: {e}"),
            raw_body: None,
        })?;

        if !status.is_success() {
            return Err(GatewayDiagnosticsError {
                stage: "http",
                detail: status.as_u16().to_string(),
                raw_body: Some(text),
            }
            .into());
        }

        let parsed = serde_json::from_str::<ChatResponse>(&text).map_err(|e| {
            GatewayDiagnosticsError {
                stage: "decode",
                detail: e.to_string(),
                raw_body: Some(text.clone()),
            }
        })?;
        Ok(parsed)
    }
}

fn transport_stage(e: &reqwest::Error) -> &'static str {
    if e.is_timeout() {
        "timeout"
    } else {
        "transport"
    }
}
