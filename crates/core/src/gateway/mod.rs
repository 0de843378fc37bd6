pub mod error;
pub mod http;

use crate::domain::contract::{ChatRequest, ChatResponse};
use crate::domain::message::MessageContent;
use crate::gateway::error::GatewayDiagnosticsError;
use crate::session::SessionId;
use std::sync::Arc;

pub const APOLOGY: &str = "Sorry, I couldn't reach the advisory service just now. Please try again in a moment.";

/// Transport to the advisory service: one request in, one decoded response out.
#[async_trait::async_trait]
pub trait AdvisoryBackend: Send + Sync {
    fn backend_name(&self) -> &'static str;

    async fn exchange(&self, req: ChatRequest) -> anyhow::Result<ChatResponse>;
}

/// Fail-soft front of an [`AdvisoryBackend`]. `send` always yields message content; any
/// transport, status or decode failure turns into an apology message.
#[derive(Clone)]
pub struct Gateway {
    backend: Arc<dyn AdvisoryBackend>,
}

impl Gateway {
    pub fn new(backend: Arc<dyn AdvisoryBackend>) -> Self {
        Self { backend }
    }

    pub async fn send(&self, user_text: &str, session_id: &SessionId) -> MessageContent {
        let req = ChatRequest {
            message: user_text.to_string(),
            session_id: session_id.to_string(),
        };

        let res = match self.backend.exchange(req).await {
            Ok(response) => response
                .validate_and_into_content()
                .map_err(|err| (err, "contract")),
            Err(err) => Err((err, "transport")),
        };

        match res {
            Ok(content) => content,
            Err((err, fallback_stage)) => {
                let suffix = diagnostic_suffix(&err, fallback_stage);
                tracing::warn!(
                    backend = self.backend.backend_name(),
                    %session_id,
                    stage = %suffix,
                    error = %format!("{err:#}"),
                    "advisory exchange failed; replying with apology"
                );
                if let Some(raw) = err
                    .downcast_ref::<GatewayDiagnosticsError>()
                    .and_then(|d| d.raw_body.as_deref())
                {
                    tracing::debug!(raw_body = raw, "advisory backend raw body");
                }
                apology(&suffix)
            }
        }
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("backend", &self.backend.backend_name())
            .finish()
    }
}

/// `fallback_stage` names the step that failed when the error carries no diagnostics.
fn diagnostic_suffix(err: &anyhow::Error, fallback_stage: &str) -> String {
    match err.downcast_ref::<GatewayDiagnosticsError>() {
        Some(diag) => diag.suffix(),
        None => fallback_stage.to_string(),
    }
}

pub fn apology(suffix: &str) -> MessageContent {
    MessageContent::text(format!("{APOLOGY} ({suffix})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contract::ResponseType;
    use crate::domain::message::MessageKind;
    use std::sync::Mutex;

    struct Scripted {
        seen: Mutex<Vec<ChatRequest>>,
        reply: fn() -> anyhow::Result<ChatResponse>,
    }

    #[async_trait::async_trait]
    impl AdvisoryBackend for Scripted {
        fn backend_name(&self) -> &'static str {
            "scripted"
        }

        async fn exchange(&self, req: ChatRequest) -> anyhow::Result<ChatResponse> {
            self.seen.lock().unwrap().push(req);
            (self.reply)()
        }
    }

    fn gateway(reply: fn() -> anyhow::Result<ChatResponse>) -> (Gateway, Arc<Scripted>) {
        let backend = Arc::new(Scripted {
            seen: Mutex::new(Vec::new()),
            reply,
        });
        (Gateway::new(backend.clone()), backend)
    }

    #[tokio::test]
    async fn passes_text_and_session_through() {
        let (gw, backend) = gateway(|| {
            Ok(ChatResponse {
                response_type: ResponseType::Text,
                content: "Noted.".to_string(),
                portfolio_data: None,
            })
        });
        let session = SessionId::generate();

        let content = gw.send("I have 10k to invest", &session).await;
        assert_eq!(content, MessageContent::text("Noted."));

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].message, "I have 10k to invest");
        assert_eq!(seen[0].session_id, session.as_str());
    }

    #[tokio::test]
    async fn transport_failure_becomes_apology() {
        let (gw, _) = gateway(|| {
            Err(GatewayDiagnosticsError {
                stage: "transport",
                detail: "connection refused (os error 111)".to_string(),
                raw_body: None,
            }
            .into())
        });

        let content = gw.send("hello", &SessionId::generate()).await;
        assert_eq!(content.kind(), MessageKind::PlainText);
        assert!(content.body().starts_with(APOLOGY));
        assert!(content.body().ends_with("(transport)"));
        assert!(!content.body().contains("os error"));
    }

    #[tokio::test]
    async fn plain_backend_error_is_labeled_transport() {
        let (gw, _) = gateway(|| Err(anyhow::anyhow!("connection reset by peer")));

        let content = gw.send("hello", &SessionId::generate()).await;
        assert!(content.body().ends_with("(transport)"));
        assert!(!content.body().contains("reset by peer"));
    }

    #[tokio::test]
    async fn http_status_is_the_suffix() {
        let (gw, _) = gateway(|| {
            Err(GatewayDiagnosticsError {
                stage: "http",
                detail: "503".to_string(),
                raw_body: Some("upstream down".to_string()),
            }
            .into())
        });

        let content = gw.send("hello", &SessionId::generate()).await;
        assert!(content.body().ends_with("(http 503)"));
        assert!(!content.body().contains("upstream down"));
    }

    #[tokio::test]
    async fn portfolio_without_data_fails_soft() {
        let (gw, _) = gateway(|| {
            Ok(ChatResponse {
                response_type: ResponseType::Portfolio,
                content: "Here you go".to_string(),
                portfolio_data: None,
            })
        });

        let content = gw.send("hello", &SessionId::generate()).await;
        assert_eq!(content.kind(), MessageKind::PlainText);
        assert!(content.payload().is_none());
        assert!(content.body().ends_with("(contract)"));
    }
}
