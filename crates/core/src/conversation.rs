use crate::domain::message::{Message, MessageContent};
use crate::gateway::{apology, Gateway};
use crate::session::SessionId;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Idle,
    AwaitingReply,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationState {
    pub messages: Vec<Message>,
    pub status: RequestStatus,
}

impl ConversationState {
    pub fn seeded(greeting: &str) -> Self {
        Self {
            messages: vec![Message::assistant(MessageContent::text(greeting))],
            status: RequestStatus::Idle,
        }
    }

    pub fn pending(&self) -> bool {
        self.status == RequestStatus::AwaitingReply
    }
}

#[derive(Debug, Clone)]
pub enum ConversationAction {
    UserSubmitted(String),
    ReplyReceived(MessageContent),
}

/// Applies one action. Returns whether the state changed; a rejected action leaves it
/// untouched.
pub fn reduce(state: &mut ConversationState, action: ConversationAction) -> bool {
    match action {
        ConversationAction::UserSubmitted(text) => {
            if state.pending() || text.trim().is_empty() {
                return false;
            }
            state.messages.push(Message::user(text));
            state.status = RequestStatus::AwaitingReply;
            true
        }
        ConversationAction::ReplyReceived(content) => {
            if !state.pending() {
                tracing::warn!("reply received while idle; dropping it");
                return false;
            }
            state.messages.push(Message::assistant(content));
            state.status = RequestStatus::Idle;
            true
        }
    }
}

/// Sole owner of the message log. At most one gateway call is in flight at a time.
#[derive(Debug, Clone)]
pub struct ConversationManager {
    state: Arc<watch::Sender<ConversationState>>,
    gateway: Gateway,
    session_id: SessionId,
}

impl ConversationManager {
    pub fn new(gateway: Gateway, session_id: SessionId, greeting: &str) -> Self {
        let (tx, _rx) = watch::channel(ConversationState::seeded(greeting));
        Self {
            state: Arc::new(tx),
            gateway,
            session_id,
        }
    }

    pub fn snapshot(&self) -> ConversationState {
        self.state.borrow().clone()
    }

    pub fn pending(&self) -> bool {
        self.state.borrow().pending()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConversationState> {
        self.state.subscribe()
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Appends the user message and starts the backend call. Returns `None` (and does
    /// nothing) for blank text or while a reply is still pending. Must be called from
    /// within a Tokio runtime.
    pub fn submit_user_message(&self, text: &str) -> Option<JoinHandle<()>> {
        let accepted = self
            .state
            .send_if_modified(|s| reduce(s, ConversationAction::UserSubmitted(text.to_string())));
        if !accepted {
            tracing::debug!(pending = self.pending(), "submission ignored");
            return None;
        }

        let state = self.state.clone();
        let gateway = self.gateway.clone();
        let session_id = self.session_id.clone();
        let text = text.to_string();
        Some(tokio::spawn(async move {
            // The exchange runs in its own task so a panicking backend still ends the turn.
            let exchange = tokio::spawn(async move { gateway.send(&text, &session_id).await });
            let content = match exchange.await {
                Ok(content) => content,
                Err(err) => {
                    tracing::error!(error = %err, "advisory exchange task failed");
                    apology("internal")
                }
            };
            tracing::debug!(kind = ?content.kind(), "assistant reply received");
            state.send_if_modified(|s| reduce(s, ConversationAction::ReplyReceived(content)));
        }))
    }
}
