use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;
use uuid::Uuid;

/// Opaque per-instance session identifier sent with every chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UninitializedContext;

impl fmt::Display for UninitializedContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("session identity read before the provider was mounted")
    }
}

impl std::error::Error for UninitializedContext {}

/// Holds the session identity for one application instance. The id is created on
/// `mount` and never regenerated; it is not persisted anywhere.
#[derive(Debug, Default)]
pub struct SessionProvider {
    identity: OnceLock<SessionId>,
}

impl SessionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&self) -> &SessionId {
        self.identity.get_or_init(|| {
            let id = SessionId::generate();
            tracing::debug!(session_id = %id, "session identity created");
            id
        })
    }

    pub fn session_id(&self) -> Result<&SessionId, UninitializedContext> {
        self.identity.get().ok_or(UninitializedContext)
    }
}
