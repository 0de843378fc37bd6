use crate::config::Settings;
use crate::conversation::{ConversationManager, ConversationState};
use crate::domain::message::Message;
use crate::gateway::http::HttpAdvisoryBackend;
use crate::gateway::{AdvisoryBackend, Gateway};
use crate::scene::{Scene, SceneController};
use crate::session::{SessionId, SessionProvider};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Everything a presentation layer needs: the message log, the pending flag, submission,
/// and the current scene with its two transitions.
#[derive(Debug)]
pub struct AdvisorApp {
    session: SessionProvider,
    conversation: ConversationManager,
    scenes: SceneController,
}

impl AdvisorApp {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let backend = HttpAdvisoryBackend::from_settings(settings)?;
        tracing::info!(url = backend.url(), "advisory backend configured");
        Ok(Self::with_backend(Arc::new(backend), settings.greeting()))
    }

    pub fn with_backend(backend: Arc<dyn AdvisoryBackend>, greeting: &str) -> Self {
        let session = SessionProvider::new();
        let session_id = session.mount().clone();
        let conversation = ConversationManager::new(Gateway::new(backend), session_id, greeting);
        Self {
            session,
            conversation,
            scenes: SceneController::new(),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        // Mounted in the constructor.
        self.session.mount()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.conversation.snapshot().messages
    }

    pub fn pending(&self) -> bool {
        self.conversation.pending()
    }

    pub fn submit_user_message(&self, text: &str) -> Option<JoinHandle<()>> {
        self.conversation.submit_user_message(text)
    }

    pub fn subscribe_conversation(&self) -> watch::Receiver<ConversationState> {
        self.conversation.subscribe()
    }

    pub fn scene(&self) -> Scene {
        self.scenes.current()
    }

    pub fn subscribe_scene(&self) -> watch::Receiver<Scene> {
        self.scenes.subscribe()
    }

    pub fn enter_chat(&self) {
        self.scenes.start();
    }

    pub fn go_back(&self) {
        self.scenes.go_back();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contract::{ChatRequest, ChatResponse, ResponseType};

    struct Echo;

    #[async_trait::async_trait]
    impl AdvisoryBackend for Echo {
        fn backend_name(&self) -> &'static str {
            "echo"
        }

        async fn exchange(&self, req: ChatRequest) -> anyhow::Result<ChatResponse> {
            Ok(ChatResponse {
                response_type: ResponseType::Text,
                content: req.message,
                portfolio_data: None,
            })
        }
    }

    #[tokio::test]
    async fn scene_round_trip_keeps_conversation() {
        let app = AdvisorApp::with_backend(Arc::new(Echo), "Welcome!");
        assert_eq!(app.scene(), Scene::Welcome);

        app.enter_chat();
        assert_eq!(app.scene(), Scene::Chat);
        app.submit_user_message("save for retirement")
            .unwrap()
            .await
            .unwrap();
        let before = app.messages();
        assert_eq!(before.len(), 3);

        app.go_back();
        assert_eq!(app.scene(), Scene::Welcome);
        assert_eq!(app.messages(), before);
        assert!(!app.pending());
    }

    #[test]
    fn session_id_is_stable() {
        let app = AdvisorApp::with_backend(Arc::new(Echo), "hi");
        assert_eq!(app.session_id().clone(), app.session_id().clone());
    }

    #[test]
    fn builds_from_default_settings() {
        let app = AdvisorApp::from_settings(&Settings::default()).unwrap();
        assert_eq!(app.messages().len(), 1);
        assert_eq!(app.messages()[0].body(), crate::config::DEFAULT_GREETING);
    }
}
