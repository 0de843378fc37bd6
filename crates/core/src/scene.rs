use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scene {
    #[default]
    Welcome,
    Chat,
}

#[derive(Debug, Clone)]
pub struct SceneController {
    scene: Arc<watch::Sender<Scene>>,
}

impl Default for SceneController {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneController {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Scene::Welcome);
        Self {
            scene: Arc::new(tx),
        }
    }

    pub fn current(&self) -> Scene {
        *self.scene.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Scene> {
        self.scene.subscribe()
    }

    pub fn start(&self) {
        self.transition(Scene::Chat);
    }

    pub fn go_back(&self) {
        self.transition(Scene::Welcome);
    }

    fn transition(&self, to: Scene) {
        self.scene.send_if_modified(|scene| {
            if *scene == to {
                return false;
            }
            let from = *scene;
            tracing::debug!(?from, ?to, "scene transition");
            *scene = to;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_welcome() {
        assert_eq!(SceneController::new().current(), Scene::Welcome);
    }

    #[test]
    fn round_trip_returns_to_welcome() {
        let scenes = SceneController::new();
        scenes.start();
        assert_eq!(scenes.current(), Scene::Chat);
        scenes.go_back();
        assert_eq!(scenes.current(), Scene::Welcome);
    }

    #[test]
    fn repeated_transition_does_not_notify() {
        let scenes = SceneController::new();
        let mut rx = scenes.subscribe();
        scenes.go_back();
        assert!(!rx.has_changed().unwrap());
        scenes.start();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Scene::Chat);
    }
}
