// src/router.rs
use std::sync::Mutex;
use tracing::info;

/// Admin console navigation.
pub trait Router: Send + Sync {
    fn navigate_to(&self, path: &str);
}

/// Path of the user-attribute mappers view of a connector.
pub fn mappers_path(connector_service_name: &str) -> String {
    format!("/mappers/{}", connector_service_name)
}

/// Router that only logs; used where no UI is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingRouter;

impl Router for LoggingRouter {
    fn navigate_to(&self, path: &str) {
        info!(path, "navigate");
    }
}

#[derive(Debug, Default)]
pub struct RecordingRouter {
    paths: Mutex<Vec<String>>,
}

impl RecordingRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Router for RecordingRouter {
    fn navigate_to(&self, path: &str) {
        if let Ok(mut paths) = self.paths.lock() {
            paths.push(path.to_string());
        }
    }
}

impl<T: Router + ?Sized> Router for std::sync::Arc<T> {
    fn navigate_to(&self, path: &str) {
        (**self).navigate_to(path)
    }
}
