// src/notify.rs
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{error, info};

/// Toast layer of the admin console.
pub trait Notifier: Send + Sync {
    fn success_toast(&self, message: &str);
    fn error_toast(&self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "lowercase")]
pub enum Toast {
    Success(String),
    Error(String),
}

impl Toast {
    pub fn message(&self) -> &str {
        match self {
            Toast::Success(m) | Toast::Error(m) => m,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Toast::Error(_))
    }
}

/// Emits toasts as tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success_toast(&self, message: &str) {
        info!(target: "cognito_core::toast", "{}", message);
    }

    fn error_toast(&self, message: &str) {
        error!(target: "cognito_core::toast", "{}", message);
    }
}

/// Keeps every toast, in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().map(|t| t.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Toast> {
        self.toasts.lock().ok()?.last().cloned()
    }

    fn push(&self, toast: Toast) {
        if let Ok(mut toasts) = self.toasts.lock() {
            toasts.push(toast);
        }
    }
}

impl Notifier for RecordingNotifier {
    fn success_toast(&self, message: &str) {
        self.push(Toast::Success(message.to_string()));
    }

    fn error_toast(&self, message: &str) {
        self.push(Toast::Error(message.to_string()));
    }
}

impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    fn success_toast(&self, message: &str) {
        (**self).success_toast(message)
    }

    fn error_toast(&self, message: &str) {
        (**self).error_toast(message)
    }
}
