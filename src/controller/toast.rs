//! Operator feedback messages

use owo_colors::OwoColorize;

/// A feedback message surfaced after an operation
#[derive(Debug, Clone)]
pub struct Toast {
    /// The message to display
    pub message: String,
    /// The severity level of the toast
    pub level: ToastLevel,
}

/// Severity level for toast notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Warning,
    Error,
    Success,
}

impl Toast {
    pub fn new(message: String, level: ToastLevel) -> Self {
        Self {
            message,
            level,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Error)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Success)
    }

    pub fn is_error(&self) -> bool {
        self.level == ToastLevel::Error
    }

    /// Render the message colored by level for terminal output
    pub fn render(&self) -> String {
        match self.level {
            ToastLevel::Warning => self.message.yellow().to_string(),
            ToastLevel::Error => self.message.red().to_string(),
            ToastLevel::Success => self.message.green().to_string(),
        }
    }
}
