//! Loading screen error handling
//!
//! One error type for the whole crate. Contract violations by the loader are
//! reported as `InvariantViolation`, a missing wallpaper is recoverable, and
//! render failures are propagated after the screen has restored the renderer.

/// Result type for loading screen operations
pub type LoadingResult<T> = Result<T, LoadingError>;

/// Errors that can occur while driving the loading screen
#[derive(Debug, thiserror::Error)]
pub enum LoadingError {
    #[error("Invariant violated in {context}: {detail}")]
    InvariantViolation { context: &'static str, detail: String },

    #[error("No wallpaper with prefix '{prefix}' in resource group '{group}'")]
    NoWallpaperAvailable { prefix: String, group: String },

    #[error("Render operation '{operation}' failed: {error}")]
    RenderFailed { operation: String, error: String },

    #[error("Config error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoadingError {
    /// True for errors caused by a caller breaking the progress contract
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, LoadingError::InvariantViolation { .. })
    }
}

/// Helper trait for attaching loading screen context to foreign errors
pub trait LoadingErrorContext<T> {
    fn render_context(self, operation: &str) -> LoadingResult<T>;
    fn config_context(self, context: &str) -> LoadingResult<T>;
}

impl<T, E> LoadingErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn render_context(self, operation: &str) -> LoadingResult<T> {
        self.map_err(|e| render_error(operation, e))
    }

    fn config_context(self, context: &str) -> LoadingResult<T> {
        self.map_err(|e| LoadingError::Config {
            message: format!("{}: {}", context, e),
        })
    }
}

/// Create an invariant violation error
pub fn invariant_violation(context: &'static str, detail: impl Into<String>) -> LoadingError {
    LoadingError::InvariantViolation {
        context,
        detail: detail.into(),
    }
}

/// Create a render failure error
pub fn render_error(operation: &str, error: impl std::fmt::Display) -> LoadingError {
    LoadingError::RenderFailed {
        operation: operation.to_string(),
        error: error.to_string(),
    }
}
