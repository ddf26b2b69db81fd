//! Error types for fogterm-terminal.

use fogterm_core::{ControlError, DrawError, FocusError};
use thiserror::Error;

/// Errors that can occur in the application layer.
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error from terminal operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tree precondition violated.
    #[error("Control error: {0}")]
    Control(#[from] ControlError),

    /// Layout or paint failed.
    #[error("Draw error: {0}")]
    Draw(#[from] DrawError),

    /// Focus manager construction or navigation failed.
    #[error("Focus error: {0}")]
    Focus(#[from] FocusError),

    /// Configuration file could not be parsed.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// `start` called on a running application.
    #[error("Application already running")]
    AlreadyRunning,

    /// Operation requires a running application.
    #[error("Application not running")]
    NotRunning,

    /// Terminal not available.
    #[error("Terminal not available")]
    TerminalNotAvailable,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fogterm_core::{Control, ControlTree};

    #[test]
    fn test_tui_error_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let tui_err: TuiError = io_err.into();
        assert!(matches!(tui_err, TuiError::Io(_)));
        assert!(tui_err.to_string().contains("IO error"));
    }

    #[test]
    fn test_tui_error_from_draw() {
        let mut tree = ControlTree::new();
        let id = tree.insert(Control::panel());
        let err: TuiError = DrawError::BoundaryNotComputed(id).into();
        assert!(matches!(err, TuiError::Draw(DrawError::BoundaryNotComputed(_))));
        assert!(err.to_string().starts_with("Draw error"));
    }

    #[test]
    fn test_tui_error_from_focus() {
        let mut tree = ControlTree::new();
        let id = tree.insert(Control::panel());
        let err: TuiError = FocusError::RootNotContainer(id).into();
        assert!(matches!(err, TuiError::Focus(_)));
    }

    #[test]
    fn test_tui_error_config() {
        let parse = toml::from_str::<toml::Value>("poll_interval_ms = ").unwrap_err();
        let err = TuiError::from(parse);
        assert!(err.to_string().contains("Config error"));
    }

    #[test]
    fn test_tui_error_lifecycle_messages() {
        assert_eq!(TuiError::AlreadyRunning.to_string(), "Application already running");
        assert_eq!(TuiError::NotRunning.to_string(), "Application not running");
        assert_eq!(TuiError::TerminalNotAvailable.to_string(), "Terminal not available");
    }
}
