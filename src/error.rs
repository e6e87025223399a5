//! Error types for Omni-Audit
//!
//! Every failure that can cross a module boundary is one of these variants.

use thiserror::Error;

/// Omni-Audit errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    /// The auditor raised, timed out, or returned a record without an outcome token
    #[error("Auditor failure: {0}")]
    AuditorFailure(String),

    /// The assistant raised or timed out
    #[error("Assistant failure: {0}")]
    AssistantFailure(String),

    /// An external call exceeded its deadline
    #[error("{collaborator} did not answer within {timeout_ms}ms")]
    Timeout {
        collaborator: &'static str,
        timeout_ms: u64,
    },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// File system I/O error
    #[error("IO error: {0}")]
    IOError(String),

    /// Channel communication error
    #[error("Channel error: {0}")]
    ChannelError(String),

    /// Speech backend error
    #[error("Speech error: {0}")]
    SpeechError(String),
}

impl From<std::io::Error> for AuditError {
    fn from(e: std::io::Error) -> Self {
        AuditError::IOError(e.to_string())
    }
}

impl AuditError {
    /// Check if this error is recoverable
    ///
    /// Recoverable errors leave the session usable; the user can simply
    /// submit again.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AuditError::AuditorFailure(_) => true,
            AuditError::AssistantFailure(_) => true,
            AuditError::Timeout { .. } => true,
            AuditError::ConfigError(_) => false,
            AuditError::IOError(_) => false,
            // The worker is gone, nothing will process further commands
            AuditError::ChannelError(_) => false,
            AuditError::SpeechError(_) => true,
        }
    }

    /// Get a user-friendly description of the error
    pub fn user_message(&self) -> String {
        match self {
            AuditError::AuditorFailure(_) => {
                "The auditor could not classify this command. Status unchanged.".to_string()
            }
            AuditError::AssistantFailure(_) => {
                "AI response unavailable. The audit record was kept.".to_string()
            }
            AuditError::Timeout { collaborator, .. } => {
                format!("The {} took too long to respond. Please try again.", collaborator)
            }
            AuditError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            AuditError::IOError(_) => "File system error occurred.".to_string(),
            AuditError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
            AuditError::SpeechError(_) => {
                "Voice output failed. Announcements will only be shown as text.".to_string()
            }
        }
    }
}

/// Result type alias for Omni-Audit operations
pub type Result<T> = std::result::Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(AuditError::AuditorFailure("x".into()).is_recoverable());
        assert!(AuditError::Timeout {
            collaborator: "auditor",
            timeout_ms: 10
        }
        .is_recoverable());
        assert!(!AuditError::ChannelError("closed".into()).is_recoverable());
        assert!(!AuditError::ConfigError("bad".into()).is_recoverable());
    }

    #[test]
    fn test_timeout_display() {
        let err = AuditError::Timeout {
            collaborator: "assistant",
            timeout_ms: 2500,
        };
        assert_eq!(err.to_string(), "assistant did not answer within 2500ms");
        assert!(err.user_message().contains("assistant"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AuditError = io.into();
        assert!(matches!(err, AuditError::IOError(ref msg) if msg.contains("missing")));
    }
}
