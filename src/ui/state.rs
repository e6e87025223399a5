//! Dashboard-local UI state
//!
//! Session data lives in the session module; this only holds what the
//! widgets need between frames.

use crate::session::SessionSnapshot;

/// Something the user asked for during a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardAction {
    /// Submit text from the command input
    Submit(String),
    /// Replay the last command with the audit skipped
    Override(String),
    /// Speak the greeting and mark voice output as online
    InitializeVoice,
}

/// UI state kept across frames
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    /// Current text in the command input
    pub input_text: String,
    /// Whether the user initialized voice output
    pub voice_online: bool,
    /// Last text handed to the speaker
    pub last_spoken: Option<String>,
    /// A command is queued or running
    pub busy: bool,
    /// Last user-facing error
    pub last_error: Option<String>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input text that would be submitted now, if any
    ///
    /// Empty text and text equal to the last accepted command are not
    /// submitted again.
    pub fn pending_submit(&self, snapshot: &SessionSnapshot) -> Option<String> {
        if self.busy || self.input_text.trim().is_empty() {
            return None;
        }
        if snapshot.last_command.as_deref() == Some(self.input_text.as_str()) {
            return None;
        }
        Some(self.input_text.clone())
    }

    /// Text the status card hashes
    pub fn hash_input(&self) -> &str {
        if self.input_text.is_empty() {
            "IDLE"
        } else {
            &self.input_text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_submit_rules() {
        let mut state = DashboardState::new();
        let mut snapshot = SessionSnapshot::default();
        assert_eq!(state.pending_submit(&snapshot), None);

        state.input_text = "scan ports".into();
        assert_eq!(state.pending_submit(&snapshot), Some("scan ports".into()));

        snapshot.last_command = Some("scan ports".into());
        assert_eq!(state.pending_submit(&snapshot), None);

        state.input_text = "scan hosts".into();
        state.busy = true;
        assert_eq!(state.pending_submit(&snapshot), None);
    }

    #[test]
    fn test_hash_input_defaults_to_idle() {
        let mut state = DashboardState::new();
        assert_eq!(state.hash_input(), "IDLE");
        state.input_text = "reset".into();
        assert_eq!(state.hash_input(), "reset");
    }
}
