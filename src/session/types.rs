use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Security status shown in the status card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityStatus {
    #[default]
    Secure,
    Blocked,
}

impl SecurityStatus {
    pub fn is_blocked(&self) -> bool {
        matches!(self, SecurityStatus::Blocked)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityStatus::Secure => "SECURE",
            SecurityStatus::Blocked => "BLOCKED",
        }
    }
}

impl std::fmt::Display for SecurityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogKind {
    Allow,
    Block,
    Bot,
}

impl LogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Allow => "ALLOW",
            LogKind::Block => "BLOCK",
            LogKind::Bot => "BOT",
        }
    }
}

/// One line of the neural log. Entries are never edited after they are appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub kind: LogKind,
    pub text: String,
}

impl LogEntry {
    pub fn new(kind: LogKind, text: impl Into<String>) -> Self {
        Self::at(Local::now(), kind, text)
    }

    pub fn at(timestamp: DateTime<Local>, kind: LogKind, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            kind,
            text: text.into(),
        }
    }

    /// Timestamp at display precision (seconds)
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

/// What the presentation layer should speak next
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub text: String,
    pub is_alert: bool,
}

impl Announcement {
    pub fn normal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_alert: false,
        }
    }

    pub fn alert(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_alert: true,
        }
    }
}

/// Result of one completed audit cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The auditor blocked the command
    Blocked { reason: String },
    /// The auditor allowed the command; `response` is `None` when the assistant failed
    Allowed { response: Option<String> },
    /// The audit was skipped by an override; `response` is `None` when the assistant failed
    Overridden { response: Option<String> },
}

impl SubmitOutcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, SubmitOutcome::Blocked { .. })
    }
}
