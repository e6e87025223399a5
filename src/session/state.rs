//! Per-session state for the Omni-Audit dashboard
//!
//! The session is shared by:
//! - **Orchestrator**: appends log entries, flips the status, sets announcements
//! - **UI**: reads snapshots for rendering and consumes announcements
//! - **Tests**: read snapshots for assertions
//!
//! Nothing here is process-wide; each dashboard window creates its own session.

use super::types::{Announcement, LogEntry, LogKind, SecurityStatus};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// State owned by a single interactive session
#[derive(Clone, Debug)]
pub struct Session {
    /// Session identifier, used for log correlation only
    pub id: Uuid,
    /// Full log history in insertion order
    logs: Vec<LogEntry>,
    /// Current security status
    pub status: SecurityStatus,
    /// Announcement waiting to be spoken
    pending_announcement: Option<Announcement>,
    /// Last command accepted by the input box
    pub last_command: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a new session in the SECURE state
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            logs: Vec::new(),
            status: SecurityStatus::Secure,
            pending_announcement: None,
            last_command: None,
        }
    }

    /// Append an entry to the log
    pub fn push_log(&mut self, kind: LogKind, text: impl Into<String>) {
        self.logs.push(LogEntry::new(kind, text));
    }

    /// All entries in insertion order
    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    /// Most recent `limit` entries, most recent first
    pub fn render_logs(&self, limit: usize) -> Vec<LogEntry> {
        self.logs.iter().rev().take(limit).cloned().collect()
    }

    /// Set the announcement for the current cycle
    pub fn set_announcement(&mut self, announcement: Announcement) {
        self.pending_announcement = Some(announcement);
    }

    /// Peek at the pending announcement without consuming it
    pub fn pending_announcement(&self) -> Option<&Announcement> {
        self.pending_announcement.as_ref()
    }

    /// Take the pending announcement; later calls return `None` until the next cycle
    pub fn consume_pending_announcement(&mut self) -> Option<Announcement> {
        self.pending_announcement.take()
    }

    /// Called when an audit cycle starts. A leftover announcement from the
    /// previous cycle is dropped.
    pub fn begin_cycle(&mut self) {
        if let Some(stale) = self.pending_announcement.take() {
            warn!(
                "[SESSION] {} dropping unspoken announcement: {:?}",
                self.id, stale.text
            );
        }
    }

    /// Create an immutable snapshot for rendering
    pub fn snapshot(&self, log_limit: usize) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            recent_logs: self.render_logs(log_limit),
            total_logs: self.logs.len(),
            last_command: self.last_command.clone(),
        }
    }
}

/// Immutable view of a session
///
/// Used by the UI so no lock is held while painting.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionSnapshot {
    pub status: SecurityStatus,
    /// Most recent entries, most recent first
    pub recent_logs: Vec<LogEntry>,
    pub total_logs: usize,
    pub last_command: Option<String>,
}

impl SessionSnapshot {
    pub fn is_blocked(&self) -> bool {
        self.status.is_blocked()
    }
}

/// Thread-safe handle to a session
///
/// Wraps `Session` in `Arc<RwLock<>>` so the worker thread and the UI can
/// share it. Callers must not hold a guard across an external call.
#[derive(Clone, Default)]
pub struct SharedSession {
    inner: Arc<RwLock<Session>>,
}

impl SharedSession {
    pub fn new() -> Self {
        Self::from_session(Session::new())
    }

    pub fn from_session(session: Session) -> Self {
        Self {
            inner: Arc::new(RwLock::new(session)),
        }
    }

    /// Get a read lock on the session
    pub fn read(&self) -> parking_lot::RwLockReadGuard<'_, Session> {
        self.inner.read()
    }

    /// Get a write lock on the session
    pub fn write(&self) -> parking_lot::RwLockWriteGuard<'_, Session> {
        self.inner.write()
    }

    pub fn snapshot(&self, log_limit: usize) -> SessionSnapshot {
        self.inner.read().snapshot(log_limit)
    }

    pub fn status(&self) -> SecurityStatus {
        self.inner.read().status
    }

    pub fn render_logs(&self, limit: usize) -> Vec<LogEntry> {
        self.inner.read().render_logs(limit)
    }

    pub fn consume_pending_announcement(&self) -> Option<Announcement> {
        self.inner.write().consume_pending_announcement()
    }

    pub fn last_command(&self) -> Option<String> {
        self.inner.read().last_command.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_secure_and_empty() {
        let session = Session::new();
        assert_eq!(session.status, SecurityStatus::Secure);
        assert!(session.logs().is_empty());
        assert!(session.pending_announcement().is_none());
        assert!(session.last_command.is_none());
    }

    #[test]
    fn test_render_logs_most_recent_first() {
        let mut session = Session::new();
        for i in 0..15 {
            session.push_log(LogKind::Allow, format!("entry {}", i));
        }

        let rendered = session.render_logs(10);
        assert_eq!(rendered.len(), 10);
        assert_eq!(rendered[0].text, "entry 14");
        assert_eq!(rendered[9].text, "entry 5");
        // History itself keeps growing
        assert_eq!(session.logs().len(), 15);
    }

    #[test]
    fn test_render_logs_with_fewer_entries() {
        let mut session = Session::new();
        session.push_log(LogKind::Allow, "one");
        session.push_log(LogKind::Bot, "two");

        let rendered = session.render_logs(10);
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].kind, LogKind::Bot);
        assert!(session.render_logs(0).is_empty());
    }

    #[test]
    fn test_consume_announcement_once() {
        let mut session = Session::new();
        session.set_announcement(Announcement::normal("hello"));

        assert_eq!(
            session.consume_pending_announcement(),
            Some(Announcement::normal("hello"))
        );
        assert_eq!(session.consume_pending_announcement(), None);
        assert_eq!(session.consume_pending_announcement(), None);
    }

    #[test]
    fn test_begin_cycle_drops_stale_announcement() {
        let mut session = Session::new();
        session.set_announcement(Announcement::alert("old"));
        session.begin_cycle();
        assert!(session.pending_announcement().is_none());
    }

    #[test]
    fn test_snapshot_is_independent() {
        let shared = SharedSession::new();
        let before = shared.snapshot(10);

        shared.write().push_log(LogKind::Block, "BLOCKED: x");
        shared.write().status = SecurityStatus::Blocked;

        assert_eq!(before.total_logs, 0);
        assert!(!before.is_blocked());

        let after = shared.snapshot(10);
        assert_eq!(after.total_logs, 1);
        assert!(after.is_blocked());
    }
}
