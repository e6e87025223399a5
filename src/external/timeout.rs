//! Deadline wrappers for external collaborators
//!
//! The wrapped call runs on its own thread and the caller waits on a
//! one-slot channel. When the deadline passes the caller gets an error and
//! the thread is left to finish on its own; its late answer is discarded.

use super::{Assistant, Auditor};
use crate::{AuditError, Result};
use crossbeam_channel::{bounded, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::warn;

fn call_with_deadline<F>(collaborator: &'static str, timeout: Duration, call: F) -> Result<String>
where
    F: FnOnce() -> Result<String> + Send + 'static,
{
    let (tx, rx) = bounded(1);

    thread::Builder::new()
        .name(format!("{}-call", collaborator))
        .spawn(move || {
            let _ = tx.send(call());
        })
        .map_err(|e| AuditError::IOError(format!("Failed to spawn {} call: {}", collaborator, e)))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            warn!(
                "[AUDIT] {} exceeded {}ms, abandoning call",
                collaborator,
                timeout.as_millis()
            );
            Err(AuditError::Timeout {
                collaborator,
                timeout_ms: timeout.as_millis() as u64,
            })
        }
        Err(RecvTimeoutError::Disconnected) => Err(AuditError::ChannelError(format!(
            "{} call thread exited without a result",
            collaborator
        ))),
    }
}

/// An auditor whose calls fail with `AuditorFailure` after a deadline
pub struct TimedAuditor {
    inner: Arc<dyn Auditor>,
    timeout: Duration,
}

impl TimedAuditor {
    pub fn new(inner: Arc<dyn Auditor>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

impl Auditor for TimedAuditor {
    fn audit_request(&self, command: &str) -> Result<String> {
        let inner = Arc::clone(&self.inner);
        let command = command.to_string();
        call_with_deadline("auditor", self.timeout, move || inner.audit_request(&command))
            .map_err(|e| match e {
                AuditError::AuditorFailure(_) => e,
                other => AuditError::AuditorFailure(other.to_string()),
            })
    }
}

/// An assistant whose calls fail with `AssistantFailure` after a deadline
pub struct TimedAssistant {
    inner: Arc<dyn Assistant>,
    timeout: Duration,
}

impl TimedAssistant {
    pub fn new(inner: Arc<dyn Assistant>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

impl Assistant for TimedAssistant {
    fn run_main_ai(&self, command: &str) -> Result<String> {
        let inner = Arc::clone(&self.inner);
        let command = command.to_string();
        call_with_deadline("assistant", self.timeout, move || inner.run_main_ai(&command))
            .map_err(|e| match e {
                AuditError::AssistantFailure(_) => e,
                other => AuditError::AssistantFailure(other.to_string()),
            })
    }
}
