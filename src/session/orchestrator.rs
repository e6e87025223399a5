//! Session orchestrator
//!
//! Runs one audit cycle per submitted command: audit → branch on outcome →
//! (on allow or override) ask the assistant → record log entries and the
//! announcement to speak.
//!
//! Session locks are taken only between external calls so the UI can keep
//! rendering while the auditor or assistant is working.

use super::state::SharedSession;
use super::types::{Announcement, LogEntry, LogKind, SecurityStatus, SubmitOutcome};
use crate::external::{Assistant, AuditRecord, Auditor, BlockMatch};
use crate::{AuditError, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Placeholder logged when the assistant fails
pub const ASSISTANT_UNAVAILABLE: &str = "AI response unavailable";

/// Spoken after an override
pub const OVERRIDE_ANNOUNCEMENT: &str = "Override accepted.";

/// Maximum number of response characters read back after an allowed command
pub const SPOKEN_RESPONSE_CHARS: usize = 100;

/// Coordinates one session with its auditor and assistant
pub struct SessionOrchestrator {
    session: SharedSession,
    auditor: Arc<dyn Auditor>,
    assistant: Arc<dyn Assistant>,
    block_match: BlockMatch,
}

impl SessionOrchestrator {
    /// Create an orchestrator over a fresh session
    pub fn new(auditor: Arc<dyn Auditor>, assistant: Arc<dyn Assistant>) -> Self {
        Self::with_session(SharedSession::new(), auditor, assistant)
    }

    /// Create an orchestrator over an existing session handle
    pub fn with_session(
        session: SharedSession,
        auditor: Arc<dyn Auditor>,
        assistant: Arc<dyn Assistant>,
    ) -> Self {
        Self {
            session,
            auditor,
            assistant,
            block_match: BlockMatch::default(),
        }
    }

    /// Set how the auditor's outcome token is matched
    pub fn with_block_match(mut self, block_match: BlockMatch) -> Self {
        self.block_match = block_match;
        self
    }

    /// Handle to the session this orchestrator writes to
    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// Entry point for the command input
    ///
    /// Ignores empty text and text equal to the last accepted command.
    /// Returns `Ok(None)` when the command was skipped.
    pub fn submit_command(&self, command: &str) -> Result<Option<SubmitOutcome>> {
        if command.trim().is_empty() {
            return Ok(None);
        }

        let previous = {
            let mut session = self.session.write();
            if session.last_command.as_deref() == Some(command) {
                debug!("[SESSION] duplicate command ignored");
                return Ok(None);
            }
            session.last_command.replace(command.to_string())
        };

        match self.submit(command, false) {
            Ok(outcome) => Ok(Some(outcome)),
            Err(e) => {
                // Let the user retry the same text after an auditor failure
                self.session.write().last_command = previous;
                Err(e)
            }
        }
    }

    /// Run one audit cycle
    ///
    /// With `force_override` the auditor is skipped and the status is reset
    /// to SECURE. Auditor failures leave the session untouched and are
    /// returned; assistant failures are recorded with a placeholder entry.
    pub fn submit(&self, command: &str, force_override: bool) -> Result<SubmitOutcome> {
        if force_override {
            return Ok(self.run_override(command));
        }

        let raw = self.auditor.audit_request(command).map_err(|e| match e {
            AuditError::AuditorFailure(_) => e,
            other => AuditError::AuditorFailure(other.to_string()),
        })?;
        let record = AuditRecord::parse(&raw)?;

        if record.is_block(self.block_match) {
            Ok(self.record_block(record.reason))
        } else {
            Ok(self.run_allowed(command))
        }
    }

    /// Most recent `limit` log entries, most recent first
    pub fn render_logs(&self, limit: usize) -> Vec<LogEntry> {
        self.session.render_logs(limit)
    }

    /// Take the pending announcement, if any
    pub fn consume_pending_announcement(&self) -> Option<Announcement> {
        self.session.consume_pending_announcement()
    }

    fn run_override(&self, command: &str) -> SubmitOutcome {
        {
            let mut session = self.session.write();
            session.begin_cycle();
            info!("[SESSION] {} override accepted", session.id);
            session.status = SecurityStatus::Secure;
            session.push_log(LogKind::Allow, format!("OVERRIDE: {}", command));
        }

        let response = self.ask_assistant(command);

        let mut session = self.session.write();
        session.push_log(
            LogKind::Bot,
            format!(
                "AI RESPONSE: {}",
                response.as_deref().unwrap_or(ASSISTANT_UNAVAILABLE)
            ),
        );
        session.set_announcement(Announcement::normal(OVERRIDE_ANNOUNCEMENT));

        SubmitOutcome::Overridden { response }
    }

    fn record_block(&self, reason: String) -> SubmitOutcome {
        let mut session = self.session.write();
        session.begin_cycle();
        warn!("[SESSION] {} command blocked: {}", session.id, reason);
        session.status = SecurityStatus::Blocked;
        session.push_log(LogKind::Block, format!("BLOCKED: {}", reason));
        session.set_announcement(Announcement::alert(format!("Security Alert. {}", reason)));

        SubmitOutcome::Blocked { reason }
    }

    fn run_allowed(&self, command: &str) -> SubmitOutcome {
        {
            let mut session = self.session.write();
            session.begin_cycle();
            info!("[SESSION] {} command allowed", session.id);
            session.status = SecurityStatus::Secure;
            session.push_log(LogKind::Allow, format!("USER: {}", command));
        }

        let response = self.ask_assistant(command);
        let text = response.as_deref().unwrap_or(ASSISTANT_UNAVAILABLE);
        let spoken: String = text.chars().take(SPOKEN_RESPONSE_CHARS).collect();

        let mut session = self.session.write();
        session.push_log(LogKind::Bot, format!("AI: {}", text));
        session.set_announcement(Announcement::normal(format!(
            "Processing complete. {}",
            spoken
        )));

        SubmitOutcome::Allowed { response }
    }

    fn ask_assistant(&self, command: &str) -> Option<String> {
        match self.assistant.run_main_ai(command) {
            Ok(response) => {
                debug!("[SESSION] assistant answered with {} chars", response.len());
                Some(response)
            }
            Err(e) => {
                warn!("[SESSION] assistant failed: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn fixed_auditor(record: &'static str) -> Arc<dyn Auditor> {
        Arc::new(move |_: &str| -> Result<String> { Ok(record.to_string()) })
    }

    fn fixed_assistant(response: &'static str) -> Arc<dyn Assistant> {
        Arc::new(move |_: &str| -> Result<String> { Ok(response.to_string()) })
    }

    fn failing_assistant() -> Arc<dyn Assistant> {
        Arc::new(|_: &str| -> Result<String> {
            Err(AuditError::AssistantFailure("model offline".into()))
        })
    }

    #[test]
    fn test_allow_cycle() {
        let orch = SessionOrchestrator::new(fixed_auditor("ALLOW|reason|none"), fixed_assistant("Hello"));

        let outcome = orch.submit("status", false).unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Allowed {
                response: Some("Hello".into())
            }
        );

        let logs = orch.render_logs(10);
        assert_eq!(logs.len(), 2);
        assert_eq!((logs[1].kind, logs[1].text.as_str()), (LogKind::Allow, "USER: status"));
        assert_eq!((logs[0].kind, logs[0].text.as_str()), (LogKind::Bot, "AI: Hello"));
        assert_eq!(orch.session().status(), SecurityStatus::Secure);
        assert_eq!(
            orch.consume_pending_announcement(),
            Some(Announcement::normal("Processing complete. Hello"))
        );
    }

    #[test]
    fn test_block_cycle() {
        let orch = SessionOrchestrator::new(
            fixed_auditor("BLOCK|x|Unauthorized access"),
            fixed_assistant("never"),
        );

        let outcome = orch.submit("open vault", false).unwrap();
        assert!(outcome.is_blocked());
        assert_eq!(orch.session().status(), SecurityStatus::Blocked);

        let logs = orch.render_logs(10);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].kind, LogKind::Block);
        assert_eq!(logs[0].text, "BLOCKED: Unauthorized access");
        assert_eq!(
            orch.consume_pending_announcement(),
            Some(Announcement::alert("Security Alert. Unauthorized access"))
        );
    }

    #[test]
    fn test_block_does_not_call_assistant() {
        let calls = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&calls);
        let assistant: Arc<dyn Assistant> = Arc::new(move |_: &str| -> Result<String> {
            *counter.lock() += 1;
            Ok("x".into())
        });

        let orch = SessionOrchestrator::new(fixed_auditor("BLOCK"), assistant);
        orch.submit("anything", false).unwrap();
        assert_eq!(*calls.lock(), 0);
        assert_eq!(orch.render_logs(1)[0].text, "BLOCKED: Violation");
    }

    #[test]
    fn test_override_after_block() {
        let orch = SessionOrchestrator::new(fixed_auditor("BLOCK|x|Nope"), fixed_assistant("OK"));
        orch.submit("reset", false).unwrap();
        assert_eq!(orch.session().status(), SecurityStatus::Blocked);

        let outcome = orch.submit("reset", true).unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Overridden {
                response: Some("OK".into())
            }
        );
        assert_eq!(orch.session().status(), SecurityStatus::Secure);

        let logs = orch.render_logs(2);
        assert_eq!((logs[1].kind, logs[1].text.as_str()), (LogKind::Allow, "OVERRIDE: reset"));
        assert_eq!((logs[0].kind, logs[0].text.as_str()), (LogKind::Bot, "AI RESPONSE: OK"));
        assert_eq!(
            orch.consume_pending_announcement(),
            Some(Announcement::normal(OVERRIDE_ANNOUNCEMENT))
        );
    }

    #[test]
    fn test_override_never_calls_auditor() {
        let auditor: Arc<dyn Auditor> = Arc::new(|_: &str| -> Result<String> {
            Err(AuditError::AuditorFailure("must not be called".into()))
        });
        let orch = SessionOrchestrator::new(auditor, fixed_assistant("fine"));
        assert!(orch.submit("go", true).is_ok());
    }

    #[test]
    fn test_auditor_failure_leaves_session_untouched() {
        let auditor: Arc<dyn Auditor> = Arc::new(|_: &str| -> Result<String> {
            Err(AuditError::AuditorFailure("policy engine down".into()))
        });
        let orch = SessionOrchestrator::new(auditor, fixed_assistant("x"));
        orch.session().write().status = SecurityStatus::Blocked;

        let err = orch.submit("cmd", false).unwrap_err();
        assert!(matches!(err, AuditError::AuditorFailure(_)));
        assert_eq!(orch.session().status(), SecurityStatus::Blocked);
        assert!(orch.render_logs(10).is_empty());
        assert!(orch.consume_pending_announcement().is_none());
    }

    #[test]
    fn test_unparsable_record_is_auditor_failure() {
        let orch = SessionOrchestrator::new(fixed_auditor("  "), fixed_assistant("x"));
        assert!(matches!(
            orch.submit("cmd", false),
            Err(AuditError::AuditorFailure(_))
        ));
        assert!(orch.render_logs(10).is_empty());
    }

    #[test]
    fn test_assistant_failure_uses_placeholder() {
        let orch = SessionOrchestrator::new(fixed_auditor("ALLOW"), failing_assistant());

        let outcome = orch.submit("hello", false).unwrap();
        assert_eq!(outcome, SubmitOutcome::Allowed { response: None });

        let logs = orch.render_logs(10);
        assert_eq!(logs[1].text, "USER: hello");
        assert_eq!(logs[0].text, format!("AI: {}", ASSISTANT_UNAVAILABLE));
        assert_eq!(
            orch.consume_pending_announcement(),
            Some(Announcement::normal(format!(
                "Processing complete. {}",
                ASSISTANT_UNAVAILABLE
            )))
        );
    }

    #[test]
    fn test_override_with_assistant_failure() {
        let orch = SessionOrchestrator::new(fixed_auditor("ALLOW"), failing_assistant());
        orch.submit("reset", true).unwrap();
        let logs = orch.render_logs(2);
        assert_eq!(logs[1].text, "OVERRIDE: reset");
        assert_eq!(logs[0].text, format!("AI RESPONSE: {}", ASSISTANT_UNAVAILABLE));
    }

    #[test]
    fn test_spoken_response_is_truncated_by_chars() {
        let long: &'static str = Box::leak("é".repeat(150).into_boxed_str());
        let orch = SessionOrchestrator::new(fixed_auditor("ALLOW"), fixed_assistant(long));
        orch.submit("talk", false).unwrap();

        let announcement = orch.consume_pending_announcement().unwrap();
        let spoken = announcement.text.trim_start_matches("Processing complete. ");
        assert_eq!(spoken.chars().count(), SPOKEN_RESPONSE_CHARS);
        // The log keeps the full response
        assert_eq!(orch.render_logs(1)[0].text.chars().count(), 4 + 150);
    }

    #[test]
    fn test_exact_token_mode() {
        let orch = SessionOrchestrator::new(fixed_auditor("UNBLOCKED|x|y"), fixed_assistant("ok"))
            .with_block_match(BlockMatch::ExactToken);
        assert!(!orch.submit("cmd", false).unwrap().is_blocked());

        let quirky = SessionOrchestrator::new(fixed_auditor("UNBLOCKED|x|y"), fixed_assistant("ok"));
        assert!(quirky.submit("cmd", false).unwrap().is_blocked());
    }

    #[test]
    fn test_submit_command_skips_duplicates_and_empty() {
        let orch = SessionOrchestrator::new(fixed_auditor("ALLOW"), fixed_assistant("ok"));

        assert!(orch.submit_command("").unwrap().is_none());
        assert!(orch.submit_command("   ").unwrap().is_none());
        assert!(orch.submit_command("scan").unwrap().is_some());
        assert!(orch.submit_command("scan").unwrap().is_none());
        assert!(orch.submit_command("scan again").unwrap().is_some());

        assert_eq!(orch.render_logs(10).len(), 4);
        assert_eq!(orch.session().last_command().as_deref(), Some("scan again"));
    }

    #[test]
    fn test_submit_command_restores_last_command_on_auditor_failure() {
        let fail = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&fail);
        let auditor: Arc<dyn Auditor> = Arc::new(move |_: &str| -> Result<String> {
            if *flag.lock() {
                Err(AuditError::AuditorFailure("down".into()))
            } else {
                Ok("ALLOW".into())
            }
        });
        let orch = SessionOrchestrator::new(auditor, fixed_assistant("ok"));

        orch.submit_command("first").unwrap();
        *fail.lock() = true;
        assert!(orch.submit_command("second").is_err());
        assert_eq!(orch.session().last_command().as_deref(), Some("first"));

        *fail.lock() = false;
        assert!(orch.submit_command("second").unwrap().is_some());
    }

    #[test]
    fn test_stale_announcement_not_carried_over() {
        let orch = SessionOrchestrator::new(fixed_auditor("BLOCK|x|First"), fixed_assistant("ok"));
        orch.submit("one", false).unwrap();
        // Not consumed before the next cycle
        orch.submit("two", true).unwrap();

        assert_eq!(
            orch.consume_pending_announcement(),
            Some(Announcement::normal(OVERRIDE_ANNOUNCEMENT))
        );
        assert_eq!(orch.consume_pending_announcement(), None);
    }
}
