//! Pattern-based reference auditor
//!
//! Scans a command for configured phrases and answers in the auditor record
//! format. Matching is case-insensitive; the first matching rule wins.

use super::Auditor;
use crate::Result;
use serde::Deserialize;
use tracing::debug;

/// A single blocking rule
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PolicyRule {
    /// Short rule identifier, returned as the record's second field
    pub id: String,
    /// Phrase that triggers the rule (case-insensitive)
    pub pattern: String,
    /// Human-readable reason, returned as the record's third field
    pub reason: String,
}

impl PolicyRule {
    pub fn new(id: impl Into<String>, pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }
}

/// Rules used when the configuration does not list any
pub fn default_rules() -> Vec<PolicyRule> {
    vec![
        PolicyRule::new("destructive_fs", "rm -rf", "Destructive filesystem command"),
        PolicyRule::new("destructive_db", "drop table", "Destructive database command"),
        PolicyRule::new(
            "prompt_override",
            "ignore previous instructions",
            "Prompt override attempt",
        ),
        PolicyRule::new("credential_access", "password", "Credential access request"),
        PolicyRule::new("credential_access", "api key", "Credential access request"),
        PolicyRule::new("privilege", "sudo", "Privilege escalation"),
        PolicyRule::new("exfiltration", "exfiltrate", "Data exfiltration attempt"),
    ]
}

/// Auditor backed by a list of [`PolicyRule`]s
#[derive(Debug, Clone)]
pub struct PolicyAuditor {
    rules: Vec<PolicyRule>,
}

impl Default for PolicyAuditor {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl PolicyAuditor {
    pub fn new(rules: Vec<PolicyRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[PolicyRule] {
        &self.rules
    }

    /// First rule whose pattern occurs in the command
    pub fn matching_rule(&self, command: &str) -> Option<&PolicyRule> {
        let lower = command.to_lowercase();
        self.rules
            .iter()
            .find(|rule| lower.contains(&rule.pattern.to_lowercase()))
    }
}

impl Auditor for PolicyAuditor {
    fn audit_request(&self, command: &str) -> Result<String> {
        match self.matching_rule(command) {
            Some(rule) => {
                debug!("[AUDIT] rule '{}' matched", rule.id);
                Ok(format!("BLOCK|{}|{}", rule.id, rule.reason))
            }
            None => Ok("ALLOW|clean|none".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::AuditRecord;

    #[test]
    fn test_clean_command_is_allowed() {
        let auditor = PolicyAuditor::default();
        assert_eq!(
            auditor.audit_request("summarize the quarterly report").unwrap(),
            "ALLOW|clean|none"
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let auditor = PolicyAuditor::default();
        let raw = auditor.audit_request("please DROP TABLE users").unwrap();
        let record = AuditRecord::parse(&raw).unwrap();
        assert_eq!(record.outcome, "BLOCK");
        assert_eq!(record.reason, "Destructive database command");
    }

    #[test]
    fn test_first_rule_wins() {
        let auditor = PolicyAuditor::new(vec![
            PolicyRule::new("a", "secret", "First"),
            PolicyRule::new("b", "secret", "Second"),
        ]);
        assert_eq!(auditor.audit_request("the secret").unwrap(), "BLOCK|a|First");
    }

    #[test]
    fn test_empty_rule_set_allows_everything() {
        let auditor = PolicyAuditor::new(Vec::new());
        assert!(auditor.matching_rule("rm -rf /").is_none());
    }
}
