//! Auditor record parsing
//!
//! The auditor answers with `OUTCOME|detail|reason`. Only the first field is
//! required; a missing reason falls back to [`DEFAULT_REASON`].

use crate::{AuditError, Result};
use serde::Deserialize;

/// Reason used when the record has fewer than three fields
pub const DEFAULT_REASON: &str = "Violation";

const BLOCK_TOKEN: &str = "BLOCK";

/// How the outcome token is compared against "BLOCK"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockMatch {
    /// "BLOCK" anywhere in the token, case-sensitive. "UNBLOCKED" blocks.
    #[default]
    Substring,
    /// The token must be exactly "BLOCK"
    ExactToken,
}

impl BlockMatch {
    pub fn is_block(&self, outcome: &str) -> bool {
        match self {
            BlockMatch::Substring => outcome.contains(BLOCK_TOKEN),
            BlockMatch::ExactToken => outcome == BLOCK_TOKEN,
        }
    }
}

/// A parsed auditor record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    /// Trimmed first field
    pub outcome: String,
    /// Trimmed third field, or [`DEFAULT_REASON`]
    pub reason: String,
}

impl AuditRecord {
    /// Parse a raw record. An empty outcome token is an auditor failure.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut fields = raw.split('|').map(str::trim);

        let outcome = fields.next().unwrap_or_default();
        if outcome.is_empty() {
            return Err(AuditError::AuditorFailure(format!(
                "record has no outcome token: {:?}",
                raw
            )));
        }

        let reason = fields
            .nth(1)
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_REASON.to_string());

        Ok(Self {
            outcome: outcome.to_string(),
            reason,
        })
    }

    pub fn is_block(&self, mode: BlockMatch) -> bool {
        mode.is_block(&self.outcome)
    }
}
