//! External collaborators of the session orchestrator
//!
//! This module provides:
//! - The `Auditor`, `Assistant` and `DnaHasher` seams
//! - Parsing of the auditor's pipe-delimited record
//! - Deadline wrappers for slow collaborators
//! - Reference implementations used by the desktop binary

pub mod assistant;
pub mod hash;
pub mod policy;
pub mod record;
pub mod timeout;

use crate::Result;

pub use assistant::EchoAssistant;
pub use hash::Sha256DnaHasher;
pub use policy::{PolicyAuditor, PolicyRule};
pub use record::{AuditRecord, BlockMatch, DEFAULT_REASON};
pub use timeout::{TimedAssistant, TimedAuditor};

/// Classifies a command as allowed or blocked
///
/// Returns a `|`-delimited record: outcome token, an opaque second field,
/// and an optional human-readable reason.
pub trait Auditor: Send + Sync {
    fn audit_request(&self, command: &str) -> Result<String>;
}

/// Produces a free-text response for an allowed command
pub trait Assistant: Send + Sync {
    fn run_main_ai(&self, command: &str) -> Result<String>;
}

/// Deterministic cosmetic hash shown in the status card
pub trait DnaHasher: Send + Sync {
    fn generate_dna_hash(&self, input: &str) -> String;
}

impl<F> Auditor for F
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn audit_request(&self, command: &str) -> Result<String> {
        self(command)
    }
}

impl<F> Assistant for F
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn run_main_ai(&self, command: &str) -> Result<String> {
        self(command)
    }
}
