//! Omni-Audit: AI oversight dashboard
//!
//! Every protocol command is classified by an external auditor before the
//! main assistant may act on it. Blocked commands are logged and announced;
//! an operator can authorize an override.

pub mod config;
pub mod error;
pub mod external;
pub mod session;
pub mod speech;
pub mod ui;

pub use error::{AuditError, Result};
