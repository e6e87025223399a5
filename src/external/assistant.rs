//! Reference assistant
//!
//! Stands in for a real model in the desktop binary: it acknowledges the
//! command using a configurable prefix.

use super::Assistant;
use crate::Result;

pub const DEFAULT_PREFIX: &str = "Acknowledged. Executing protocol";

/// Assistant that echoes the command back
#[derive(Debug, Clone)]
pub struct EchoAssistant {
    prefix: String,
}

impl Default for EchoAssistant {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl EchoAssistant {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Assistant for EchoAssistant {
    fn run_main_ai(&self, command: &str) -> Result<String> {
        Ok(format!("{}: {}", self.prefix, command.trim()))
    }
}
