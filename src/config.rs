//! Configuration for the Omni-Audit dashboard
//!
//! Loaded from a TOML file; every section and field is optional and falls
//! back to the defaults below.
//!
//! ```toml
//! [session]
//! log_display_limit = 10
//! block_match = "substring"   # or "exact_token"
//!
//! [external]
//! call_timeout_ms = 5000      # omit for no deadline
//! assistant_prefix = "Acknowledged. Executing protocol"
//!
//! [[auditor.rules]]
//! id = "destructive_fs"
//! pattern = "rm -rf"
//! reason = "Destructive filesystem command"
//!
//! [voice]
//! normal = { pitch = 1.1, rate = 1.0 }
//! alert = { pitch = 1.4, rate = 0.9 }
//! engine = "vits"             # or "log"
//!
//! [voice.model]
//! model_path = "models/tts/model.onnx"
//! tokens_path = "models/tts/tokens.txt"
//! voices = [{ name = "Samantha", speaker_id = 0 }]
//! ```

use crate::external::assistant::DEFAULT_PREFIX;
use crate::external::policy::default_rules;
use crate::external::{BlockMatch, PolicyRule};
use crate::speech::{SpeechEngine, VoiceConfig};
use crate::{AuditError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "OMNI_AUDIT_CONFIG";

/// Session behaviour
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of log entries shown in the log panel
    pub log_display_limit: usize,
    /// How the auditor's outcome token is matched against "BLOCK"
    pub block_match: BlockMatch,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            log_display_limit: 10,
            block_match: BlockMatch::Substring,
        }
    }
}

/// External collaborator settings
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExternalConfig {
    /// Deadline for each auditor / assistant call; `None` waits forever
    pub call_timeout_ms: Option<u64>,
    /// Prefix used by the reference assistant
    pub assistant_prefix: String,
}

impl Default for ExternalConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms: None,
            assistant_prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl ExternalConfig {
    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_ms.map(Duration::from_millis)
    }
}

/// Rules for the reference auditor
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AuditorConfig {
    pub rules: Vec<PolicyRule>,
}

impl Default for AuditorConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

/// Window settings
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 820.0,
        }
    }
}

/// Complete application configuration
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub external: ExternalConfig,
    pub auditor: AuditorConfig,
    pub voice: VoiceConfig,
    pub window: WindowConfig,
}

impl AppConfig {
    /// Load and validate a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AuditError::ConfigError(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
            .map_err(|e| AuditError::ConfigError(format!("'{}': {}", path.display(), e)))
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)
            .map_err(|e| AuditError::ConfigError(format!("Failed to parse: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the configuration from an explicit path, then the
    /// environment, then the defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.session.log_display_limit == 0 {
            return Err(AuditError::ConfigError(
                "session.log_display_limit must be at least 1".to_string(),
            ));
        }

        if self.external.call_timeout_ms == Some(0) {
            return Err(AuditError::ConfigError(
                "external.call_timeout_ms must be positive".to_string(),
            ));
        }

        for (name, preset) in [("normal", self.voice.normal), ("alert", self.voice.alert)] {
            if preset.pitch <= 0.0 || preset.rate <= 0.0 {
                return Err(AuditError::ConfigError(format!(
                    "voice.{} pitch and rate must be positive",
                    name
                )));
            }
        }

        if self.voice.engine == SpeechEngine::Vits
            && (self.voice.model.model_path.is_empty() || self.voice.model.tokens_path.is_empty())
        {
            return Err(AuditError::ConfigError(
                "voice.model needs model_path and tokens_path".to_string(),
            ));
        }

        if let Some(rule) = self.auditor.rules.iter().find(|r| r.pattern.trim().is_empty()) {
            return Err(AuditError::ConfigError(format!(
                "auditor rule '{}' has an empty pattern",
                rule.id
            )));
        }

        Ok(())
    }
}
