//! Voice presets and speech requests
//!
//! Turns an [`Announcement`] into a [`SpeechRequest`] a speaker backend can
//! play: picks the normal or alert preset and strips characters that break
//! speech engines.

use crate::session::Announcement;
use serde::Deserialize;

/// Greeting spoken by the "initialize voice" control
pub const DEFAULT_GREETING: &str = "Omni Audit browser voice engine activated. Systems are secure.";

/// Pitch and rate for one kind of announcement
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct VoicePreset {
    pub pitch: f32,
    pub rate: f32,
}

impl VoicePreset {
    pub const NORMAL: VoicePreset = VoicePreset {
        pitch: 1.1,
        rate: 1.0,
    };

    pub const ALERT: VoicePreset = VoicePreset {
        pitch: 1.4,
        rate: 0.9,
    };

    /// Speed to synthesize at for a sample-based engine
    ///
    /// Playback at `source_rate` raises the pitch and speeds the audio up by
    /// `pitch`, so synthesis runs at `rate / pitch` to land on `rate`.
    pub fn synthesis_speed(&self) -> f32 {
        self.rate / self.pitch
    }

    /// Sample rate the synthesized audio is treated as before resampling
    pub fn source_rate(&self, model_rate: u32) -> u32 {
        (model_rate as f32 * self.pitch).round().max(1.0) as u32
    }
}

/// Which backend reads announcements aloud
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechEngine {
    /// Neural VITS model played on the default output device
    #[default]
    Vits,
    /// Write utterances to the log only
    Log,
}

/// A named speaker of a multi-speaker model
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NamedVoice {
    pub name: String,
    pub speaker_id: i32,
}

/// Model files for the VITS engine
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct VitsModelConfig {
    pub model_path: String,
    pub tokens_path: String,
    pub lexicon_path: Option<String>,
    pub data_dir: Option<String>,
    pub dict_dir: Option<String>,
    /// Speakers matched against the preferred voice names
    pub voices: Vec<NamedVoice>,
}

impl Default for VitsModelConfig {
    fn default() -> Self {
        Self {
            model_path: "models/tts/model.onnx".to_string(),
            tokens_path: "models/tts/tokens.txt".to_string(),
            lexicon_path: None,
            data_dir: Some("models/tts/espeak-ng-data".to_string()),
            dict_dir: None,
            voices: Vec::new(),
        }
    }
}

impl VitsModelConfig {
    /// Speaker id for a voice name, 0 when unknown
    pub fn speaker_id(&self, voice: Option<&str>) -> i32 {
        voice
            .and_then(|name| self.voices.iter().find(|v| v.name == name))
            .map(|v| v.speaker_id)
            .unwrap_or(0)
    }
}

/// Configuration for voice output
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Preset for routine announcements
    pub normal: VoicePreset,
    /// Preset for security alerts
    pub alert: VoicePreset,
    /// Voice names to prefer, in priority order (substring match)
    pub preferred_voices: Vec<String>,
    /// Text spoken when voice output is initialized
    pub greeting: String,
    /// Maximum queued speech commands
    pub queue_size: usize,
    /// Backend used by the desktop binary
    pub engine: SpeechEngine,
    /// Model files for [`SpeechEngine::Vits`]
    pub model: VitsModelConfig,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            normal: VoicePreset::NORMAL,
            alert: VoicePreset::ALERT,
            preferred_voices: vec![
                "Samantha".to_string(),
                "Female".to_string(),
                "Google UK English Female".to_string(),
                "Zira".to_string(),
            ],
            greeting: DEFAULT_GREETING.to_string(),
            queue_size: 16,
            engine: SpeechEngine::Vits,
            model: VitsModelConfig::default(),
        }
    }
}

impl VoiceConfig {
    pub fn preset(&self, is_alert: bool) -> VoicePreset {
        if is_alert {
            self.alert
        } else {
            self.normal
        }
    }
}

/// A fully resolved utterance
#[derive(Clone, Debug, PartialEq)]
pub struct SpeechRequest {
    /// Sanitized text
    pub text: String,
    pub pitch: f32,
    pub rate: f32,
    pub is_alert: bool,
    pub preferred_voices: Vec<String>,
}

impl SpeechRequest {
    /// Build a request, or `None` when nothing is left to say
    pub fn new(text: &str, is_alert: bool, config: &VoiceConfig) -> Option<Self> {
        let text = sanitize_for_speech(text);
        if text.trim().is_empty() {
            return None;
        }

        let preset = config.preset(is_alert);
        Some(Self {
            text,
            pitch: preset.pitch,
            rate: preset.rate,
            is_alert,
            preferred_voices: config.preferred_voices.clone(),
        })
    }

    pub fn from_announcement(announcement: &Announcement, config: &VoiceConfig) -> Option<Self> {
        Self::new(&announcement.text, announcement.is_alert, config)
    }

    /// First installed voice whose name contains one of the preferred names
    pub fn select_voice<'a>(&self, available: &'a [String]) -> Option<&'a str> {
        self.preferred_voices.iter().find_map(|wanted| {
            available
                .iter()
                .find(|name| name.contains(wanted.as_str()))
                .map(String::as_str)
        })
    }
}

/// Remove double and single quotes
pub fn sanitize_for_speech(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '"' | '\'')).collect()
}
