//! Voice output for announcements
//!
//! This module provides:
//! - Normal and alert voice presets
//! - Speech text sanitizing and preferred voice selection
//! - A threaded pipeline in front of pluggable speaker backends
//! - A VITS backend played on the default output device (`voice` feature)

pub mod pipeline;
#[cfg(feature = "voice")]
pub mod vits;
pub mod voice;

// Re-export commonly used types
pub use pipeline::{
    open_speaker, LogSpeaker, RecordingSpeaker, Speaker, SpeechCommand, SpeechEvent,
    SpeechPipeline,
};
#[cfg(feature = "voice")]
pub use vits::VitsSpeaker;
pub use voice::{
    sanitize_for_speech, NamedVoice, SpeechEngine, SpeechRequest, VitsModelConfig, VoiceConfig,
    VoicePreset, DEFAULT_GREETING,
};
