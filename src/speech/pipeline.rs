//! Speech output pipeline
//!
//! A worker thread owns a [`Speaker`] backend and plays requests in the
//! order they arrive. Each new utterance cancels the one in progress.

use super::voice::{SpeechEngine, SpeechRequest, VoiceConfig};
use crate::session::Announcement;
use crate::{AuditError, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info, warn};

/// A speech backend
///
/// Backends live on the speech worker thread and need not be `Send`; audio
/// streams are created there by the factory passed to
/// [`SpeechPipeline::start_worker_with`].
pub trait Speaker {
    /// Names of the installed voices
    fn available_voices(&self) -> Vec<String> {
        Vec::new()
    }

    /// Stop whatever is currently being spoken
    fn cancel(&mut self);

    /// Speak a request with the given voice (or the backend default)
    fn speak(&mut self, request: &SpeechRequest, voice: Option<&str>) -> Result<()>;
}

/// Backend that writes utterances to the log
#[derive(Debug, Default)]
pub struct LogSpeaker;

impl Speaker for LogSpeaker {
    fn cancel(&mut self) {}

    fn speak(&mut self, request: &SpeechRequest, voice: Option<&str>) -> Result<()> {
        info!(
            "[VOICE] ({}, pitch {:.1}, rate {:.1}) {}",
            voice.unwrap_or("default voice"),
            request.pitch,
            request.rate,
            request.text
        );
        Ok(())
    }
}

/// Backend that keeps every request, for tests and headless runs
#[derive(Clone, Debug, Default)]
pub struct RecordingSpeaker {
    spoken: Arc<Mutex<Vec<SpeechRequest>>>,
    cancels: Arc<Mutex<usize>>,
    voices: Vec<String>,
}

impl RecordingSpeaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_voices(voices: Vec<String>) -> Self {
        Self {
            voices,
            ..Self::default()
        }
    }

    pub fn spoken(&self) -> Vec<SpeechRequest> {
        self.spoken.lock().clone()
    }

    pub fn cancel_count(&self) -> usize {
        *self.cancels.lock()
    }
}

impl Speaker for RecordingSpeaker {
    fn available_voices(&self) -> Vec<String> {
        self.voices.clone()
    }

    fn cancel(&mut self) {
        *self.cancels.lock() += 1;
    }

    fn speak(&mut self, request: &SpeechRequest, _voice: Option<&str>) -> Result<()> {
        self.spoken.lock().push(request.clone());
        Ok(())
    }
}

/// Open the backend selected by `config.engine`
pub fn open_speaker(config: &VoiceConfig) -> Result<Box<dyn Speaker>> {
    match config.engine {
        SpeechEngine::Log => Ok(Box::new(LogSpeaker)),
        #[cfg(feature = "voice")]
        SpeechEngine::Vits => Ok(Box::new(super::vits::VitsSpeaker::open(&config.model)?)),
        #[cfg(not(feature = "voice"))]
        SpeechEngine::Vits => Err(AuditError::SpeechError(
            "Built without the voice feature".into(),
        )),
    }
}

/// Command sent to the speech pipeline
#[derive(Clone, Debug)]
pub enum SpeechCommand {
    /// Speak a request, cancelling the current utterance first
    Speak(SpeechRequest),
    /// Stop the current utterance
    Cancel,
    /// Shutdown the pipeline
    Shutdown,
}

/// Event emitted by the speech pipeline
#[derive(Clone, Debug, PartialEq)]
pub enum SpeechEvent {
    /// An utterance was handed to the backend
    Spoken {
        text: String,
        voice: Option<String>,
        is_alert: bool,
    },
    /// The backend failed
    Error { error: String },
    /// Pipeline has shut down
    Shutdown,
}

/// Speech pipeline that runs a backend on its own thread
pub struct SpeechPipeline {
    config: VoiceConfig,
    command_tx: Sender<SpeechCommand>,
    command_rx: Receiver<SpeechCommand>,
    event_tx: Sender<SpeechEvent>,
    event_rx: Receiver<SpeechEvent>,
}

impl SpeechPipeline {
    /// Create a new speech pipeline
    pub fn new(config: VoiceConfig) -> Self {
        let (command_tx, command_rx) = bounded(config.queue_size.max(1));
        let (event_tx, event_rx) = bounded(config.queue_size.max(1));

        Self {
            config,
            command_tx,
            command_rx,
            event_tx,
            event_rx,
        }
    }

    pub fn config(&self) -> &VoiceConfig {
        &self.config
    }

    /// Get a sender for commands
    pub fn command_sender(&self) -> Sender<SpeechCommand> {
        self.command_tx.clone()
    }

    /// Get a receiver for events
    pub fn event_receiver(&self) -> Receiver<SpeechEvent> {
        self.event_rx.clone()
    }

    /// Queue an announcement. Returns `Ok(false)` when there was nothing to say.
    pub fn announce(&self, announcement: &Announcement) -> Result<bool> {
        match SpeechRequest::from_announcement(announcement, &self.config) {
            Some(request) => self.send(SpeechCommand::Speak(request)).map(|_| true),
            None => Ok(false),
        }
    }

    /// Queue the configured greeting
    pub fn greet(&self) -> Result<bool> {
        self.announce(&Announcement::normal(self.config.greeting.clone()))
    }

    /// Request shutdown
    pub fn shutdown(&self) -> Result<()> {
        self.send(SpeechCommand::Shutdown)
    }

    fn send(&self, cmd: SpeechCommand) -> Result<()> {
        // Never block the UI thread on a full queue
        self.command_tx
            .try_send(cmd)
            .map_err(|e| AuditError::ChannelError(format!("Failed to queue speech: {}", e)))
    }

    /// Start the pipeline worker thread with a ready backend
    pub fn start_worker(
        &self,
        speaker: Box<dyn Speaker + Send>,
    ) -> Result<thread::JoinHandle<()>> {
        self.start_worker_with(move || Ok(speaker as Box<dyn Speaker>))
    }

    /// Start the pipeline worker thread, building the backend on it
    ///
    /// If the factory fails the error is reported as a [`SpeechEvent::Error`]
    /// and the worker falls back to [`LogSpeaker`].
    pub fn start_worker_with<F>(&self, factory: F) -> Result<thread::JoinHandle<()>>
    where
        F: FnOnce() -> Result<Box<dyn Speaker>> + Send + 'static,
    {
        let command_rx = self.command_rx.clone();
        let event_tx = self.event_tx.clone();

        thread::Builder::new()
            .name("speech-worker".to_string())
            .spawn(move || {
                info!("[VOICE] speech worker starting");
                let mut speaker = match factory() {
                    Ok(speaker) => speaker,
                    Err(e) => {
                        warn!("[VOICE] speech backend unavailable, logging instead: {}", e);
                        let _ = event_tx.try_send(SpeechEvent::Error {
                            error: e.to_string(),
                        });
                        Box::new(LogSpeaker)
                    }
                };
                let voices = speaker.available_voices();
                debug!("[VOICE] {} voices installed", voices.len());

                loop {
                    match command_rx.recv() {
                        Ok(SpeechCommand::Speak(request)) => {
                            speaker.cancel();
                            let voice = request.select_voice(&voices).map(str::to_string);

                            let event = match speaker.speak(&request, voice.as_deref()) {
                                Ok(()) => SpeechEvent::Spoken {
                                    text: request.text.clone(),
                                    voice,
                                    is_alert: request.is_alert,
                                },
                                Err(e) => {
                                    error!("[VOICE] speech failed: {}", e);
                                    SpeechEvent::Error {
                                        error: e.to_string(),
                                    }
                                }
                            };
                            // Events are informational; drop them if nobody is reading
                            let _ = event_tx.try_send(event);
                        }
                        Ok(SpeechCommand::Cancel) => {
                            speaker.cancel();
                        }
                        Ok(SpeechCommand::Shutdown) => {
                            info!("[VOICE] speech worker shutting down");
                            speaker.cancel();
                            let _ = event_tx.send(SpeechEvent::Shutdown);
                            break;
                        }
                        Err(e) => {
                            debug!("[VOICE] command channel closed: {}", e);
                            break;
                        }
                    }
                }

                info!("[VOICE] speech worker stopped");
            })
            .map_err(|e| AuditError::SpeechError(format!("Failed to spawn speech worker: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenSpeaker;

    impl Speaker for BrokenSpeaker {
        fn cancel(&mut self) {}

        fn speak(&mut self, _request: &SpeechRequest, _voice: Option<&str>) -> Result<()> {
            Err(AuditError::SpeechError("no audio device".into()))
        }
    }

    #[test]
    fn test_announcements_reach_speaker() {
        let speaker = RecordingSpeaker::with_voices(vec!["Google UK English Female".into()]);
        let pipeline = SpeechPipeline::new(VoiceConfig::default());
        let events = pipeline.event_receiver();
        let join = pipeline.start_worker(Box::new(speaker.clone())).unwrap();

        assert!(pipeline
            .announce(&Announcement::alert("Security Alert. Don't"))
            .unwrap());
        assert_eq!(
            events.recv().unwrap(),
            SpeechEvent::Spoken {
                text: "Security Alert. Dont".into(),
                voice: Some("Google UK English Female".into()),
                is_alert: true,
            }
        );

        pipeline.shutdown().unwrap();
        assert_eq!(events.recv().unwrap(), SpeechEvent::Shutdown);
        join.join().unwrap();

        let spoken = speaker.spoken();
        assert_eq!(spoken.len(), 1);
        assert_eq!(spoken[0].pitch, 1.4);
        // One cancel before speaking, one on shutdown
        assert_eq!(speaker.cancel_count(), 2);
    }

    #[test]
    fn test_empty_announcement_is_skipped() {
        let pipeline = SpeechPipeline::new(VoiceConfig::default());
        assert!(!pipeline.announce(&Announcement::normal("")).unwrap());
    }

    #[test]
    fn test_greeting_uses_normal_preset() {
        let speaker = RecordingSpeaker::new();
        let pipeline = SpeechPipeline::new(VoiceConfig::default());
        let events = pipeline.event_receiver();
        let join = pipeline.start_worker(Box::new(speaker.clone())).unwrap();

        pipeline.greet().unwrap();
        assert!(matches!(
            events.recv().unwrap(),
            SpeechEvent::Spoken { is_alert: false, .. }
        ));
        pipeline.shutdown().unwrap();
        join.join().unwrap();

        assert_eq!(speaker.spoken()[0].text, crate::speech::DEFAULT_GREETING);
    }

    #[test]
    fn test_backend_error_is_reported() {
        let pipeline = SpeechPipeline::new(VoiceConfig::default());
        let events = pipeline.event_receiver();
        let join = pipeline.start_worker(Box::new(BrokenSpeaker)).unwrap();

        pipeline.announce(&Announcement::normal("hello")).unwrap();
        assert!(matches!(events.recv().unwrap(), SpeechEvent::Error { .. }));

        pipeline.shutdown().unwrap();
        join.join().unwrap();
    }

    #[test]
    fn test_failed_backend_falls_back_to_log() {
        let pipeline = SpeechPipeline::new(VoiceConfig::default());
        let events = pipeline.event_receiver();
        let join = pipeline
            .start_worker_with(|| Err(AuditError::SpeechError("No output device available".into())))
            .unwrap();

        match events.recv().unwrap() {
            SpeechEvent::Error { error } => assert!(error.contains("No output device")),
            other => panic!("unexpected event: {:?}", other),
        }

        pipeline.announce(&Announcement::alert("Security Alert. Halt")).unwrap();
        assert!(matches!(
            events.recv().unwrap(),
            SpeechEvent::Spoken { is_alert: true, voice: None, .. }
        ));

        pipeline.shutdown().unwrap();
        join.join().unwrap();
    }

    #[test]
    fn test_open_speaker_log_engine() {
        let config = VoiceConfig {
            engine: SpeechEngine::Log,
            ..VoiceConfig::default()
        };
        let speaker = open_speaker(&config).unwrap();
        assert!(speaker.available_voices().is_empty());
    }
}
