//! Neural speech backend
//!
//! Synthesizes with a VITS model through sherpa-rs and plays the result on
//! the default output device with cpal. Pitch is applied by treating the
//! synthesized audio as if it had been recorded at a higher rate before
//! resampling it to the device rate.

use super::pipeline::Speaker;
use super::voice::{SpeechRequest, VitsModelConfig, VoicePreset};
use crate::{AuditError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Stream, StreamConfig};
use parking_lot::Mutex;
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use sherpa_rs::tts::{VitsTts, VitsTtsConfig};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Default output device fed from a shared sample queue
struct Playback {
    // Dropping the stream stops playback
    _stream: Stream,
    queue: Arc<Mutex<VecDeque<f32>>>,
    sample_rate: u32,
}

impl Playback {
    fn open() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| AuditError::SpeechError("No output device available".into()))?;

        info!(
            "[VOICE] using output device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config: StreamConfig = device
            .default_output_config()
            .map_err(|e| AuditError::SpeechError(format!("Failed to get output config: {}", e)))?
            .into();

        let channels = config.channels as usize;
        let queue = Arc::new(Mutex::new(VecDeque::new()));
        let source = Arc::clone(&queue);

        let err_fn = |err| {
            error!("[VOICE] output stream error: {}", err);
        };

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut queue = source.lock();
                    // Mono source duplicated across every channel
                    for frame in data.chunks_mut(channels) {
                        let sample = queue.pop_front().unwrap_or(0.0);
                        frame.fill(sample);
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| AuditError::SpeechError(format!("Failed to build output stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| AuditError::SpeechError(format!("Failed to start output stream: {}", e)))?;

        Ok(Self {
            _stream: stream,
            queue,
            sample_rate: config.sample_rate.0,
        })
    }

    fn enqueue(&self, samples: Vec<f32>) {
        self.queue.lock().extend(samples);
    }

    fn clear(&self) {
        self.queue.lock().clear();
    }
}

/// Speaker backed by a local VITS model
pub struct VitsSpeaker {
    tts: VitsTts,
    model: VitsModelConfig,
    playback: Playback,
}

impl VitsSpeaker {
    /// Load the model and open the default output device
    pub fn open(model: &VitsModelConfig) -> Result<Self> {
        for (what, path) in [("Model", &model.model_path), ("Tokens file", &model.tokens_path)] {
            if !Path::new(path).exists() {
                return Err(AuditError::SpeechError(format!("{} not found: {}", what, path)));
            }
        }

        info!("[VOICE] loading VITS model from: {}", model.model_path);

        let tts = VitsTts::new(VitsTtsConfig {
            model: model.model_path.clone(),
            tokens: model.tokens_path.clone(),
            lexicon: model.lexicon_path.clone().unwrap_or_default(),
            data_dir: model.data_dir.clone().unwrap_or_default(),
            dict_dir: model.dict_dir.clone().unwrap_or_default(),
            noise_scale: 0.667,
            noise_scale_w: 0.8,
            ..Default::default()
        });

        let playback = Playback::open()?;

        Ok(Self {
            tts,
            model: model.clone(),
            playback,
        })
    }
}

impl Speaker for VitsSpeaker {
    fn available_voices(&self) -> Vec<String> {
        self.model.voices.iter().map(|v| v.name.clone()).collect()
    }

    fn cancel(&mut self) {
        self.playback.clear();
    }

    fn speak(&mut self, request: &SpeechRequest, voice: Option<&str>) -> Result<()> {
        let preset = VoicePreset {
            pitch: request.pitch,
            rate: request.rate,
        };
        let speaker_id = self.model.speaker_id(voice);

        let audio = self
            .tts
            .create(&request.text, speaker_id, preset.synthesis_speed())
            .map_err(|e| AuditError::SpeechError(format!("Synthesis failed: {}", e)))?;

        let source_rate = preset.source_rate(audio.sample_rate as u32);
        let samples = if source_rate == self.playback.sample_rate {
            audio.samples
        } else {
            resample_mono(&audio.samples, source_rate, self.playback.sample_rate)?
        };

        debug!(
            "[VOICE] speaker {} queued {:.2}s",
            speaker_id,
            samples.len() as f32 / self.playback.sample_rate as f32
        );
        self.playback.enqueue(samples);
        Ok(())
    }
}

/// Resample a mono buffer between two rates
fn resample_mono(input: &[f32], from: u32, to: u32) -> Result<Vec<f32>> {
    if input.is_empty() {
        return Ok(Vec::new());
    }
    if from == 0 || to == 0 {
        return Err(AuditError::SpeechError("Sample rates must be greater than 0".into()));
    }

    let ratio = to as f64 / from as f64;
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, 1024, 1)
        .map_err(|e| AuditError::SpeechError(format!("Failed to create resampler: {}", e)))?;

    let chunk_size = resampler.input_frames_max();
    let mut output = Vec::with_capacity((input.len() as f64 * ratio * 1.1) as usize);

    for chunk in input.chunks(chunk_size) {
        // SincFixedIn needs full chunks; the tail is zero padded
        let mut planar = vec![vec![0.0f32; chunk_size]];
        planar[0][..chunk.len()].copy_from_slice(chunk);

        let processed = resampler
            .process(&planar, None)
            .map_err(|e| AuditError::SpeechError(format!("Resampling failed: {}", e)))?;

        let produced = &processed[0];
        let take = if chunk.len() < chunk_size {
            ((chunk.len() as f64) * ratio).ceil() as usize
        } else {
            produced.len()
        };
        output.extend_from_slice(&produced[..take.min(produced.len())]);
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resample_mono_scales_length() {
        let input: Vec<f32> = (0..22050).map(|i| (i as f32 * 0.01).sin() * 0.5).collect();
        let output = resample_mono(&input, 22050, 44100).unwrap();

        let expected = 44100.0;
        let actual = output.len() as f32;
        assert!((actual - expected).abs() / expected < 0.1, "got {}", actual);
    }

    #[test]
    fn test_resample_mono_rejects_zero_rate() {
        assert!(resample_mono(&[0.1, 0.2], 0, 48000).is_err());
        assert!(resample_mono(&[], 0, 48000).unwrap().is_empty());
    }

    #[test]
    fn test_missing_model_is_reported() {
        let model = VitsModelConfig {
            model_path: "/nonexistent/model.onnx".into(),
            ..VitsModelConfig::default()
        };
        let err = match VitsSpeaker::open(&model) {
            Err(e) => e,
            Ok(_) => panic!("model should not load"),
        };
        assert!(matches!(err, AuditError::SpeechError(ref msg) if msg.contains("model.onnx")));
    }
}
