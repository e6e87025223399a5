use anyhow::{Context, Result};
use omni_audit::config::AppConfig;
use omni_audit::external::{
    Assistant, Auditor, DnaHasher, EchoAssistant, PolicyAuditor, Sha256DnaHasher, TimedAssistant,
    TimedAuditor,
};
use omni_audit::session::{SessionOrchestrator, SessionWorker};
use omni_audit::speech::{open_speaker, SpeechPipeline};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "omni_audit=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Omni-Audit");

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config =
        AppConfig::resolve(config_path.as_deref()).context("Failed to load configuration")?;

    let mut auditor: Arc<dyn Auditor> = Arc::new(PolicyAuditor::new(config.auditor.rules.clone()));
    let mut assistant: Arc<dyn Assistant> =
        Arc::new(EchoAssistant::new(config.external.assistant_prefix.clone()));

    if let Some(timeout) = config.external.call_timeout() {
        info!("External calls limited to {:?}", timeout);
        auditor = Arc::new(TimedAuditor::new(auditor, timeout));
        assistant = Arc::new(TimedAssistant::new(assistant, timeout));
    }

    let orchestrator = SessionOrchestrator::new(auditor, assistant)
        .with_block_match(config.session.block_match);
    let (worker, handle) = SessionWorker::new(orchestrator);
    let session_thread = worker.spawn()?;

    let speech = SpeechPipeline::new(config.voice.clone());
    // Falls back to logging when the model or output device is missing
    let voice_config = config.voice.clone();
    info!("Speech engine: {:?}", voice_config.engine);
    let speech_thread = speech.start_worker_with(move || open_speaker(&voice_config))?;

    let hasher: Arc<dyn DnaHasher> = Arc::new(Sha256DnaHasher);

    omni_audit::ui::run(config, handle, speech, hasher)
        .map_err(|e| anyhow::anyhow!("Dashboard error: {}", e))?;

    for (name, thread) in [("session", session_thread), ("speech", speech_thread)] {
        if thread.join().is_err() {
            warn!("{} worker panicked", name);
        }
    }

    info!("Omni-Audit stopped");
    Ok(())
}
