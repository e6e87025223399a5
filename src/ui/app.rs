//! Main application struct and eframe integration
//!
//! `OmniAuditApp` owns the handles to the session worker and the speech
//! pipeline. Each frame it drains their events, forwards the pending
//! announcement to speech and renders the dashboard from a session snapshot.

use crate::config::AppConfig;
use crate::external::DnaHasher;
use crate::session::{SessionEvent, SessionHandle, SessionSnapshot, SubmitOutcome};
use crate::speech::{SpeechEvent, SpeechPipeline};
use crate::ui::components::{CommandBar, Helix, LogPanel, StatusPanel, VoicePanel};
use crate::ui::state::{DashboardAction, DashboardState};
use crate::ui::theme::Theme;
use crossbeam_channel::Receiver;
use egui::{self, CentralPanel, RichText, SidePanel, TopBottomPanel};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Render the whole dashboard and collect what the user asked for
///
/// Stateless apart from `state`, so tests can drive it without a worker.
pub fn render_dashboard(
    ctx: &egui::Context,
    state: &mut DashboardState,
    snapshot: &SessionSnapshot,
    hash: &str,
    theme: &Theme,
    animate: bool,
) -> Vec<DashboardAction> {
    let mut actions = Vec::new();

    TopBottomPanel::top("header")
        .frame(
            egui::Frame::none()
                .fill(theme.bg_card)
                .inner_margin(egui::Margin::symmetric(theme.spacing_lg, theme.spacing)),
        )
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("🧬 Omni-Audit AI Oversight")
                        .size(22.0)
                        .strong()
                        .color(theme.text_primary),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if state.busy {
                        ui.spinner();
                        ui.label(RichText::new("Auditing...").size(12.0).color(theme.text_muted));
                    }
                });
            });
        });

    SidePanel::left("audio_interface")
        .resizable(false)
        .exact_width(240.0)
        .frame(
            egui::Frame::none()
                .fill(theme.bg_card)
                .inner_margin(theme.spacing),
        )
        .show(ctx, |ui| {
            if let Some(action) = VoicePanel::new(state, theme).show(ui) {
                actions.push(action);
            }
        });

    CentralPanel::default()
        .frame(
            egui::Frame::none()
                .fill(theme.bg_primary)
                .inner_margin(theme.spacing_lg),
        )
        .show(ctx, |ui| {
            if let Some(action) = CommandBar::new(state, snapshot, theme).show(ui) {
                actions.push(action);
            }

            ui.add_space(theme.spacing);

            ui.columns(3, |columns| {
                LogPanel::new(snapshot, theme).show(&mut columns[0]);

                theme.card_frame().show(&mut columns[1], |ui| {
                    ui.set_min_height(theme.card_height);
                    ui.set_width(ui.available_width());
                    ui.label(theme.card_title("Genetic Helix"));
                    ui.add_space(theme.spacing);
                    Helix::new(theme)
                        .mutated(snapshot.is_blocked())
                        .animate(animate)
                        .show(ui);
                });

                let status = StatusPanel::new(snapshot, hash, theme).busy(state.busy);
                if let Some(action) = status.show(&mut columns[2]) {
                    actions.push(action);
                }
            });
        });

    actions
}

/// Main Omni-Audit application
pub struct OmniAuditApp {
    config: AppConfig,
    theme: Theme,
    state: DashboardState,
    session: SessionHandle,
    speech: SpeechPipeline,
    speech_events: Receiver<SpeechEvent>,
    hasher: Arc<dyn DnaHasher>,
    animate: bool,
    initialized: bool,
}

impl OmniAuditApp {
    /// Create the application for eframe
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        session: SessionHandle,
        speech: SpeechPipeline,
        hasher: Arc<dyn DnaHasher>,
    ) -> Self {
        let app = Self::from_parts(config, session, speech, hasher);
        app.theme.apply(&cc.egui_ctx);
        app
    }

    /// Create the application without an eframe context
    pub fn from_parts(
        config: AppConfig,
        session: SessionHandle,
        speech: SpeechPipeline,
        hasher: Arc<dyn DnaHasher>,
    ) -> Self {
        let speech_events = speech.event_receiver();
        Self {
            config,
            theme: Theme::dark(),
            state: DashboardState::new(),
            session,
            speech,
            speech_events,
            hasher,
            animate: true,
            initialized: false,
        }
    }

    /// Turn the helix animation on or off
    pub fn with_animation(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Current session snapshot with the configured log limit
    pub fn snapshot(&self) -> SessionSnapshot {
        self.session
            .session()
            .snapshot(self.config.session.log_display_limit)
    }

    fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        info!(
            "[UI] dashboard ready for session {}",
            self.session.session().read().id
        );
        self.initialized = true;
    }

    /// Drain worker and speech events and forward the pending announcement
    pub fn poll_events(&mut self) {
        while let Some(event) = self.session.try_recv_event() {
            match event {
                SessionEvent::Completed(outcome) => {
                    debug!("[UI] cycle completed: {:?}", outcome);
                    if !matches!(outcome, SubmitOutcome::Blocked { .. }) {
                        self.state.last_error = None;
                    }
                }
                SessionEvent::Skipped => {
                    debug!("[UI] command skipped");
                }
                SessionEvent::Failed(e) => {
                    warn!("[UI] command failed: {}", e);
                    self.state.last_error = Some(e.user_message());
                }
                SessionEvent::Shutdown => {
                    info!("[UI] session worker stopped");
                }
            }
        }

        self.state.busy = self.session.is_busy();

        // Spoken whether or not the voice indicator is online
        if let Some(announcement) = self.session.session().consume_pending_announcement() {
            if let Err(e) = self.speech.announce(&announcement) {
                error!("[UI] failed to queue announcement: {}", e);
                self.state.last_error = Some(e.user_message());
            }
        }

        while let Ok(event) = self.speech_events.try_recv() {
            match event {
                SpeechEvent::Spoken { text, voice, .. } => {
                    debug!("[UI] spoken with voice {:?}", voice);
                    self.state.last_spoken = Some(text);
                }
                SpeechEvent::Error { error } => {
                    warn!("[UI] speech error: {}", error);
                    self.state.last_error = Some(error);
                }
                SpeechEvent::Shutdown => {
                    debug!("[UI] speech pipeline stopped");
                }
            }
        }
    }

    /// Carry out one user action
    pub fn apply_action(&mut self, action: DashboardAction) {
        let result = match action {
            DashboardAction::Submit(command) => {
                debug!("[UI] submit: {}", command);
                self.session.submit(command)
            }
            DashboardAction::Override(command) => {
                info!("[UI] override authorized for: {}", command);
                self.session.force_override(command)
            }
            DashboardAction::InitializeVoice => {
                self.state.voice_online = true;
                self.speech.greet().map(|_| ())
            }
        };

        if let Err(e) = result {
            error!("[UI] action failed: {}", e);
            self.state.last_error = Some(e.user_message());
        }
        self.state.busy = self.session.is_busy();
    }

    /// Run one frame: poll, render and apply actions
    pub fn frame(&mut self, ctx: &egui::Context) {
        self.initialize();
        self.poll_events();

        let snapshot = self.snapshot();
        let hash = self.hasher.generate_dna_hash(self.state.hash_input());
        let actions = render_dashboard(
            ctx,
            &mut self.state,
            &snapshot,
            &hash,
            &self.theme,
            self.animate,
        );

        for action in actions {
            self.apply_action(action);
        }

        // Keep polling while the worker is running
        if self.state.busy {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }
    }
}

impl eframe::App for OmniAuditApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.frame(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("[UI] Omni-Audit shutting down");
        if let Err(e) = self.session.shutdown() {
            warn!("[UI] session worker shutdown failed: {}", e);
        }
        if let Err(e) = self.speech.shutdown() {
            warn!("[UI] speech shutdown failed: {}", e);
        }
    }
}
