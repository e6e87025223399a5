//! GUI implementation with egui/eframe
//!
//! Desktop dashboard for Omni-Audit: command bar, neural logs, helix
//! animation, system status and the audio interface side panel.

mod app;
pub mod components;
mod state;
mod theme;

pub use app::{render_dashboard, OmniAuditApp};
pub use state::{DashboardAction, DashboardState};
pub use theme::Theme;

use crate::config::AppConfig;
use crate::external::DnaHasher;
use crate::session::SessionHandle;
use crate::speech::SpeechPipeline;
use std::sync::Arc;

/// Run the Omni-Audit dashboard
pub fn run(
    config: AppConfig,
    session: SessionHandle,
    speech: SpeechPipeline,
    hasher: Arc<dyn DnaHasher>,
) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([960.0, 640.0])
            .with_title("Omni-Audit AI Oversight"),
        ..Default::default()
    };

    eframe::run_native(
        "Omni-Audit",
        options,
        Box::new(move |cc| Ok(Box::new(OmniAuditApp::new(cc, config, session, speech, hasher)))),
    )
}
