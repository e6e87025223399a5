//! UI components for the Omni-Audit dashboard

mod command_bar;
mod helix;
mod log_panel;
mod status_panel;
mod voice_panel;

pub use command_bar::CommandBar;
pub use helix::{pair_geometry, Helix, PairGeometry, HELIX_ROWS};
pub use log_panel::LogPanel;
pub use status_panel::StatusPanel;
pub use voice_panel::VoicePanel;
