//! System status card
//!
//! Security status, voice mode, DNA hash of the current input and the
//! override button.

use crate::session::SessionSnapshot;
use crate::ui::state::DashboardAction;
use crate::ui::theme::Theme;
use egui::{self, RichText, Vec2};

/// Status card component
pub struct StatusPanel<'a> {
    snapshot: &'a SessionSnapshot,
    hash: &'a str,
    theme: &'a Theme,
    busy: bool,
}

impl<'a> StatusPanel<'a> {
    pub fn new(snapshot: &'a SessionSnapshot, hash: &'a str, theme: &'a Theme) -> Self {
        Self {
            snapshot,
            hash,
            theme,
            busy: false,
        }
    }

    /// Disable the override button while a command is in flight
    pub fn busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }

    /// Draw the card; returns an override request when the button is clicked
    pub fn show(self, ui: &mut egui::Ui) -> Option<DashboardAction> {
        let mut action = None;

        self.theme.card_frame().show(ui, |ui| {
            ui.set_min_height(self.theme.card_height);
            ui.set_width(ui.available_width());

            ui.label(self.theme.card_title("System Status"));
            ui.add_space(self.theme.spacing_lg);

            let status = self.snapshot.status;
            let status_response = ui.label(
                RichText::new(status.as_str())
                    .size(34.0)
                    .strong()
                    .color(self.theme.status_color(status)),
            );
            let status_label = format!("Security status: {}", status);
            status_response.widget_info(|| {
                egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &status_label)
            });

            ui.add_space(self.theme.spacing);

            let voice_mode = if status.is_blocked() {
                "VOICE: AUTHORITATIVE"
            } else {
                "VOICE: NORMAL"
            };
            ui.label(RichText::new(voice_mode).monospace().color(self.theme.text_muted));

            ui.add_space(self.theme.spacing_sm);

            let hash_text = format!("HASH: {}", self.hash);
            let hash_response = ui.label(
                RichText::new(&hash_text)
                    .monospace()
                    .color(self.theme.text_muted),
            );
            hash_response.widget_info(|| {
                egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &hash_text)
            });

            if status.is_blocked() {
                ui.add_space(self.theme.spacing_lg);

                let button = egui::Button::new(
                    RichText::new("🔓 AUTHORIZE OVERRIDE")
                        .strong()
                        .color(egui::Color32::WHITE),
                )
                .fill(self.theme.error)
                .rounding(self.theme.button_rounding)
                .min_size(Vec2::new(ui.available_width(), 40.0));

                let enabled = !self.busy;
                let response = ui.add_enabled(enabled, button);
                response.widget_info(|| {
                    egui::WidgetInfo::labeled(egui::WidgetType::Button, enabled, "Authorize override")
                });

                if response.clicked() {
                    let command = self.snapshot.last_command.clone().unwrap_or_default();
                    action = Some(DashboardAction::Override(command));
                }
            }
        });

        action
    }
}
