//! Audio interface side panel

use crate::ui::state::{DashboardAction, DashboardState};
use crate::ui::theme::Theme;
use egui::{self, RichText, Vec2};

/// Voice controls and the last spoken line
pub struct VoicePanel<'a> {
    state: &'a DashboardState,
    theme: &'a Theme,
}

impl<'a> VoicePanel<'a> {
    pub fn new(state: &'a DashboardState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) -> Option<DashboardAction> {
        let mut action = None;

        ui.label(
            RichText::new("Audio Interface")
                .size(16.0)
                .strong()
                .color(self.theme.text_primary),
        );
        ui.add_space(self.theme.spacing);

        let button = egui::Button::new(
            RichText::new("🚀 INITIALIZE VOICE")
                .strong()
                .color(egui::Color32::WHITE),
        )
        .fill(self.theme.primary)
        .rounding(self.theme.button_rounding)
        .min_size(Vec2::new(ui.available_width(), 40.0));

        let response = ui.add(button);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::Button, true, "Initialize voice")
        });
        if response.clicked() {
            action = Some(DashboardAction::InitializeVoice);
        }

        ui.add_space(self.theme.spacing);

        if self.state.voice_online {
            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(Vec2::splat(10.0), egui::Sense::hover());
                ui.painter()
                    .circle_filled(rect.center(), 5.0, self.theme.success);
                ui.label(RichText::new("Voice Online").color(self.theme.success));
            });
        } else {
            ui.label(RichText::new("Voice Offline").color(self.theme.text_muted));
        }

        if let Some(spoken) = &self.state.last_spoken {
            ui.add_space(self.theme.spacing_sm);
            ui.label(self.theme.card_title("Last spoken"));
            let response = ui.label(
                RichText::new(spoken)
                    .italics()
                    .size(12.0)
                    .color(self.theme.text_muted),
            );
            let a11y = format!("Last spoken: {}", spoken);
            response.widget_info(|| {
                egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &a11y)
            });
        }

        if let Some(error) = &self.state.last_error {
            ui.add_space(self.theme.spacing);
            let error_text = format!("⚠ {}", error);
            let response = ui.label(RichText::new(&error_text).size(12.0).color(self.theme.warning));
            response.widget_info(|| {
                egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &error_text)
            });
        }

        action
    }
}
