//! Command bar component
//!
//! Single-line protocol command input with a submit button.

use crate::session::SessionSnapshot;
use crate::ui::state::{DashboardAction, DashboardState};
use crate::ui::theme::Theme;
use egui::{self, Key, RichText, Vec2};

/// Command input bar
pub struct CommandBar<'a> {
    state: &'a mut DashboardState,
    snapshot: &'a SessionSnapshot,
    theme: &'a Theme,
}

impl<'a> CommandBar<'a> {
    pub fn new(
        state: &'a mut DashboardState,
        snapshot: &'a SessionSnapshot,
        theme: &'a Theme,
    ) -> Self {
        Self {
            state,
            snapshot,
            theme,
        }
    }

    /// Draw the bar; returns a submit request on Enter or button click
    pub fn show(mut self, ui: &mut egui::Ui) -> Option<DashboardAction> {
        let mut submit = false;
        let busy = self.state.busy;

        egui::Frame::none()
            .fill(self.theme.bg_card)
            .stroke(egui::Stroke::new(1.0, self.theme.border))
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    // Reserve space for the submit button
                    let available_width = ui.available_width() - 110.0;

                    let text_edit = egui::TextEdit::singleline(&mut self.state.input_text)
                        .hint_text("Enter Protocol Command")
                        .desired_width(available_width)
                        .font(egui::TextStyle::Body)
                        .margin(egui::Margin::symmetric(12.0, 8.0))
                        .id(egui::Id::new("command_input"));

                    let response = ui.add_enabled(!busy, text_edit);
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(
                            egui::WidgetType::TextEdit,
                            !busy,
                            "Command input",
                        )
                    });

                    if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                        submit = true;
                    }

                    let label = if busy { "⏳" } else { "Submit" };
                    let button = egui::Button::new(
                        RichText::new(label).strong().color(egui::Color32::WHITE),
                    )
                    .min_size(Vec2::new(96.0, 36.0))
                    .rounding(self.theme.button_rounding)
                    .fill(self.theme.primary);

                    let can_submit = !busy && !self.state.input_text.trim().is_empty();
                    let button_response = ui.add_enabled(can_submit, button);
                    button_response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Button, can_submit, "Submit command")
                    });

                    if button_response.clicked() {
                        submit = true;
                    }
                });
            });

        if submit {
            self.state
                .pending_submit(self.snapshot)
                .map(DashboardAction::Submit)
        } else {
            None
        }
    }
}
