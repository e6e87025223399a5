//! Neural log panel
//!
//! Shows the most recent session log entries, newest first, each with a
//! coloured accent bar for its kind.

use crate::session::{LogEntry, SessionSnapshot};
use crate::ui::theme::Theme;
use egui::{self, RichText, ScrollArea, Stroke};

/// Log panel component
pub struct LogPanel<'a> {
    snapshot: &'a SessionSnapshot,
    theme: &'a Theme,
}

impl<'a> LogPanel<'a> {
    pub fn new(snapshot: &'a SessionSnapshot, theme: &'a Theme) -> Self {
        Self { snapshot, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        self.theme.card_frame().show(ui, |ui| {
            ui.set_min_height(self.theme.card_height);
            ui.set_width(ui.available_width());

            ui.label(self.theme.card_title("Neural Logs"));
            ui.add_space(self.theme.spacing);

            if self.snapshot.recent_logs.is_empty() {
                ui.label(
                    RichText::new("No activity yet. Submit a protocol command to begin.")
                        .size(12.0)
                        .color(self.theme.text_muted),
                );
                return;
            }

            ScrollArea::vertical()
                .id_salt("neural_logs")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for entry in &self.snapshot.recent_logs {
                        self.show_entry(ui, entry);
                        ui.add_space(self.theme.spacing_sm);
                    }
                });
        });
    }

    fn show_entry(&self, ui: &mut egui::Ui, entry: &LogEntry) {
        let (accent, text_color) = self.theme.log_colors(entry.kind);

        let inner = egui::Frame::none()
            .fill(self.theme.bg_item)
            .rounding(self.theme.item_rounding)
            .inner_margin(egui::Margin::same(10.0))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal_wrapped(|ui| {
                    ui.label(
                        RichText::new(format!("[{}]", entry.time_label()))
                            .monospace()
                            .strong()
                            .color(text_color),
                    );
                    let response = ui.label(RichText::new(&entry.text).monospace().color(text_color));
                    let a11y = format!("{} log: {}", entry.kind.as_str(), entry.text);
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &a11y)
                    });
                });
            });

        // Accent bar on the left edge
        let rect = inner.response.rect;
        ui.painter().line_segment(
            [rect.left_top(), rect.left_bottom()],
            Stroke::new(3.0, accent),
        );
    }
}
