//! Theme and styling for the Omni-Audit dashboard
//!
//! Dark "terminal" palette: near-black background, bordered cards, green for
//! allowed traffic, red for blocks and blue for the assistant.

use crate::session::{LogKind, SecurityStatus};
use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Vec2, Visuals};

/// Application theme configuration
#[derive(Clone, Debug)]
pub struct Theme {
    /// Assistant / accent blue
    pub primary: Color32,
    /// Secondary accent (helix right strand)
    pub secondary: Color32,
    /// Allowed / SECURE green
    pub success: Color32,
    /// Blocked / BLOCKED red
    pub error: Color32,
    pub warning: Color32,

    /// Background colors
    pub bg_primary: Color32,
    pub bg_card: Color32,
    pub bg_item: Color32,
    pub border: Color32,

    /// Text colors
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub text_allow: Color32,
    pub text_block: Color32,

    /// Helix strand bar
    pub strand: Color32,

    pub card_rounding: Rounding,
    pub item_rounding: Rounding,
    pub button_rounding: Rounding,

    /// Height of the three dashboard cards
    pub card_height: f32,

    /// Standard spacing
    pub spacing: f32,
    /// Large spacing
    pub spacing_lg: f32,
    /// Small spacing
    pub spacing_sm: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create the dark theme
    pub fn dark() -> Self {
        Self {
            primary: Color32::from_rgb(88, 166, 255),    // Blue
            secondary: Color32::from_rgb(188, 140, 255), // Purple
            success: Color32::from_rgb(46, 160, 67),     // Green
            error: Color32::from_rgb(248, 81, 73),       // Red
            warning: Color32::from_rgb(210, 153, 34),    // Amber

            bg_primary: Color32::from_rgb(11, 14, 20),
            bg_card: Color32::from_rgb(18, 22, 29),
            bg_item: Color32::from_rgba_unmultiplied(255, 255, 255, 8),
            border: Color32::from_rgb(48, 54, 61),

            text_primary: Color32::from_rgb(201, 209, 217),
            text_muted: Color32::from_rgb(139, 148, 158),
            text_allow: Color32::from_rgb(126, 231, 135),
            text_block: Color32::from_rgb(255, 123, 114),

            strand: Color32::from_rgba_unmultiplied(255, 255, 255, 51),

            card_rounding: Rounding::same(12.0),
            item_rounding: Rounding::same(6.0),
            button_rounding: Rounding::same(8.0),

            card_height: 620.0,

            spacing: 16.0,
            spacing_lg: 24.0,
            spacing_sm: 8.0,
        }
    }

    /// Accent bar and text colour for a log entry
    pub fn log_colors(&self, kind: LogKind) -> (Color32, Color32) {
        match kind {
            LogKind::Block => (self.error, self.text_block),
            LogKind::Allow => (self.success, self.text_allow),
            LogKind::Bot => (self.primary, self.text_primary),
        }
    }

    pub fn status_color(&self, status: SecurityStatus) -> Color32 {
        match status {
            SecurityStatus::Secure => self.success,
            SecurityStatus::Blocked => self.error,
        }
    }

    /// Apply this theme to egui
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::dark();

        // Panel backgrounds
        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.bg_card;
        visuals.extreme_bg_color = self.bg_card;

        // Widget colors
        visuals.widgets.noninteractive.bg_fill = self.bg_card;
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_muted);

        visuals.widgets.inactive.bg_fill = self.bg_card;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.hovered.bg_fill = self.primary.gamma_multiply(0.4);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.active.bg_fill = self.primary.gamma_multiply(0.6);
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.text_primary);

        // Text selection
        visuals.selection.bg_fill = self.primary.gamma_multiply(0.3);
        visuals.selection.stroke = Stroke::new(1.0, self.primary);

        visuals.window_rounding = self.card_rounding;
        visuals.window_stroke = Stroke::new(1.0, self.border);

        ctx.set_visuals(visuals);

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = Vec2::splat(self.spacing_sm);
        style.spacing.button_padding = Vec2::new(self.spacing, self.spacing_sm);

        style.text_styles.insert(
            egui::TextStyle::Heading,
            FontId::new(26.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Body,
            FontId::new(14.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Monospace,
            FontId::new(11.0, FontFamily::Monospace),
        );
        style.text_styles.insert(
            egui::TextStyle::Small,
            FontId::new(11.0, FontFamily::Proportional),
        );

        ctx.set_style(style);
    }

    /// Frame used for the three dashboard cards
    pub fn card_frame(&self) -> egui::Frame {
        egui::Frame::none()
            .fill(self.bg_card)
            .stroke(Stroke::new(1.0, self.border))
            .rounding(self.card_rounding)
            .inner_margin(egui::Margin::same(20.0))
    }

    /// Small uppercase title at the top of a card
    pub fn card_title(&self, text: &str) -> egui::RichText {
        egui::RichText::new(text.to_uppercase())
            .size(11.0)
            .strong()
            .color(self.text_muted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_colors_by_kind() {
        let theme = Theme::dark();
        assert_eq!(theme.log_colors(LogKind::Block).0, theme.error);
        assert_eq!(theme.log_colors(LogKind::Allow).0, theme.success);
        assert_eq!(theme.log_colors(LogKind::Bot).0, theme.primary);
    }

    #[test]
    fn test_status_color() {
        let theme = Theme::dark();
        assert_eq!(theme.status_color(SecurityStatus::Secure), theme.success);
        assert_eq!(theme.status_color(SecurityStatus::Blocked), theme.error);
    }
}
