//! Genetic helix animation
//!
//! Rows of base pairs rotating around a vertical axis. Each row lags the one
//! above it by a fixed phase, which produces the twisted-ladder look. The
//! dots turn red while the session is BLOCKED.

use crate::ui::theme::Theme;
use egui::{self, Color32, Pos2, Stroke, Vec2};
use std::f32::consts::TAU;

/// Number of base-pair rows
pub const HELIX_ROWS: usize = 18;
/// Vertical distance between rows
pub const ROW_SPACING: f32 = 20.0;
/// Seconds for one full rotation
pub const ROTATION_PERIOD_SECS: f64 = 4.0;
/// Phase lead of each row relative to the previous one
pub const ROW_PHASE_SECS: f64 = 0.2;

const HELIX_WIDTH: f32 = 100.0;
const DOT_RADIUS: f32 = 6.0;

/// Position of one base pair at a moment in time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairGeometry {
    /// Horizontal offset of the right dot from the axis, in [-1, 1];
    /// the left dot mirrors it
    pub offset: f32,
    /// Depth of the right dot in [-1, 1]; positive is towards the viewer
    pub depth: f32,
}

/// Geometry for row `row` at `time` seconds
pub fn pair_geometry(row: usize, time: f64) -> PairGeometry {
    let phase = ((time + row as f64 * ROW_PHASE_SECS) / ROTATION_PERIOD_SECS).rem_euclid(1.0);
    let angle = phase as f32 * TAU;
    PairGeometry {
        offset: angle.cos(),
        depth: angle.sin(),
    }
}

/// Helix animation component
pub struct Helix<'a> {
    theme: &'a Theme,
    mutated: bool,
    animate: bool,
}

impl<'a> Helix<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            theme,
            mutated: false,
            animate: true,
        }
    }

    /// Draw the pairs in the alert colour
    pub fn mutated(mut self, mutated: bool) -> Self {
        self.mutated = mutated;
        self
    }

    /// Keep requesting frames so the helix rotates
    pub fn animate(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let height = HELIX_ROWS as f32 * ROW_SPACING;
        let desired_size = Vec2::new(ui.available_width(), height);
        let (rect, response) = ui.allocate_exact_size(desired_size, egui::Sense::hover());

        let time = ui.ctx().input(|i| i.time);
        let painter = ui.painter();
        let center_x = rect.center().x;
        let half_width = HELIX_WIDTH / 2.0;

        let (left_color, right_color) = if self.mutated {
            (self.theme.error, self.theme.error)
        } else {
            (self.theme.primary, self.theme.secondary)
        };

        for row in 0..HELIX_ROWS {
            let geometry = pair_geometry(row, time);
            let y = rect.top() + row as f32 * ROW_SPACING + ROW_SPACING / 2.0;
            let dx = geometry.offset * half_width;

            let left = Pos2::new(center_x - dx, y);
            let right = Pos2::new(center_x + dx, y);

            painter.line_segment([left, right], Stroke::new(1.0, self.theme.strand));

            // Far dots are drawn smaller and dimmer
            let right_scale = 0.75 + 0.25 * geometry.depth;
            let left_scale = 0.75 - 0.25 * geometry.depth;
            self.draw_dot(painter, left, left_color, left_scale);
            self.draw_dot(painter, right, right_color, right_scale);
        }

        if self.animate {
            ui.ctx().request_repaint();
        }
        response
    }

    fn draw_dot(&self, painter: &egui::Painter, center: Pos2, color: Color32, scale: f32) {
        // Glow
        painter.circle_filled(center, DOT_RADIUS * scale * 2.0, color.gamma_multiply(0.15));
        painter.circle_filled(center, DOT_RADIUS * scale, color.gamma_multiply(scale));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_period() {
        let start = pair_geometry(0, 0.0);
        let later = pair_geometry(0, ROTATION_PERIOD_SECS);
        assert!((start.offset - later.offset).abs() < 1e-5);
        assert!((start.offset - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_rows_are_phase_shifted() {
        // Row 5 leads row 0 by a quarter turn (5 * 0.2s of a 4s period)
        let row5 = pair_geometry(5, 0.0);
        assert!(row5.offset.abs() < 1e-5);
        assert!((row5.depth - 1.0).abs() < 1e-5);
        let row0 = pair_geometry(0, 1.0);
        assert!((row5.offset - row0.offset).abs() < 1e-5);
        assert!((row5.depth - row0.depth).abs() < 1e-5);
    }

    #[test]
    fn test_offsets_stay_in_range() {
        for row in 0..HELIX_ROWS {
            let g = pair_geometry(row, 12.345);
            assert!((-1.0..=1.0).contains(&g.offset));
            assert!((-1.0..=1.0).contains(&g.depth));
        }
    }
}
