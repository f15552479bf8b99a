//! Axis frame with tick placement and data-to-pixel mapping.

use std::fmt::Write;

use crate::render::ChartConfig;

/// Maps a data-coordinate rectangle onto a pixel rectangle and renders
/// the surrounding axes, ticks, and grid lines.
#[derive(Debug, Clone)]
pub struct PlotFrame {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    origin_x: f64,
    origin_y: f64,
    width_px: f64,
    height_px: f64,
}

impl PlotFrame {
    /// Create a frame. Degenerate data ranges are padded so every
    /// finite input maps somewhere sensible.
    pub fn new(
        x_range: (f64, f64),
        y_range: (f64, f64),
        origin_px: (f64, f64),
        width_px: f64,
        height_px: f64,
    ) -> Self {
        let (x_min, x_max) = pad_range(x_range);
        let (y_min, y_max) = pad_range(y_range);
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
            origin_x: origin_px.0,
            origin_y: origin_px.1,
            width_px,
            height_px,
        }
    }

    /// Pixel x for a data x.
    #[inline]
    pub fn x_px(&self, x: f64) -> f64 {
        self.origin_x + (x - self.x_min) / (self.x_max - self.x_min) * self.width_px
    }

    /// Pixel y for a data y. SVG y grows downward, so the data y axis
    /// is flipped.
    #[inline]
    pub fn y_px(&self, y: f64) -> f64 {
        self.origin_y + self.height_px - (y - self.y_min) / (self.y_max - self.y_min) * self.height_px
    }

    /// Data x range after padding.
    pub fn x_range(&self) -> (f64, f64) {
        (self.x_min, self.x_max)
    }

    /// Data y range after padding.
    pub fn y_range(&self) -> (f64, f64) {
        (self.y_min, self.y_max)
    }

    /// Render plot background, grid lines, frame, ticks, and labels.
    pub fn render_axes(&self, svg: &mut String, config: &ChartConfig, x_label: &str, y_label: &str) {
        let colors = &config.colors;

        // Plot background
        writeln!(
            svg,
            r#"    <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
            self.origin_x, self.origin_y, self.width_px, self.height_px, colors.plot_background
        )
        .unwrap();

        // X ticks with vertical grid lines
        let x_step = tick_step(self.x_max - self.x_min, 8);
        for tick in ticks(self.x_min, self.x_max, x_step) {
            let px = self.x_px(tick);
            writeln!(
                svg,
                r#"    <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="1"/>"#,
                px,
                self.origin_y,
                px,
                self.origin_y + self.height_px,
                colors.grid
            )
            .unwrap();
            writeln!(
                svg,
                r#"    <text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="10" text-anchor="middle" fill="{}">{}</text>"#,
                px,
                self.origin_y + self.height_px + 14.0,
                colors.text,
                format_tick(tick, x_step)
            )
            .unwrap();
        }

        // Y ticks with horizontal grid lines
        let y_step = tick_step(self.y_max - self.y_min, 6);
        for tick in ticks(self.y_min, self.y_max, y_step) {
            let py = self.y_px(tick);
            writeln!(
                svg,
                r#"    <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="1"/>"#,
                self.origin_x,
                py,
                self.origin_x + self.width_px,
                py,
                colors.grid
            )
            .unwrap();
            writeln!(
                svg,
                r#"    <text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="10" text-anchor="end" fill="{}">{}</text>"#,
                self.origin_x - 6.0,
                py + 3.0,
                colors.text,
                format_tick(tick, y_step)
            )
            .unwrap();
        }

        // Frame on top of the grid
        writeln!(
            svg,
            r#"    <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="{}" stroke-width="1"/>"#,
            self.origin_x, self.origin_y, self.width_px, self.height_px, colors.axis
        )
        .unwrap();

        // Axis labels
        if !x_label.is_empty() {
            writeln!(
                svg,
                r#"    <text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="11" text-anchor="middle" fill="{}">{}</text>"#,
                self.origin_x + self.width_px / 2.0,
                self.origin_y + self.height_px + 30.0,
                colors.text,
                x_label
            )
            .unwrap();
        }
        if !y_label.is_empty() {
            let label_x = self.origin_x - 48.0;
            let label_y = self.origin_y + self.height_px / 2.0;
            writeln!(
                svg,
                r#"    <text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="11" text-anchor="middle" fill="{}" transform="rotate(-90 {:.1} {:.1})">{}</text>"#,
                label_x, label_y, colors.text, label_x, label_y, y_label
            )
            .unwrap();
        }
    }
}

/// Pad a degenerate range so division by the span is safe.
fn pad_range((min, max): (f64, f64)) -> (f64, f64) {
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if max > min {
        return (min, max);
    }
    let pad = if min.abs() > f64::EPSILON {
        min.abs() * 0.05
    } else {
        0.5
    };
    (min - pad, min + pad)
}

/// Rounded tick step for a span: the 1/2/5 decade multiple that yields
/// roughly `target` ticks.
pub fn tick_step(span: f64, target: usize) -> f64 {
    let raw = span.abs().max(f64::MIN_POSITIVE) / target.max(1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    // Tolerance absorbs float noise so e.g. 0.07/7 still lands on 0.01
    let normalized = raw / magnitude;
    let step = if normalized <= 1.0 + 1e-9 {
        1.0
    } else if normalized <= 2.0 + 1e-9 {
        2.0
    } else if normalized <= 5.0 + 1e-9 {
        5.0
    } else {
        10.0
    };
    step * magnitude
}

/// Tick positions covering [min, max] at multiples of `step`.
pub fn ticks(min: f64, max: f64, step: f64) -> Vec<f64> {
    let mut out = Vec::new();
    if step <= 0.0 || !step.is_finite() {
        return out;
    }
    let mut i = (min / step).ceil() as i64;
    let eps = step * 1e-9;
    while i as f64 * step <= max + eps {
        out.push(i as f64 * step);
        i += 1;
    }
    out
}

/// Format a tick label with decimals appropriate for the step size.
pub fn format_tick(value: f64, step: f64) -> String {
    if step >= 1.0 {
        format!("{:.0}", value)
    } else if step >= 1e-4 {
        let decimals = (-step.log10().floor()) as usize;
        format!("{:.*}", decimals, value)
    } else {
        format!("{:.1e}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tick_step_decades() {
        assert_relative_eq!(tick_step(10.0, 10), 1.0);
        assert_relative_eq!(tick_step(10.0, 5), 2.0);
        assert_relative_eq!(tick_step(100.0, 4), 50.0);
        assert_relative_eq!(tick_step(0.07, 7), 0.01);
    }

    #[test]
    fn test_ticks_cover_range() {
        let t = ticks(0.0, 1.0, 0.25);
        assert_eq!(t.len(), 5);
        assert_relative_eq!(t[0], 0.0);
        assert_relative_eq!(t[4], 1.0);
    }

    #[test]
    fn test_ticks_negative_range() {
        let t = ticks(-1.0, 1.0, 0.5);
        assert_eq!(t.len(), 5);
        assert_relative_eq!(t[0], -1.0);
        assert_relative_eq!(t[2], 0.0);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(5.0, 1.0), "5");
        assert_eq!(format_tick(0.25, 0.05), "0.25");
        assert_eq!(format_tick(0.5, 0.25), "0.5");
    }

    #[test]
    fn test_frame_mapping() {
        let frame = PlotFrame::new((0.0, 10.0), (0.0, 1.0), (100.0, 50.0), 500.0, 200.0);

        assert_relative_eq!(frame.x_px(0.0), 100.0);
        assert_relative_eq!(frame.x_px(10.0), 600.0);
        // y flipped: data max at pixel top
        assert_relative_eq!(frame.y_px(1.0), 50.0);
        assert_relative_eq!(frame.y_px(0.0), 250.0);
    }

    #[test]
    fn test_frame_degenerate_range_padded() {
        let frame = PlotFrame::new((5.0, 5.0), (0.0, 0.0), (0.0, 0.0), 100.0, 100.0);
        let (x_min, x_max) = frame.x_range();
        assert!(x_max > x_min);
        let px = frame.x_px(5.0);
        assert!(px.is_finite());
        assert_relative_eq!(px, 50.0);
    }

    #[test]
    fn test_render_axes_produces_svg() {
        let frame = PlotFrame::new((0.0, 10.0), (0.0, 1.0), (70.0, 20.0), 500.0, 200.0);
        let mut svg = String::new();
        frame.render_axes(&mut svg, &ChartConfig::default(), "time [s]", "error [m]");

        assert!(svg.contains("time [s]"));
        assert!(svg.contains("error [m]"));
        assert!(svg.contains("<rect"));
        assert!(svg.contains("<line"));
    }
}
