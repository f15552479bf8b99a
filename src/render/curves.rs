//! Difference-vs-time curve pages.

use std::fmt::Write;

use crate::metrics::SeriesDiff;
use crate::render::frame::PlotFrame;
use crate::render::ChartConfig;

/// One labeled curve within a panel.
#[derive(Debug, Clone)]
pub struct Curve {
    /// Legend label
    pub label: String,
    /// Stroke color
    pub color: String,
    /// (x, y) samples in data coordinates
    pub points: Vec<(f64, f64)>,
}

impl Curve {
    /// Create a curve.
    pub fn new(label: impl Into<String>, color: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: label.into(),
            color: color.into(),
            points,
        }
    }
}

/// One chart panel: a shared frame with one or more curves.
#[derive(Debug, Clone)]
struct Panel {
    y_label: String,
    curves: Vec<Curve>,
}

/// A page of vertically stacked curve panels sharing the time axis.
#[derive(Debug, Clone)]
pub struct CurvePage {
    title: String,
    panels: Vec<Panel>,
}

impl CurvePage {
    /// Create an empty page.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            panels: Vec::new(),
        }
    }

    /// Add a panel. Panels render top to bottom in insertion order.
    pub fn with_panel(mut self, y_label: impl Into<String>, curves: Vec<Curve>) -> Self {
        self.panels.push(Panel {
            y_label: y_label.into(),
            curves,
        });
        self
    }

    /// Number of panels.
    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// Render the page to an SVG document.
    pub fn render(&self, config: &ChartConfig) -> String {
        let mut svg = String::new();

        let margin = config.margin as f64;
        let title_height = 30.0;
        let panel_height = config.panel_height as f64;
        let panel_gap = 45.0; // room for x tick labels and axis label
        let width = config.page_width as f64;
        let height = title_height
            + margin
            + self.panels.len() as f64 * (panel_height + panel_gap)
            + margin;

        writeln!(&mut svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#).unwrap();
        writeln!(
            &mut svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}">"#,
            width, height, width, height
        )
        .unwrap();
        writeln!(
            &mut svg,
            r#"  <rect width="100%" height="100%" fill="{}"/>"#,
            config.colors.background
        )
        .unwrap();
        writeln!(
            &mut svg,
            r#"  <text x="{:.0}" y="22" font-family="sans-serif" font-size="16" font-weight="bold" text-anchor="middle" fill="{}">{}</text>"#,
            width / 2.0,
            config.colors.text,
            self.title
        )
        .unwrap();

        let plot_x = config.left_gutter as f64;
        let plot_width = width - plot_x - margin;

        for (i, panel) in self.panels.iter().enumerate() {
            let plot_y = title_height + margin + i as f64 * (panel_height + panel_gap);
            let is_last = i == self.panels.len() - 1;
            self.render_panel(
                &mut svg,
                config,
                panel,
                plot_x,
                plot_y,
                plot_width,
                panel_height,
                if is_last { "time [s]" } else { "" },
            );
        }

        writeln!(&mut svg, "</svg>").unwrap();
        svg
    }

    #[allow(clippy::too_many_arguments)]
    fn render_panel(
        &self,
        svg: &mut String,
        config: &ChartConfig,
        panel: &Panel,
        plot_x: f64,
        plot_y: f64,
        plot_width: f64,
        plot_height: f64,
        x_label: &str,
    ) {
        let (x_range, y_range) = data_ranges(&panel.curves);
        let frame = PlotFrame::new(x_range, y_range, (plot_x, plot_y), plot_width, plot_height);

        writeln!(svg, r#"  <g id="panel-{}">"#, slugify(&panel.y_label)).unwrap();
        frame.render_axes(svg, config, x_label, &panel.y_label);

        for curve in &panel.curves {
            if curve.points.is_empty() {
                continue;
            }
            let mut path_d = String::new();
            for (i, &(x, y)) in curve.points.iter().enumerate() {
                let px = frame.x_px(x);
                let py = frame.y_px(y);
                if i == 0 {
                    write!(&mut path_d, "M {:.1} {:.1}", px, py).unwrap();
                } else {
                    write!(&mut path_d, " L {:.1} {:.1}", px, py).unwrap();
                }
            }
            writeln!(
                svg,
                r#"    <path d="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linejoin="round" opacity="0.9"/>"#,
                path_d, curve.color, config.curve_width
            )
            .unwrap();
        }

        // Legend along the panel's top edge
        let mut legend_x = plot_x + 10.0;
        for curve in &panel.curves {
            writeln!(
                svg,
                r#"    <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="3"/>"#,
                legend_x,
                plot_y + 12.0,
                legend_x + 22.0,
                plot_y + 12.0,
                curve.color
            )
            .unwrap();
            writeln!(
                svg,
                r#"    <text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="11" fill="{}">{}</text>"#,
                legend_x + 27.0,
                plot_y + 16.0,
                config.colors.text,
                curve.label
            )
            .unwrap();
            // Glyph count, not byte length: labels carry Δ and ‖
            legend_x += 27.0 + 8.0 * curve.label.chars().count() as f64 + 15.0;
        }

        writeln!(svg, "  </g>").unwrap();
    }
}

/// Union of data ranges over all curves in a panel.
fn data_ranges(curves: &[Curve]) -> ((f64, f64), (f64, f64)) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for curve in curves {
        for &(x, y) in &curve.points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }

    if !x_min.is_finite() {
        return ((0.0, 1.0), (0.0, 1.0));
    }
    ((x_min, x_max), (y_min, y_max))
}

fn slugify(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect()
}

/// Page with per-axis position differences and the difference norm.
pub fn position_difference_page(diff: &SeriesDiff, config: &ChartConfig) -> String {
    let palette = &config.colors.palette;

    let axis_curves = vec![
        Curve::new(
            "Δx",
            palette[0],
            diff.samples
                .iter()
                .map(|s| (s.time_s, s.position_delta.x))
                .collect(),
        ),
        Curve::new(
            "Δy",
            palette[1],
            diff.samples
                .iter()
                .map(|s| (s.time_s, s.position_delta.y))
                .collect(),
        ),
        Curve::new(
            "Δz",
            palette[2],
            diff.samples
                .iter()
                .map(|s| (s.time_s, s.position_delta.z))
                .collect(),
        ),
    ];
    let norm_curve = vec![Curve::new(
        "‖Δp‖",
        palette[3],
        diff.samples
            .iter()
            .map(|s| (s.time_s, s.position_error))
            .collect(),
    )];

    CurvePage::new(format!(
        "Position difference: {} vs {}",
        diff.compared_name, diff.reference_name
    ))
    .with_panel("position difference [m]", axis_curves)
    .with_panel("position error norm [m]", norm_curve)
    .render(config)
}

/// Page with the attitude angle difference, plus velocity difference
/// norm and outlier delta when those fields are logged.
pub fn attitude_page(diff: &SeriesDiff, config: &ChartConfig) -> String {
    let palette = &config.colors.palette;

    let mut page = CurvePage::new(format!(
        "Attitude and velocity: {} vs {}",
        diff.compared_name, diff.reference_name
    ))
    .with_panel(
        "attitude error [rad]",
        vec![Curve::new(
            "angle",
            palette[0],
            diff.samples
                .iter()
                .map(|s| (s.time_s, s.attitude_error))
                .collect(),
        )],
    );

    let velocity_points: Vec<(f64, f64)> = diff
        .samples
        .iter()
        .filter_map(|s| s.velocity_delta.map(|v| (s.time_s, v.norm())))
        .collect();
    if velocity_points.len() == diff.samples.len() {
        page = page.with_panel(
            "velocity error norm [m/s]",
            vec![Curve::new("‖Δv‖", palette[1], velocity_points)],
        );
    }

    let outlier_points: Vec<(f64, f64)> = diff
        .samples
        .iter()
        .filter_map(|s| s.outlier_delta.map(|d| (s.time_s, d as f64)))
        .collect();
    if outlier_points.len() == diff.samples.len() {
        page = page.with_panel(
            "outlier count delta",
            vec![Curve::new("Δoutliers", palette[2], outlier_points)],
        );
    }

    page.render(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::AlignedPair;
    use crate::core::quaternion::Quaternion;
    use crate::core::types::{EstimateRecord, Vec3};

    fn sample_diff(n: usize) -> SeriesDiff {
        let pairs: Vec<AlignedPair> = (0..n)
            .map(|i| {
                let ts = i as u64 * 100_000;
                let reference = EstimateRecord::new(
                    ts,
                    Vec3::new(i as f64 * 0.1, 0.0, 0.0),
                    Quaternion::identity(),
                );
                let mut other = reference;
                other.position.y += 0.05;
                AlignedPair {
                    timestamp_us: ts,
                    reference,
                    other,
                }
            })
            .collect();
        SeriesDiff::compute("ref", "cmp", &pairs)
    }

    #[test]
    fn test_curve_page_render() {
        let page = CurvePage::new("Test page")
            .with_panel(
                "value",
                vec![Curve::new("a", "#112233", vec![(0.0, 0.0), (1.0, 1.0)])],
            );
        let svg = page.render(&ChartConfig::default());

        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
        assert!(svg.contains("Test page"));
        assert!(svg.contains("#112233"));
        assert!(svg.contains("M ")); // curve path
    }

    #[test]
    fn test_position_page_has_all_panels() {
        let svg = position_difference_page(&sample_diff(20), &ChartConfig::default());
        assert!(svg.contains("position difference [m]"));
        assert!(svg.contains("position error norm [m]"));
        assert!(svg.contains("Δx"));
    }

    #[test]
    fn test_attitude_page_skips_missing_velocity() {
        let svg = attitude_page(&sample_diff(20), &ChartConfig::default());
        assert!(svg.contains("attitude error [rad]"));
        assert!(!svg.contains("velocity error norm"));
        assert!(!svg.contains("outlier count delta"));
    }

    #[test]
    fn test_legend_spacing_counts_glyphs() {
        let page = CurvePage::new("Legend").with_panel(
            "value",
            vec![
                Curve::new("‖Δv‖", "#111111", vec![(0.0, 0.0), (1.0, 1.0)]),
                Curve::new("x", "#222222", vec![(0.0, 1.0), (1.0, 0.0)]),
            ],
        );
        let svg = page.render(&ChartConfig::default());

        // First entry at 70 + 10, text offset 27; the 4-glyph label
        // advances the second entry by 27 + 8*4 + 15 pixels
        assert!(svg.contains(r#"<text x="107.0" y="66.0""#));
        assert!(svg.contains(r#"<text x="181.0" y="66.0""#));
    }

    #[test]
    fn test_empty_panel_renders() {
        let page = CurvePage::new("Empty").with_panel("value", vec![]);
        let svg = page.render(&ChartConfig::default());
        assert!(svg.contains("</svg>"));
    }
}
