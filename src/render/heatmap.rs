//! Spatial error and covariance heatmap pages.

use std::fmt::Write;

use crate::core::types::CovarianceDiagonal;
use crate::io::EstimateSeries;
use crate::metrics::SeriesDiff;
use crate::render::frame::{format_tick, tick_step, ticks, PlotFrame};
use crate::render::ChartConfig;

/// Map a normalized value in [0, 1] to a blue → yellow → red ramp.
pub fn ramp_color(t: f64) -> String {
    let t = t.clamp(0.0, 1.0);
    // Anchors: #2244AA, #DDCC33, #BB2222
    let (r, g, b) = if t < 0.5 {
        let u = t * 2.0;
        (
            0x22 as f64 + u * (0xDD - 0x22) as f64,
            0x44 as f64 + u * (0xCC - 0x44) as f64,
            0xAA as f64 - u * (0xAA - 0x33) as f64,
        )
    } else {
        let u = (t - 0.5) * 2.0;
        (
            0xDD as f64 - u * (0xDD - 0xBB) as f64,
            0xCC as f64 - u * (0xCC - 0x22) as f64,
            0x33 as f64 - u * (0x33 - 0x22) as f64,
        )
    };
    format!("#{:02X}{:02X}{:02X}", r as u8, g as u8, b as u8)
}

/// Render a vertical color bar with min/max labels.
fn render_colorbar(
    svg: &mut String,
    config: &ChartConfig,
    x: f64,
    y: f64,
    height: f64,
    min_label: &str,
    max_label: &str,
    title: &str,
) {
    let slices = 40;
    let slice_h = height / slices as f64;
    for i in 0..slices {
        // Top of the bar is the maximum
        let t = 1.0 - i as f64 / (slices - 1) as f64;
        writeln!(
            svg,
            r#"    <rect x="{:.1}" y="{:.1}" width="14" height="{:.1}" fill="{}"/>"#,
            x,
            y + i as f64 * slice_h,
            slice_h + 0.5,
            ramp_color(t)
        )
        .unwrap();
    }
    writeln!(
        svg,
        r#"    <rect x="{:.1}" y="{:.1}" width="14" height="{:.1}" fill="none" stroke="{}" stroke-width="1"/>"#,
        x, y, height, config.colors.axis
    )
    .unwrap();
    writeln!(
        svg,
        r#"    <text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="10" fill="{}">{}</text>"#,
        x + 18.0,
        y + 8.0,
        config.colors.text,
        max_label
    )
    .unwrap();
    writeln!(
        svg,
        r#"    <text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="10" fill="{}">{}</text>"#,
        x + 18.0,
        y + height,
        config.colors.text,
        min_label
    )
    .unwrap();
    writeln!(
        svg,
        r#"    <text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="11" fill="{}" text-anchor="middle">{}</text>"#,
        x + 7.0,
        y - 10.0,
        config.colors.text,
        title
    )
    .unwrap();
}

/// Page showing the reference XY trajectory with each segment colored by
/// the position error magnitude at its endpoint.
pub fn spatial_error_page(diff: &SeriesDiff, config: &ChartConfig) -> String {
    let mut svg = String::new();

    let margin = config.margin as f64;
    let title_height = 30.0;
    let width = config.page_width as f64;
    let plot_size = width - config.left_gutter as f64 - 90.0 - margin; // square plot, colorbar on the right
    let height = title_height + margin + plot_size + 50.0;

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
        r#"  <text x="{:.0}" y="22" font-family="sans-serif" font-size="16" font-weight="bold" text-anchor="middle" fill="{}">Spatial position error: {} vs {}</text>"#,
        width / 2.0,
        config.colors.text,
        diff.compared_name,
        diff.reference_name
    )
    .unwrap();

    let xs: Vec<f64> = diff.samples.iter().map(|s| s.reference_position.x).collect();
    let ys: Vec<f64> = diff.samples.iter().map(|s| s.reference_position.y).collect();
    let (x_range, y_range) = square_ranges(min_max(&xs), min_max(&ys));

    let plot_x = config.left_gutter as f64;
    let plot_y = title_height + margin;
    let frame = PlotFrame::new(x_range, y_range, (plot_x, plot_y), plot_size, plot_size);

    writeln!(&mut svg, r#"  <g id="spatial-error">"#).unwrap();
    frame.render_axes(&mut svg, config, "x [m]", "y [m]");

    let max_error = diff
        .samples
        .iter()
        .map(|s| s.position_error)
        .fold(0.0f64, f64::max);
    let scale = if max_error > 0.0 { 1.0 / max_error } else { 0.0 };

    for pair in diff.samples.windows(2) {
        let a = &pair[0];
        let b = &pair[1];
        writeln!(
            &mut svg,
            r#"    <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="2.5" stroke-linecap="round"/>"#,
            frame.x_px(a.reference_position.x),
            frame.y_px(a.reference_position.y),
            frame.x_px(b.reference_position.x),
            frame.y_px(b.reference_position.y),
            ramp_color(b.position_error * scale)
        )
        .unwrap();
    }

    render_colorbar(
        &mut svg,
        config,
        plot_x + plot_size + 25.0,
        plot_y,
        plot_size,
        "0",
        &format!("{:.3}", max_error),
        "‖Δp‖ [m]",
    );

    writeln!(&mut svg, "  </g>").unwrap();
    writeln!(&mut svg, "</svg>").unwrap();
    svg
}

/// Maximum number of time bins in a covariance heatmap.
const MAX_TIME_BINS: usize = 240;

/// Page showing the covariance diagonal of one series as a component ×
/// time heatmap, colored by log₁₀ variance.
///
/// Returns `None` when the series does not log covariance.
pub fn covariance_page(series: &EstimateSeries, config: &ChartConfig) -> Option<String> {
    if !series.has_covariance() {
        return None;
    }

    let records = series.records();
    let bins = records.len().min(MAX_TIME_BINS);
    // Mean variance per component per bin
    let mut grid = vec![[0.0f64; 9]; bins];
    let mut counts = vec![0usize; bins];

    for (i, record) in records.iter().enumerate() {
        let bin = i * bins / records.len();
        let Some(cov) = record.covariance else {
            continue;
        };
        let values = cov.as_array();
        for (c, v) in values.iter().enumerate() {
            grid[bin][c] += v;
        }
        counts[bin] += 1;
    }
    for (bin, count) in counts.iter().enumerate() {
        if *count > 0 {
            for c in 0..9 {
                grid[bin][c] /= *count as f64;
            }
        }
    }

    // Log scale; variances at or below the floor clamp to it
    const LOG_FLOOR: f64 = -18.0;
    let log_grid: Vec<[f64; 9]> = grid
        .iter()
        .map(|row| {
            let mut out = [0.0f64; 9];
            for c in 0..9 {
                out[c] = if row[c] > 0.0 {
                    row[c].log10().max(LOG_FLOOR)
                } else {
                    LOG_FLOOR
                };
            }
            out
        })
        .collect();

    let mut log_min = f64::INFINITY;
    let mut log_max = f64::NEG_INFINITY;
    for row in &log_grid {
        for &v in row {
            log_min = log_min.min(v);
            log_max = log_max.max(v);
        }
    }
    let log_span = if log_max > log_min {
        log_max - log_min
    } else {
        1.0
    };

    let mut svg = String::new();

    let margin = config.margin as f64;
    let title_height = 30.0;
    let width = config.page_width as f64;
    let row_height = 28.0;
    let plot_x = config.left_gutter as f64;
    let plot_y = title_height + margin;
    let plot_width = width - plot_x - 90.0 - margin;
    let plot_height = row_height * 9.0;
    let height = plot_y + plot_height + 60.0;

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
        r#"  <text x="{:.0}" y="22" font-family="sans-serif" font-size="16" font-weight="bold" text-anchor="middle" fill="{}">Covariance diagonal: {}</text>"#,
        width / 2.0,
        config.colors.text,
        series.name()
    )
    .unwrap();

    writeln!(&mut svg, r#"  <g id="covariance-heatmap">"#).unwrap();

    let cell_width = plot_width / bins as f64;
    for (bin, row) in log_grid.iter().enumerate() {
        for (c, &v) in row.iter().enumerate() {
            let t = (v - log_min) / log_span;
            writeln!(
                &mut svg,
                r#"    <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
                plot_x + bin as f64 * cell_width,
                plot_y + c as f64 * row_height,
                cell_width + 0.5,
                row_height,
                ramp_color(t)
            )
            .unwrap();
        }
    }

    // Component labels on the left
    for (c, label) in CovarianceDiagonal::COMPONENT_LABELS.iter().enumerate() {
        writeln!(
            &mut svg,
            r#"    <text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="10" text-anchor="end" fill="{}">{}</text>"#,
            plot_x - 6.0,
            plot_y + c as f64 * row_height + row_height / 2.0 + 3.0,
            config.colors.text,
            label
        )
        .unwrap();
    }

    // Frame and time axis
    writeln!(
        &mut svg,
        r#"    <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="{}" stroke-width="1"/>"#,
        plot_x, plot_y, plot_width, plot_height, config.colors.axis
    )
    .unwrap();

    let duration = series.duration_secs();
    let step = tick_step(duration.max(f64::MIN_POSITIVE), 8);
    for tick in ticks(0.0, duration, step) {
        let px = plot_x + if duration > 0.0 { tick / duration } else { 0.0 } * plot_width;
        writeln!(
            &mut svg,
            r#"    <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="1"/>"#,
            px,
            plot_y + plot_height,
            px,
            plot_y + plot_height + 4.0,
            config.colors.axis
        )
        .unwrap();
        writeln!(
            &mut svg,
            r#"    <text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="10" text-anchor="middle" fill="{}">{}</text>"#,
            px,
            plot_y + plot_height + 16.0,
            config.colors.text,
            format_tick(tick, step)
        )
        .unwrap();
    }
    writeln!(
        &mut svg,
        r#"    <text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="11" text-anchor="middle" fill="{}">time [s]</text>"#,
        plot_x + plot_width / 2.0,
        plot_y + plot_height + 34.0,
        config.colors.text
    )
    .unwrap();

    render_colorbar(
        &mut svg,
        config,
        plot_x + plot_width + 25.0,
        plot_y,
        plot_height,
        &format!("{:.1}", log_min),
        &format!("{:.1}", log_max),
        "log₁₀ σ²",
    );

    writeln!(&mut svg, "  </g>").unwrap();
    writeln!(&mut svg, "</svg>").unwrap();
    Some(svg)
}

/// Widen the narrower of the two ranges to the span of the wider one,
/// keeping it centered. Equal spans on the square frame keep the
/// trajectory's aspect ratio: one meter maps to the same number of
/// pixels on both axes.
fn square_ranges(x: (f64, f64), y: (f64, f64)) -> ((f64, f64), (f64, f64)) {
    let half = 0.5 * (x.1 - x.0).max(y.1 - y.0);
    let cx = 0.5 * (x.0 + x.1);
    let cy = 0.5 * (y.0 + y.1);
    ((cx - half, cx + half), (cy - half, cy + half))
}

fn min_max(values: &[f64]) -> (f64, f64) {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if min.is_finite() {
        (min, max)
    } else {
        (0.0, 1.0)
    }
}
