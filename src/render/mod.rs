//! Diagnostic plot rendering.
//!
//! All pages are rendered as standalone SVG documents assembled with
//! `std::fmt::Write`, and collected into a [`PagedDocument`] that writes
//! one numbered file per page.

pub mod curves;
pub mod document;
pub mod frame;
pub mod heatmap;

pub use curves::{attitude_page, position_difference_page, Curve, CurvePage};
pub use document::PagedDocument;
pub use frame::PlotFrame;
pub use heatmap::{covariance_page, spatial_error_page};

/// Color scheme for chart rendering
#[derive(Clone, Debug)]
pub struct ChartColorScheme {
    /// Page background
    pub background: &'static str,
    /// Plot area background
    pub plot_background: &'static str,
    /// Axis and frame stroke
    pub axis: &'static str,
    /// Grid line stroke
    pub grid: &'static str,
    /// Text color
    pub text: &'static str,
    /// Curve palette, cycled per curve
    pub palette: [&'static str; 4],
}

impl Default for ChartColorScheme {
    fn default() -> Self {
        Self {
            background: "#F8F8F8",
            plot_background: "#FFFFFF",
            axis: "#333333",
            grid: "#DDDDDD",
            text: "#333333",
            palette: ["#2222AA", "#AA2222", "#22AA22", "#AA8800"],
        }
    }
}

/// Configuration for chart rendering
#[derive(Clone, Debug)]
pub struct ChartConfig {
    /// Page width in pixels
    pub page_width: f32,
    /// Height of one chart panel in pixels
    pub panel_height: f32,
    /// Margin around the page and between panels
    pub margin: f32,
    /// Left gutter reserved for y tick labels
    pub left_gutter: f32,
    /// Curve stroke width
    pub curve_width: f32,
    /// Colors
    pub colors: ChartColorScheme,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            page_width: 900.0,
            panel_height: 260.0,
            margin: 20.0,
            left_gutter: 70.0,
            curve_width: 1.5,
            colors: ChartColorScheme::default(),
        }
    }
}
