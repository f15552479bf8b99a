//! # Tulana
//!
//! Offline comparison and diagnostics for EKF state-estimate logs.
//!
//! ## Overview
//!
//! Tulana ingests timestamped estimate logs (position, orientation,
//! velocity, IMU biases, covariance diagonal, outlier counts) from a
//! state estimator, aligns a reference series with one or more
//! comparison series in time, computes positional and angular
//! differences with RMSE summaries, and renders diagnostic plots as a
//! paged SVG document.
//!
//! The pipeline is linear and fully in-memory:
//!
//! ```text
//! ┌──────────┐    ┌───────────────┐    ┌──────────┐
//! │   io/    │ →  │ align/        │ →  │ render/  │
//! │ (parse)  │    │ metrics/      │    │ (pages)  │
//! └──────────┘    │ (diff + RMSE) │    └──────────┘
//!                 └───────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use tulana::{align, AlignConfig, EstimateSeries, SeriesDiff};
//!
//! let reference = EstimateSeries::load(Path::new("ekf_a.log"))?;
//! let compared = EstimateSeries::load(Path::new("ekf_b.log"))?;
//!
//! let pairs = align(&reference, &compared, &AlignConfig::default());
//! let diff = SeriesDiff::compute(reference.name(), compared.name(), &pairs);
//! diff.summary().print();
//! ```
//!
//! ## Conventions
//!
//! - Timestamps are microseconds internally; log files carry seconds.
//! - Orientations are unit quaternions in `w x y z` order, renormalized
//!   on load. Angular differences are reported in radians, in [0, π].

#![warn(missing_docs)]

// Time alignment between series
pub mod align;

// Foundation types and math
pub mod core;

// Error types
pub mod error;

// Log file ingestion
pub mod io;

// Differencing and aggregate statistics
pub mod metrics;

// Plot rendering
pub mod render;

pub use align::{align, AlignConfig, AlignMethod, AlignedPair};
pub use core::quaternion::Quaternion;
pub use core::types::{CovarianceDiagonal, EstimateRecord, Vec3};
pub use error::{Result, TulanaError};
pub use io::EstimateSeries;
pub use metrics::{DiffSummary, ErrorStats, SeriesDiff};
pub use render::{ChartConfig, PagedDocument};
