//! Air-Quality Cleaning Library
//!
//! Cleaning for the UCI air-quality dataset built with Rust and Polars.
//!
//! # Overview
//!
//! The station encodes a missing reading as `-200`, but the raw file carries
//! that code in several spellings: `-200`, `-200.0` and, because the file
//! uses the comma as decimal mark, `-200,0`. Downstream statistics and plots
//! are skewed by every spelling that slips through. This library provides:
//!
//! - **Sentinel Normalization**: every recognized spelling of the sentinel,
//!   in text or numeric cells, becomes NaN; the targeted columns become
//!   Float64
//! - **Loading**: reading the semicolon-delimited file as raw text and
//!   dropping the empty columns/rows its trailing separators produce
//! - **Timestamps**: assembling a single timestamp from the `Date` and
//!   `Time` columns
//! - **Reporting**: per-column counts of replaced sentinels and unparseable
//!   cells, and missing-value percentages
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use airq_processing::{Cleaner, CleaningConfig, LoaderOptions, load_dataset};
//!
//! let df = load_dataset("data/AirQualityUCI.csv", &LoaderOptions::default())?;
//! let result = Cleaner::new(CleaningConfig::default())?.clean(df)?;
//!
//! for column in &result.report.columns {
//!     println!("{}: {:.1}% missing", column.column, column.missing_percentage());
//! }
//! ```
//!
//! Normalizing a handful of columns directly:
//!
//! ```rust,ignore
//! use airq_processing::normalize_sentinels;
//!
//! let df = normalize_sentinels(df, &["CO(GT)", "NOx(GT)"])?;
//! ```
//!
//! Cells that are neither a sentinel nor a number also become NaN; they never
//! abort the run. A requested column that is absent is reported as
//! [`CleaningError::MissingColumn`] unless
//! [`MissingColumnPolicy::Skip`] is configured.

pub mod cleaner;
pub mod config;
pub mod error;
pub mod loader;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{
    Cleaner, CleanedDataset, DEFAULT_SENTINEL_FORMS, NormalizationOutcome, SentinelNormalizer,
    SentinelSet, classify_text, classify_value, normalize_sentinels,
};
pub use config::{
    CleaningConfig, CleaningConfigBuilder, ConfigValidationError, DEFAULT_NUMERIC_COLUMNS,
    LoaderOptions, MissingColumnPolicy,
};
pub use error::{CleaningError, Result as CleaningResult, ResultExt};
pub use loader::{drop_empty_columns, drop_empty_rows, load_dataset, parse_dataset, save_dataset};
pub use types::{CellOutcome, ColumnMissing, ColumnNormalization, NormalizationReport};
pub use utils::{is_error_marker, missing_count, missing_percentages, parse_numeric_string};
