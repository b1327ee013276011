//! Data cleaning for the air-quality dataset.
//!
//! This module provides functionality for:
//! - Recognizing every raw form of the missing-value sentinel
//! - Rewriting sentinels and unparseable cells to NaN in numeric columns
//! - Assembling a timestamp column from the separate date and time columns

mod converters;
pub mod datetime;
mod normalizer;
mod sentinel;

pub use converters::{classify_text, classify_value};
pub use normalizer::{NormalizationOutcome, SentinelNormalizer, normalize_sentinels};
pub use sentinel::{DEFAULT_SENTINEL_FORMS, SentinelSet};

use crate::config::CleaningConfig;
use crate::error::{CleaningError, Result};
use crate::types::NormalizationReport;
use polars::prelude::*;
use std::time::Instant;
use tracing::info;

/// Cleaned data plus the report describing what was changed.
#[derive(Debug, Clone)]
pub struct CleanedDataset {
    pub data: DataFrame,
    pub report: NormalizationReport,
}

/// Runs a full cleaning pass as described by a [`CleaningConfig`].
///
/// # Example
///
/// ```rust,ignore
/// use airq_processing::{Cleaner, CleaningConfig, load_dataset, LoaderOptions};
///
/// let df = load_dataset("data/AirQualityUCI.csv", &LoaderOptions::default())?;
/// let result = Cleaner::new(CleaningConfig::default())?.clean(df)?;
///
/// println!(
///     "{} sentinel values replaced",
///     result.report.total_sentinels_replaced()
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Cleaner {
    config: CleaningConfig,
    normalizer: SentinelNormalizer,
}

static_assertions::assert_impl_all!(Cleaner: Send, Sync);

impl Cleaner {
    /// Create a cleaner, validating the configuration first.
    pub fn new(config: CleaningConfig) -> Result<Self> {
        config.validate().map_err(CleaningError::from)?;

        let normalizer = SentinelNormalizer::new(config.sentinels.clone())
            .with_decimal_comma(config.decimal_comma)
            .with_missing_column_policy(config.missing_column_policy);

        Ok(Self { config, normalizer })
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Normalize the configured numeric columns and, if enabled, add the
    /// timestamp column.
    pub fn clean(&self, df: DataFrame) -> Result<CleanedDataset> {
        let start_time = Instant::now();
        let rows = df.height();

        info!(
            "Cleaning dataset: {} rows, {} columns",
            rows,
            df.width()
        );

        let outcome = self
            .normalizer
            .normalize(df, self.config.numeric_columns.as_slice())?;
        let mut data = outcome.data;

        let mut timestamps_parsed = None;
        if self.config.assemble_timestamps {
            let (with_timestamps, parsed) = datetime::assemble_timestamps(
                data,
                &self.config.date_column,
                &self.config.time_column,
                &self.config.timestamp_column,
                self.config.day_first,
            )
            .map_err(|e| CleaningError::NormalizationFailed {
                column: self.config.timestamp_column.clone(),
                reason: e.to_string(),
            })?;
            data = with_timestamps;
            timestamps_parsed = parsed;
        }

        let report = NormalizationReport {
            duration_ms: start_time.elapsed().as_millis() as u64,
            rows,
            columns: outcome.columns,
            skipped_columns: outcome.skipped_columns,
            timestamps_parsed,
        };

        info!(
            "Cleaning complete in {}ms: {} sentinel(s), {} unparseable",
            report.duration_ms,
            report.total_sentinels_replaced(),
            report.total_unparseable()
        );

        Ok(CleanedDataset { data, report })
    }
}
