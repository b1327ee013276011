//! Sentinel normalization over a set of target columns.

use super::converters::normalize_series;
use super::sentinel::SentinelSet;
use crate::config::MissingColumnPolicy;
use crate::error::{CleaningError, Result};
use crate::types::ColumnNormalization;
use polars::prelude::*;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Rewrites every sentinel form in the target columns to NaN and converts
/// those columns to Float64.
///
/// Columns that are not targeted are never touched. Running the normalizer
/// on its own output changes nothing.
#[derive(Debug, Clone)]
pub struct SentinelNormalizer {
    sentinels: SentinelSet,
    decimal_comma: bool,
    missing_column_policy: MissingColumnPolicy,
}

static_assertions::assert_impl_all!(SentinelNormalizer: Send, Sync);

impl Default for SentinelNormalizer {
    fn default() -> Self {
        Self::new(SentinelSet::default())
    }
}

/// A normalized frame together with what happened to each column.
#[derive(Debug, Clone)]
pub struct NormalizationOutcome {
    pub data: DataFrame,
    pub columns: Vec<ColumnNormalization>,
    pub skipped_columns: Vec<String>,
}

impl SentinelNormalizer {
    pub fn new(sentinels: SentinelSet) -> Self {
        Self {
            sentinels,
            decimal_comma: true,
            missing_column_policy: MissingColumnPolicy::default(),
        }
    }

    pub fn with_decimal_comma(mut self, decimal_comma: bool) -> Self {
        self.decimal_comma = decimal_comma;
        self
    }

    pub fn with_missing_column_policy(mut self, policy: MissingColumnPolicy) -> Self {
        self.missing_column_policy = policy;
        self
    }

    pub fn sentinels(&self) -> &SentinelSet {
        &self.sentinels
    }

    /// Normalize the given columns of `df`.
    ///
    /// # Errors
    ///
    /// With [`MissingColumnPolicy::Abort`], returns
    /// [`CleaningError::MissingColumn`] for the first absent column before
    /// any column is rewritten. Cell contents never cause an error.
    pub fn normalize<S: AsRef<str>>(
        &self,
        mut df: DataFrame,
        columns: &[S],
    ) -> Result<NormalizationOutcome> {
        let present: HashSet<String> = df
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();

        let mut seen = HashSet::new();
        let mut targets: Vec<&str> = Vec::with_capacity(columns.len());
        let mut skipped_columns = Vec::new();

        for name in columns.iter().map(AsRef::as_ref) {
            if !seen.insert(name) {
                continue;
            }
            if present.contains(name) {
                targets.push(name);
                continue;
            }
            match self.missing_column_policy {
                MissingColumnPolicy::Abort => {
                    return Err(CleaningError::MissingColumn(name.to_string()));
                }
                MissingColumnPolicy::Skip => {
                    warn!("Column '{}' not found in dataset, skipping", name);
                    skipped_columns.push(name.to_string());
                }
            }
        }

        let mut reports = Vec::with_capacity(targets.len());

        for name in targets {
            let (normalized, stats) = {
                let series = df.column(name)?.as_materialized_series();
                normalize_series(series, &self.sentinels, self.decimal_comma).map_err(|e| {
                    CleaningError::NormalizationFailed {
                        column: name.to_string(),
                        reason: e.to_string(),
                    }
                })?
            };
            df.replace(name, normalized)?;

            debug!(
                "'{}': {} sentinel(s), {} unparseable, {} already missing",
                name, stats.sentinels_replaced, stats.unparseable, stats.already_missing
            );
            reports.push(stats);
        }

        let replaced: usize = reports.iter().map(|r| r.sentinels_replaced).sum();
        let unparseable: usize = reports.iter().map(|r| r.unparseable).sum();
        info!(
            "Normalized {} column(s): {} sentinel value(s) and {} unparseable value(s) set to NaN",
            reports.len(),
            replaced,
            unparseable
        );

        Ok(NormalizationOutcome {
            data: df,
            columns: reports,
            skipped_columns,
        })
    }
}

/// Normalize `columns` with the default `-200` sentinel set, aborting on an
/// absent column.
pub fn normalize_sentinels<S: AsRef<str>>(df: DataFrame, columns: &[S]) -> Result<DataFrame> {
    SentinelNormalizer::default()
        .normalize(df, columns)
        .map(|outcome| outcome.data)
}
