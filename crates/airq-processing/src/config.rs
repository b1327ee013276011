//! Configuration types for cleaning the air-quality dataset.
//!
//! Both configurations are serde-friendly so they can be loaded from JSON,
//! and [`CleaningConfig`] comes with a validating builder.

use crate::cleaner::SentinelSet;
use crate::error::CleaningError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Numeric measurement columns of the UCI air-quality file.
pub const DEFAULT_NUMERIC_COLUMNS: [&str; 13] = [
    "CO(GT)",
    "PT08.S1(CO)",
    "NMHC(GT)",
    "C6H6(GT)",
    "PT08.S2(NMHC)",
    "NOx(GT)",
    "PT08.S3(NOx)",
    "NO2(GT)",
    "PT08.S4(NO2)",
    "PT08.S5(O3)",
    "T",
    "RH",
    "AH",
];

/// What to do when a requested column is not in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MissingColumnPolicy {
    /// Fail with [`CleaningError::MissingColumn`] before touching any column.
    #[default]
    Abort,
    /// Log a warning, record the column as skipped and clean the rest.
    Skip,
}

/// Configuration for a cleaning run.
///
/// Use [`CleaningConfig::builder()`] to get validation.
///
/// # Example
///
/// ```rust,ignore
/// use airq_processing::config::{CleaningConfig, MissingColumnPolicy};
///
/// let config = CleaningConfig::builder()
///     .numeric_columns(["CO(GT)", "T", "RH"])
///     .extra_sentinel("-999")
///     .missing_column_policy(MissingColumnPolicy::Skip)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Columns to normalize and convert to Float64.
    /// Default: the 13 UCI measurement columns.
    pub numeric_columns: Vec<String>,

    /// Raw forms that mean "missing".
    /// Default: `-200`, `-200.0`, `-200,0`
    pub sentinels: SentinelSet,

    /// Default: Abort
    pub missing_column_policy: MissingColumnPolicy,

    /// Whether the comma is the decimal mark in text cells.
    /// Default: true
    pub decimal_comma: bool,

    /// Whether to build a timestamp column from the date and time columns.
    /// Default: true
    pub assemble_timestamps: bool,

    /// Prefer DD/MM/YYYY when a date is ambiguous.
    /// Default: true
    pub day_first: bool,

    /// Default: "Date"
    pub date_column: String,

    /// Default: "Time"
    pub time_column: String,

    /// Name of the assembled timestamp column.
    /// Default: "DateTime"
    pub timestamp_column: String,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            numeric_columns: DEFAULT_NUMERIC_COLUMNS.iter().map(|c| c.to_string()).collect(),
            sentinels: SentinelSet::default(),
            missing_column_policy: MissingColumnPolicy::default(),
            decimal_comma: true,
            assemble_timestamps: true,
            day_first: true,
            date_column: "Date".to_string(),
            time_column: "Time".to_string(),
            timestamp_column: "DateTime".to_string(),
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let mut seen = HashSet::new();
        for column in &self.numeric_columns {
            if column.trim().is_empty() {
                return Err(ConfigValidationError::EmptyColumnName);
            }
            if !seen.insert(column.as_str()) {
                return Err(ConfigValidationError::DuplicateColumn(column.clone()));
            }
        }

        if self.sentinels.is_empty() {
            return Err(ConfigValidationError::NoSentinels);
        }

        if self.assemble_timestamps {
            for name in [&self.date_column, &self.time_column, &self.timestamp_column] {
                if name.trim().is_empty() {
                    return Err(ConfigValidationError::EmptyColumnName);
                }
            }
            if seen.contains(self.timestamp_column.as_str())
                || self.timestamp_column == self.date_column
                || self.timestamp_column == self.time_column
            {
                return Err(ConfigValidationError::TimestampColumnConflict(
                    self.timestamp_column.clone(),
                ));
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Column names must not be empty")]
    EmptyColumnName,

    #[error("Column '{0}' is listed more than once")]
    DuplicateColumn(String),

    #[error("At least one sentinel form is required")]
    NoSentinels,

    #[error("Timestamp column '{0}' would overwrite an input column")]
    TimestampColumnConflict(String),

    #[error("Invalid separator {0:?} (must be a single ASCII character)")]
    InvalidSeparator(char),
}

impl From<ConfigValidationError> for CleaningError {
    fn from(err: ConfigValidationError) -> Self {
        CleaningError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    numeric_columns: Option<Vec<String>>,
    sentinels: Option<SentinelSet>,
    extra_sentinels: Vec<String>,
    missing_column_policy: Option<MissingColumnPolicy>,
    decimal_comma: Option<bool>,
    assemble_timestamps: Option<bool>,
    day_first: Option<bool>,
    date_column: Option<String>,
    time_column: Option<String>,
    timestamp_column: Option<String>,
}

impl CleaningConfigBuilder {
    /// Replace the default list of numeric columns.
    pub fn numeric_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the sentinel set entirely.
    pub fn sentinels(mut self, sentinels: SentinelSet) -> Self {
        self.sentinels = Some(sentinels);
        self
    }

    /// Add a sentinel form on top of the configured set.
    pub fn extra_sentinel(mut self, form: impl Into<String>) -> Self {
        self.extra_sentinels.push(form.into());
        self
    }

    pub fn missing_column_policy(mut self, policy: MissingColumnPolicy) -> Self {
        self.missing_column_policy = Some(policy);
        self
    }

    /// Treat the comma as the decimal mark (`"2,6"` is 2.6).
    pub fn decimal_comma(mut self, enable: bool) -> Self {
        self.decimal_comma = Some(enable);
        self
    }

    pub fn assemble_timestamps(mut self, enable: bool) -> Self {
        self.assemble_timestamps = Some(enable);
        self
    }

    pub fn day_first(mut self, day_first: bool) -> Self {
        self.day_first = Some(day_first);
        self
    }

    pub fn date_column(mut self, name: impl Into<String>) -> Self {
        self.date_column = Some(name.into());
        self
    }

    pub fn time_column(mut self, name: impl Into<String>) -> Self {
        self.time_column = Some(name.into());
        self
    }

    pub fn timestamp_column(mut self, name: impl Into<String>) -> Self {
        self.timestamp_column = Some(name.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleaningConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleaningConfig, ConfigValidationError> {
        let defaults = CleaningConfig::default();

        let sentinels = self
            .extra_sentinels
            .iter()
            .fold(self.sentinels.unwrap_or(defaults.sentinels), |set, form| {
                set.with_form(form)
            });

        let config = CleaningConfig {
            numeric_columns: self.numeric_columns.unwrap_or(defaults.numeric_columns),
            sentinels,
            missing_column_policy: self.missing_column_policy.unwrap_or_default(),
            decimal_comma: self.decimal_comma.unwrap_or(defaults.decimal_comma),
            assemble_timestamps: self
                .assemble_timestamps
                .unwrap_or(defaults.assemble_timestamps),
            day_first: self.day_first.unwrap_or(defaults.day_first),
            date_column: self.date_column.unwrap_or(defaults.date_column),
            time_column: self.time_column.unwrap_or(defaults.time_column),
            timestamp_column: self.timestamp_column.unwrap_or(defaults.timestamp_column),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Options for reading the delimited input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    /// Field separator. Default: ';'
    pub separator: char,
    /// Default: true
    pub has_header: bool,
    /// Drop columns with no values at all (trailing separators). Default: true
    pub drop_empty_columns: bool,
    /// Drop rows with no values at all. Default: true
    pub drop_empty_rows: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            separator: ';',
            has_header: true,
            drop_empty_columns: true,
            drop_empty_rows: true,
        }
    }
}

impl LoaderOptions {
    /// The separator as a byte, as the CSV reader expects it.
    pub fn separator_byte(&self) -> Result<u8, ConfigValidationError> {
        if self.separator.is_ascii() {
            Ok(self.separator as u8)
        } else {
            Err(ConfigValidationError::InvalidSeparator(self.separator))
        }
    }
}
