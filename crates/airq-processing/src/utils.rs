//! Shared utilities for parsing cells and measuring missingness.

use crate::types::ColumnMissing;
use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a floating point type.
#[inline]
pub fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

// =============================================================================
// String Parsing Utilities
// =============================================================================

/// Characters stripped before parsing when the comma is a thousands separator.
pub const NUMERIC_FORMAT_CHARS: [char; 2] = [',', ' '];

/// Common textual missing-value markers in data.
pub const ERROR_MARKERS: [&str; 8] = [
    "error", "unknown", "n/a", "na", "null", "missing", "none", "#n/a",
];

/// Clean a string for numeric parsing.
///
/// With `decimal_comma` the comma is the decimal mark (`"2,6"` is 2.6) and is
/// rewritten to a dot. Otherwise it is treated as a thousands separator and
/// dropped (`"1,360"` is 1360).
pub fn clean_numeric_string(s: &str, decimal_comma: bool) -> String {
    let trimmed = s.trim();
    if decimal_comma {
        trimmed.replace(',', ".").replace(' ', "")
    } else {
        let mut result = trimmed.to_string();
        for c in NUMERIC_FORMAT_CHARS {
            result = result.replace(c, "");
        }
        result
    }
}

/// Check if a string is a textual missing-value marker.
///
/// # Example
///
/// ```rust,ignore
/// use airq_processing::utils::is_error_marker;
///
/// assert!(is_error_marker("N/A"));
/// assert!(!is_error_marker("42"));
/// ```
pub fn is_error_marker(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    ERROR_MARKERS.iter().any(|&marker| lower == marker)
}

/// Try to parse a string as a numeric value (f64).
pub fn parse_numeric_string(s: &str, decimal_comma: bool) -> Option<f64> {
    let cleaned = clean_numeric_string(s, decimal_comma);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

// =============================================================================
// Missing Value Utilities
// =============================================================================

/// Number of cells in a Series that are null, or NaN for float columns.
pub fn missing_count(series: &Series) -> PolarsResult<usize> {
    if !is_float_dtype(series.dtype()) {
        return Ok(series.null_count());
    }

    let floats = series.cast(&DataType::Float64)?;
    Ok(floats
        .f64()?
        .into_iter()
        .filter(|v| v.is_none_or(f64::is_nan))
        .count())
}

/// Per-column missing-value share of a DataFrame, in column order.
pub fn missing_percentages(df: &DataFrame) -> PolarsResult<Vec<ColumnMissing>> {
    let rows = df.height();

    df.get_columns()
        .iter()
        .map(|col| {
            let series = col.as_materialized_series();
            let missing = missing_count(series)?;
            let percentage = if rows == 0 {
                0.0
            } else {
                (missing as f64 / rows as f64 * 10_000.0).round() / 100.0
            };
            Ok(ColumnMissing {
                column: series.name().to_string(),
                missing,
                percentage,
            })
        })
        .collect()
}

/// Collect the values of a float column, with nulls read as NaN.
pub fn float_values(series: &Series) -> PolarsResult<Vec<f64>> {
    let floats = series.cast(&DataType::Float64)?;
    Ok(floats
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

/// Compare two float slices treating NaN as equal to NaN.
pub fn floats_equal_nan_aware(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| (x.is_nan() && y.is_nan()) || x == y)
}
