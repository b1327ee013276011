//! Cell classification and column conversion to Float64.

use super::sentinel::SentinelSet;
use crate::types::{CellOutcome, ColumnNormalization};
use crate::utils::{is_error_marker, is_numeric_dtype, parse_numeric_string};
use anyhow::Result;
use polars::prelude::*;

/// Classify a text cell.
///
/// Sentinel forms are checked on the trimmed text before any parsing, then
/// again on the parsed value so that spellings outside the set (`"-200.00"`)
/// cannot leak a sentinel through as a real reading.
pub fn classify_text(raw: &str, sentinels: &SentinelSet, decimal_comma: bool) -> CellOutcome {
    let trimmed = raw.trim();

    if trimmed.is_empty() || is_error_marker(trimmed) {
        return CellOutcome::AlreadyMissing;
    }

    if sentinels.matches_text(trimmed) {
        return CellOutcome::Sentinel;
    }

    match parse_numeric_string(trimmed, decimal_comma) {
        Some(value) => classify_value(Some(value), sentinels),
        None => CellOutcome::Unparseable,
    }
}

/// Classify a numeric cell. `None` is a null cell.
pub fn classify_value(value: Option<f64>, sentinels: &SentinelSet) -> CellOutcome {
    match value {
        None => CellOutcome::AlreadyMissing,
        Some(v) if v.is_nan() => CellOutcome::AlreadyMissing,
        Some(v) if sentinels.matches_value(v) => CellOutcome::Sentinel,
        Some(v) => CellOutcome::Value(v),
    }
}

/// Rewrite one column as Float64 with every missing cell set to NaN.
///
/// Never fails because of cell contents. Text, integer and float columns are
/// read cell by cell; other types are rendered to text first, and a type that
/// cannot even be rendered is treated as wholly unparseable.
pub(crate) fn normalize_series(
    series: &Series,
    sentinels: &SentinelSet,
    decimal_comma: bool,
) -> Result<(Series, ColumnNormalization)> {
    let dtype = series.dtype().clone();
    let mut stats = ColumnNormalization::new(series.name().as_str(), dtype.to_string(), series.len());

    let values: Vec<f64> = match &dtype {
        DataType::String => text_values(series, sentinels, decimal_comma, &mut stats)?,
        dt if is_numeric_dtype(dt) => {
            let floats = series.cast(&DataType::Float64)?;
            floats
                .f64()?
                .into_iter()
                .map(|v| stats.record(classify_value(v, sentinels)))
                .collect()
        }
        DataType::Null => (0..series.len())
            .map(|_| stats.record(CellOutcome::AlreadyMissing))
            .collect(),
        _ => match series.cast(&DataType::String) {
            Ok(text) => text_values(&text, sentinels, decimal_comma, &mut stats)?,
            Err(_) => {
                let nulls = series.is_null();
                nulls
                    .into_iter()
                    .map(|is_null| {
                        let outcome = if is_null.unwrap_or(true) {
                            CellOutcome::AlreadyMissing
                        } else {
                            CellOutcome::Unparseable
                        };
                        stats.record(outcome)
                    })
                    .collect()
            }
        },
    };

    Ok((Series::new(series.name().clone(), values), stats))
}

fn text_values(
    series: &Series,
    sentinels: &SentinelSet,
    decimal_comma: bool,
    stats: &mut ColumnNormalization,
) -> Result<Vec<f64>> {
    let str_series = series.str()?;
    Ok(str_series
        .into_iter()
        .map(|opt_val| {
            let outcome = match opt_val {
                Some(val) => classify_text(val, sentinels, decimal_comma),
                None => CellOutcome::AlreadyMissing,
            };
            stats.record(outcome)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::float_values;

    fn sentinels() -> SentinelSet {
        SentinelSet::default()
    }

    // ========================================================================
    // classify_text()
    // ========================================================================

    #[test]
    fn test_classify_text_sentinel_forms() {
        let set = sentinels();
        for form in ["-200", "-200.0", "-200,0", "  -200 ", "\t-200,0\n"] {
            assert_eq!(classify_text(form, &set, true), CellOutcome::Sentinel, "{form:?}");
        }
    }

    #[test]
    fn test_classify_text_sentinel_spelling_outside_set() {
        // Parses to -200.0, so still a sentinel
        assert_eq!(classify_text("-200.00", &sentinels(), true), CellOutcome::Sentinel);
        assert_eq!(classify_text("-2e2", &sentinels(), true), CellOutcome::Sentinel);
    }

    #[test]
    fn test_classify_text_decimal_comma_values() {
        let set = sentinels();
        assert_eq!(classify_text("2,6", &set, true), CellOutcome::Value(2.6));
        assert_eq!(classify_text("0,7578", &set, true), CellOutcome::Value(0.7578));
        assert_eq!(classify_text("1360", &set, true), CellOutcome::Value(1360.0));
    }

    #[test]
    fn test_classify_text_thousands_comma_when_decimal_comma_disabled() {
        assert_eq!(classify_text("1,360", &sentinels(), false), CellOutcome::Value(1360.0));
        // Still a sentinel by form even though the comma is not a decimal mark here
        assert_eq!(classify_text("-200,0", &sentinels(), false), CellOutcome::Sentinel);
    }

    #[test]
    fn test_classify_text_unparseable() {
        assert_eq!(classify_text("abc", &sentinels(), true), CellOutcome::Unparseable);
        assert_eq!(classify_text("12..5", &sentinels(), true), CellOutcome::Unparseable);
    }

    #[test]
    fn test_classify_text_already_missing() {
        let set = sentinels();
        assert_eq!(classify_text("", &set, true), CellOutcome::AlreadyMissing);
        assert_eq!(classify_text("   ", &set, true), CellOutcome::AlreadyMissing);
        assert_eq!(classify_text("NaN", &set, true), CellOutcome::AlreadyMissing);
        assert_eq!(classify_text("N/A", &set, true), CellOutcome::AlreadyMissing);
    }

    #[test]
    fn test_classify_value() {
        let set = sentinels();
        assert_eq!(classify_value(Some(-200.0), &set), CellOutcome::Sentinel);
        assert_eq!(classify_value(Some(2.6), &set), CellOutcome::Value(2.6));
        assert_eq!(classify_value(Some(f64::NAN), &set), CellOutcome::AlreadyMissing);
        assert_eq!(classify_value(None, &set), CellOutcome::AlreadyMissing);
    }

    // ========================================================================
    // normalize_series()
    // ========================================================================

    #[test]
    fn test_normalize_text_series() {
        let series = Series::new("CO(GT)".into(), &["2.6", "-200", "-200,0", "-200.0", "1.2"]);
        let (result, stats) = normalize_series(&series, &sentinels(), true).unwrap();

        assert_eq!(result.dtype(), &DataType::Float64);
        assert_eq!(result.name().as_str(), "CO(GT)");

        let values = float_values(&result).unwrap();
        assert_eq!(values[0], 2.6);
        assert!(values[1].is_nan());
        assert!(values[2].is_nan());
        assert!(values[3].is_nan());
        assert_eq!(values[4], 1.2);

        assert_eq!(stats.sentinels_replaced, 3);
        assert_eq!(stats.unparseable, 0);
        assert_eq!(stats.original_dtype, "str");
    }

    #[test]
    fn test_normalize_integer_series() {
        let series = Series::new("NOx(GT)".into(), &[166_i64, -200, 103]);
        let (result, stats) = normalize_series(&series, &sentinels(), true).unwrap();

        let values = float_values(&result).unwrap();
        assert_eq!(values[0], 166.0);
        assert!(values[1].is_nan());
        assert_eq!(values[2], 103.0);
        assert_eq!(stats.sentinels_replaced, 1);
    }

    #[test]
    fn test_normalize_float_series_with_nulls_and_nan() {
        let series = Series::new(
            "T".into(),
            &[Some(13.6), Some(-200.0), None, Some(f64::NAN)],
        );
        let (result, stats) = normalize_series(&series, &sentinels(), true).unwrap();

        let values = float_values(&result).unwrap();
        assert_eq!(values[0], 13.6);
        assert!(values[1..].iter().all(|v| v.is_nan()));
        // Nulls become NaN too, so the column has a single missing marker
        assert_eq!(result.null_count(), 0);
        assert_eq!(stats.sentinels_replaced, 1);
        assert_eq!(stats.already_missing, 2);
    }

    #[test]
    fn test_normalize_series_garbage_does_not_fail() {
        let series = Series::new("RH".into(), &[Some("abc"), Some("48,9"), None, Some("--")]);
        let (result, stats) = normalize_series(&series, &sentinels(), true).unwrap();

        let values = float_values(&result).unwrap();
        assert!(values[0].is_nan());
        assert_eq!(values[1], 48.9);
        assert!(values[2].is_nan());
        assert!(values[3].is_nan());
        assert_eq!(stats.unparseable, 2);
        assert_eq!(stats.already_missing, 1);
    }

    #[test]
    fn test_normalize_boolean_series_is_unparseable() {
        let series = Series::new("flag".into(), &[Some(true), None]);
        let (result, stats) = normalize_series(&series, &sentinels(), true).unwrap();

        assert_eq!(result.dtype(), &DataType::Float64);
        assert_eq!(stats.unparseable, 1);
        assert_eq!(stats.already_missing, 1);
    }

    #[test]
    fn test_normalize_series_twice_is_noop() {
        let series = Series::new("AH".into(), &["0,7578", "-200", "x"]);
        let (once, _) = normalize_series(&series, &sentinels(), true).unwrap();
        let (twice, stats) = normalize_series(&once, &sentinels(), true).unwrap();

        let a = float_values(&once).unwrap();
        let b = float_values(&twice).unwrap();
        assert!(crate::utils::floats_equal_nan_aware(&a, &b));
        assert!(!stats.changed_values());
        assert_eq!(stats.already_missing, 2);
    }
}
