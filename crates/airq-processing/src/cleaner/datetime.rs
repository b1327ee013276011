//! Date and time parsing for the station's separate Date/Time columns.

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::*;
use tracing::debug;

const DAY_FIRST_FORMATS: [&str; 2] = ["%d/%m/%Y", "%m/%d/%Y"];
const MONTH_FIRST_FORMATS: [&str; 2] = ["%m/%d/%Y", "%d/%m/%Y"];
const OTHER_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d.%m.%Y"];

/// Parse a date, trying the preferred day/month order first.
///
/// An impossible reading in the preferred order (month 13+) falls back to
/// the other order.
pub fn parse_date(value: &str, day_first: bool) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let slash_formats = if day_first {
        DAY_FIRST_FORMATS
    } else {
        MONTH_FIRST_FORMATS
    };

    slash_formats
        .iter()
        .chain(OTHER_DATE_FORMATS.iter())
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Parse a time of day. Dots are accepted as separators ("18.00.00").
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let normalized = value.trim().replace('.', ":");
    if normalized.is_empty() {
        return None;
    }

    NaiveTime::parse_from_str(&normalized, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(&normalized, "%H:%M"))
        .ok()
}

/// Add a millisecond `Datetime` column built from a date column and a time
/// column.
///
/// Rows where either part is missing or unparseable get null. When one of
/// the source columns is absent the frame is returned untouched and the
/// count is `None`; otherwise the count is the number of rows that received
/// a timestamp.
pub(crate) fn assemble_timestamps(
    mut df: DataFrame,
    date_column: &str,
    time_column: &str,
    output_column: &str,
    day_first: bool,
) -> Result<(DataFrame, Option<usize>)> {
    if df.column(date_column).is_err() || df.column(time_column).is_err() {
        debug!(
            "Skipping timestamp assembly: '{}' or '{}' not present",
            date_column, time_column
        );
        return Ok((df, None));
    }

    let dates = df
        .column(date_column)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    let times = df
        .column(time_column)?
        .as_materialized_series()
        .cast(&DataType::String)?;

    let timestamps: Vec<Option<i64>> = dates
        .str()?
        .into_iter()
        .zip(times.str()?.into_iter())
        .map(|(date, time)| {
            let date = parse_date(date?, day_first)?;
            let time = parse_time(time?)?;
            Some(NaiveDateTime::new(date, time).and_utc().timestamp_millis())
        })
        .collect();

    let parsed = timestamps.iter().filter(|t| t.is_some()).count();
    debug!(
        "Assembled {} of {} timestamps into '{}'",
        parsed,
        timestamps.len(),
        output_column
    );

    let series = Series::new(output_column.into(), timestamps)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    df.with_column(series)?;

    Ok((df, Some(parsed)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_day_first() {
        assert_eq!(parse_date("10/03/2004", true), Some(ymd(2004, 3, 10)));
        assert_eq!(parse_date("10/03/2004", false), Some(ymd(2004, 10, 3)));
    }

    #[test]
    fn test_parse_date_falls_back_on_impossible_order() {
        // 25 cannot be a month, so month-first preference still yields 25 March
        assert_eq!(parse_date("25/03/2004", false), Some(ymd(2004, 3, 25)));
        assert_eq!(parse_date("03/25/2004", true), Some(ymd(2004, 3, 25)));
    }

    #[test]
    fn test_parse_date_other_formats() {
        assert_eq!(parse_date("2004-03-10", true), Some(ymd(2004, 3, 10)));
        assert_eq!(parse_date(" 10.03.2004 ", true), Some(ymd(2004, 3, 10)));
        assert_eq!(parse_date("yesterday", true), None);
        assert_eq!(parse_date("", true), None);
    }

    #[test]
    fn test_parse_time_formats() {
        let six_pm = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
        assert_eq!(parse_time("18.00.00"), Some(six_pm));
        assert_eq!(parse_time("18:00:00"), Some(six_pm));
        assert_eq!(parse_time("18:00"), Some(six_pm));
        assert_eq!(parse_time("25:00:00"), None);
        assert_eq!(parse_time(""), None);
    }

    #[test]
    fn test_assemble_timestamps() {
        let df = df![
            "Date" => [Some("10/03/2004"), Some("10/03/2004"), None],
            "Time" => [Some("18.00.00"), Some("garbage"), Some("20.00.00")],
        ]
        .unwrap();

        let (df, parsed) = assemble_timestamps(df, "Date", "Time", "DateTime", true).unwrap();
        assert_eq!(parsed, Some(1));

        let column = df.column("DateTime").unwrap();
        assert!(matches!(column.dtype(), DataType::Datetime(TimeUnit::Milliseconds, _)));
        assert_eq!(column.null_count(), 2);

        let expected = ymd(2004, 3, 10)
            .and_hms_opt(18, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis();
        let physical = column.as_materialized_series().to_physical_repr();
        assert_eq!(physical.i64().unwrap().get(0), Some(expected));
    }

    #[test]
    fn test_assemble_timestamps_missing_source_column() {
        let df = df!["Date" => ["10/03/2004"]].unwrap();
        let (df, parsed) = assemble_timestamps(df, "Date", "Time", "DateTime", true).unwrap();

        assert_eq!(parsed, None);
        assert!(df.column("DateTime").is_err());
        assert_eq!(df.width(), 1);
    }
}
