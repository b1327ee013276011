//! Reading the raw delimited file and writing cleaned output.
//!
//! Every column is read as text so that the normalizer sees the raw forms
//! exactly as they appear in the file (`"-200,0"` rather than whatever a
//! type-inferring reader would make of it).

use crate::config::LoaderOptions;
use crate::error::{CleaningError, Result, ResultExt};
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions};
use polars::prelude::*;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Load a delimited file into a DataFrame of text columns.
pub fn load_dataset(path: impl AsRef<Path>, options: &LoaderOptions) -> Result<DataFrame> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CleaningError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file does not exist",
        ))
        .with_context(format!("Reading {}", path.display())));
    }

    info!("Loading dataset from: {}", path.display());

    let df = csv_read_options(options)?
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .context(format!("Opening {}", path.display()))?
        .finish()
        .context(format!("Parsing {}", path.display()))?;

    let df = tidy(df, options)?;
    info!("Dataset loaded successfully: {:?}", df.shape());
    Ok(df)
}

/// Parse delimited text already held in memory.
pub fn parse_dataset(text: &str, options: &LoaderOptions) -> Result<DataFrame> {
    let cursor = Cursor::new(text.as_bytes().to_vec());
    let df = csv_read_options(options)?
        .into_reader_with_file_handle(cursor)
        .finish()?;
    tidy(df, options)
}

fn csv_read_options(options: &LoaderOptions) -> Result<CsvReadOptions> {
    let separator = options.separator_byte()?;

    Ok(CsvReadOptions::default()
        .with_has_header(options.has_header)
        // 0 rows of inference: every column is read as String
        .with_infer_schema_length(Some(0))
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(separator)
                .with_quote_char(Some(b'"'))
                .with_truncate_ragged_lines(true),
        ))
}

fn tidy(df: DataFrame, options: &LoaderOptions) -> Result<DataFrame> {
    let mut df = df;
    if options.drop_empty_columns {
        df = drop_empty_columns(df);
    }
    if options.drop_empty_rows {
        df = drop_empty_rows(df)?;
    }
    Ok(df)
}

/// Remove columns that hold no value in any row.
///
/// Frames with no rows are returned as-is, since every column would qualify.
pub fn drop_empty_columns(df: DataFrame) -> DataFrame {
    if df.height() == 0 {
        return df;
    }

    let empty: Vec<PlSmallStr> = df
        .get_columns()
        .iter()
        .filter(|col| col.null_count() == col.len())
        .map(|col| col.name().clone())
        .collect();

    if empty.is_empty() {
        return df;
    }

    debug!("Dropping {} empty column(s): {:?}", empty.len(), empty);
    df.drop_many(empty)
}

/// Remove rows in which every cell is null.
pub fn drop_empty_rows(df: DataFrame) -> Result<DataFrame> {
    if df.width() == 0 || df.height() == 0 {
        return Ok(df);
    }

    let mut null_counts = Series::new("nulls".into(), vec![0u32; df.height()]);
    for col in df.get_columns() {
        let null_int = col.as_materialized_series().is_null().into_series();
        null_counts = (&null_counts + &null_int.cast(&DataType::UInt32)?)?;
    }

    let width = df.width() as u32;
    let mask = null_counts.lt(width)?;
    let before = df.height();
    let df = df.filter(&mask)?;

    if df.height() < before {
        debug!("Dropped {} empty row(s)", before - df.height());
    }
    Ok(df)
}

/// Write a DataFrame to `.parquet` or, for any other extension, to a
/// delimited text file using `separator`.
pub fn save_dataset(df: &mut DataFrame, path: impl AsRef<Path>, separator: char) -> Result<()> {
    let path = path.as_ref();
    let is_parquet = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"));

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).context(format!("Creating {}", parent.display()))?;
    }

    let mut file = File::create(path).context(format!("Creating {}", path.display()))?;

    if is_parquet {
        ParquetWriter::new(&mut file)
            .finish(df)
            .context(format!("Writing {}", path.display()))?;
    } else {
        let options = LoaderOptions {
            separator,
            ..Default::default()
        };
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(options.separator_byte()?)
            .with_quote_char(b'"')
            .finish(df)
            .context(format!("Writing {}", path.display()))?;
    }

    info!("Dataset saved: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "Date;Time;CO(GT);T;Notes\n\
                       10/03/2004;18.00.00;2,6;13,6;\n\
                       10/03/2004;19.00.00;-200;-200,0;\n\
                       ;;;;\n";

    #[test]
    fn test_parse_reads_everything_as_text() {
        let df = parse_dataset(RAW, &LoaderOptions::default()).unwrap();
        for col in df.get_columns() {
            assert_eq!(col.dtype(), &DataType::String, "{}", col.name());
        }
        let co = df.column("CO(GT)").unwrap().str().unwrap();
        assert_eq!(co.get(0), Some("2,6"));
        assert_eq!(co.get(1), Some("-200"));
    }

    #[test]
    fn test_parse_drops_empty_columns_and_rows() {
        let df = parse_dataset(RAW, &LoaderOptions::default()).unwrap();
        assert_eq!(df.height(), 2);
        assert!(df.column("Notes").is_err());
        assert_eq!(df.width(), 4);
    }

    #[test]
    fn test_parse_keeps_empties_when_disabled() {
        let options = LoaderOptions {
            drop_empty_columns: false,
            drop_empty_rows: false,
            ..Default::default()
        };
        let df = parse_dataset(RAW, &options).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 5);
    }

    #[test]
    fn test_parse_custom_separator() {
        let options = LoaderOptions {
            separator: ',',
            ..Default::default()
        };
        let df = parse_dataset("CO(GT),T\n-200,13.6\n", &options).unwrap();
        assert_eq!(df.shape(), (1, 2));
    }

    #[test]
    fn test_drop_empty_columns_on_zero_rows() {
        let df = DataFrame::new(vec![
            Series::new_empty("A".into(), &DataType::String).into(),
        ])
        .unwrap();
        assert_eq!(drop_empty_columns(df).width(), 1);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_dataset("does/not/exist.csv", &LoaderOptions::default()).unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
        assert!(err.to_string().contains("does/not/exist.csv"));
    }
}
