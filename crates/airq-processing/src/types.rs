use serde::{Deserialize, Serialize};

// ============================================================================
// Cell classification
// ============================================================================

/// What normalization decided about a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CellOutcome {
    /// A usable number.
    Value(f64),
    /// One of the sentinel forms; rewritten to NaN.
    Sentinel,
    /// Neither a sentinel nor a number; rewritten to NaN.
    Unparseable,
    /// Already null, blank, NaN or a textual missing marker.
    AlreadyMissing,
}

impl CellOutcome {
    /// The value written back into the column. Everything but a usable
    /// number becomes NaN.
    #[inline]
    pub fn into_value(self) -> f64 {
        match self {
            CellOutcome::Value(v) => v,
            _ => f64::NAN,
        }
    }

    #[inline]
    pub fn is_missing(&self) -> bool {
        !matches!(self, CellOutcome::Value(_))
    }
}

// ============================================================================
// Normalization report
// ============================================================================

/// Per-column tally of a normalization pass.
///
/// `sentinels_replaced` and `unparseable` are kept apart so that corrupt
/// cells can be audited separately from the expected sentinel codes, even
/// though both end up as NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnNormalization {
    pub column: String,
    /// Data type of the column before normalization (e.g. "str", "i64").
    pub original_dtype: String,
    pub rows: usize,
    pub sentinels_replaced: usize,
    pub unparseable: usize,
    pub already_missing: usize,
}

impl ColumnNormalization {
    pub fn new(column: impl Into<String>, original_dtype: impl Into<String>, rows: usize) -> Self {
        Self {
            column: column.into(),
            original_dtype: original_dtype.into(),
            rows,
            sentinels_replaced: 0,
            unparseable: 0,
            already_missing: 0,
        }
    }

    /// Count one cell and hand back the value to store for it.
    pub fn record(&mut self, outcome: CellOutcome) -> f64 {
        match outcome {
            CellOutcome::Value(_) => {}
            CellOutcome::Sentinel => self.sentinels_replaced += 1,
            CellOutcome::Unparseable => self.unparseable += 1,
            CellOutcome::AlreadyMissing => self.already_missing += 1,
        }
        outcome.into_value()
    }

    /// Number of NaN cells once the column is normalized.
    pub fn missing_after(&self) -> usize {
        self.sentinels_replaced + self.unparseable + self.already_missing
    }

    /// Percentage (0 - 100) of the column that is missing after normalization.
    pub fn missing_percentage(&self) -> f64 {
        if self.rows == 0 {
            0.0
        } else {
            self.missing_after() as f64 / self.rows as f64 * 100.0
        }
    }

    /// Whether this pass rewrote any present cell to NaN.
    pub fn changed_values(&self) -> bool {
        self.sentinels_replaced > 0 || self.unparseable > 0
    }
}

/// Summary of a full cleaning run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizationReport {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,
    pub rows: usize,
    pub columns: Vec<ColumnNormalization>,
    /// Requested columns that were absent and skipped.
    pub skipped_columns: Vec<String>,
    /// Rows that received a timestamp, when timestamp assembly ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamps_parsed: Option<usize>,
}

impl NormalizationReport {
    pub fn total_sentinels_replaced(&self) -> usize {
        self.columns.iter().map(|c| c.sentinels_replaced).sum()
    }

    pub fn total_unparseable(&self) -> usize {
        self.columns.iter().map(|c| c.unparseable).sum()
    }

    /// Look up the tally for one column.
    pub fn column(&self, name: &str) -> Option<&ColumnNormalization> {
        self.columns.iter().find(|c| c.column == name)
    }
}

/// Missing-value share of one column, counting both null and NaN cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing: usize,
    /// 0 - 100, rounded to two decimals.
    pub percentage: f64,
}
