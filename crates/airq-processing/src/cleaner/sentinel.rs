//! The equivalence set of raw forms that all mean "missing".

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Raw forms of the UCI air-quality missing-value sentinel.
pub const DEFAULT_SENTINEL_FORMS: [&str; 3] = ["-200", "-200.0", "-200,0"];

static DEFAULT_SENTINELS: Lazy<SentinelSet> =
    Lazy::new(|| SentinelSet::from_forms(DEFAULT_SENTINEL_FORMS));

/// A set of raw cell forms that stand for a missing value.
///
/// Text cells are matched by membership of their trimmed text. Numeric cells
/// (and text cells that parse to a number) are matched against the numeric
/// value of each form, so `-200`, `-200.0` and `-200,0` all collapse onto the
/// same value `-200.0`. Forms that do not parse as a number are matched as
/// text only.
///
/// Adding a new sentinel spelling is a data change:
///
/// ```rust,ignore
/// let sentinels = SentinelSet::default().with_form("-999");
/// assert!(sentinels.matches_text(" -999 "));
/// assert!(sentinels.matches_value(-999.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SentinelSet {
    forms: BTreeSet<String>,
    values: Vec<f64>,
}

impl Default for SentinelSet {
    fn default() -> Self {
        DEFAULT_SENTINELS.clone()
    }
}

impl SentinelSet {
    /// An empty set that matches nothing.
    pub fn empty() -> Self {
        Self {
            forms: BTreeSet::new(),
            values: Vec::new(),
        }
    }

    /// Build a set from raw forms. Blank forms are ignored.
    pub fn from_forms<I, S>(forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        forms
            .into_iter()
            .fold(Self::empty(), |set, form| set.with_form(form.as_ref()))
    }

    /// Add one more raw form to the set.
    pub fn with_form(mut self, form: impl AsRef<str>) -> Self {
        self.insert(form.as_ref());
        self
    }

    fn insert(&mut self, form: &str) {
        let trimmed = form.trim();
        if trimmed.is_empty() {
            return;
        }

        if let Some(value) = form_value(trimmed)
            && !self.values.contains(&value)
        {
            self.values.push(value);
        }
        self.forms.insert(trimmed.to_string());
    }

    /// Raw forms in sorted order.
    pub fn forms(&self) -> impl Iterator<Item = &str> {
        self.forms.iter().map(String::as_str)
    }

    /// Distinct numeric values the forms denote.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// Whether the trimmed text is one of the raw forms.
    pub fn matches_text(&self, raw: &str) -> bool {
        self.forms.contains(raw.trim())
    }

    /// Whether a numeric cell equals one of the sentinel values.
    pub fn matches_value(&self, value: f64) -> bool {
        self.values.iter().any(|&v| v == value)
    }
}

impl From<Vec<String>> for SentinelSet {
    fn from(forms: Vec<String>) -> Self {
        Self::from_forms(forms)
    }
}

impl From<SentinelSet> for Vec<String> {
    fn from(set: SentinelSet) -> Self {
        set.forms.into_iter().collect()
    }
}

/// Numeric value of a sentinel form, accepting either decimal mark.
fn form_value(form: &str) -> Option<f64> {
    form.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| !v.is_nan())
}
