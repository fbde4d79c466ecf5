use std::collections::BTreeMap;

use super::model::{col, Dataset, Record};
use crate::error::{EngineError, EngineResult};

// ---------------------------------------------------------------------------
// FilterSet: request key → value, "All" meaning unrestricted
// ---------------------------------------------------------------------------

/// Per-request filters, forwarded verbatim from a query string or the
/// dashboard's selectors. Unknown keys are carried but never consulted.
pub type FilterSet = BTreeMap<String, String>;

/// Sentinel meaning "no restriction" for any filter key.
pub const ALL: &str = "All";

/// Filter keys that restrict rows, each naming the column it compares.
pub const ROW_FILTER_KEYS: &[&str] = &[col::REGION, col::CATEGORY];

/// The value of `key` if it carries a restriction: absent, empty and
/// "All" all mean unrestricted. Any other value is compared verbatim.
pub fn active_value<'a>(filters: &'a FilterSet, key: &str) -> Option<&'a str> {
    filters
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty() && *v != ALL)
}

// ---------------------------------------------------------------------------
// Predicate
// ---------------------------------------------------------------------------

/// Conjunction of column-equality tests. An empty predicate selects all rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<(usize, String)>,
}

impl Predicate {
    /// The predicate that accepts every row.
    pub fn all() -> Self {
        Predicate::default()
    }

    /// Translate `filters` into a predicate over `dataset`'s rows.
    ///
    /// A recognised key whose column the dataset lacks fails with
    /// [`EngineError::MissingColumn`].
    pub fn build(dataset: &Dataset, filters: &FilterSet) -> EngineResult<Self> {
        let mut clauses = Vec::new();
        for key in ROW_FILTER_KEYS {
            if let Some(value) = active_value(filters, key) {
                clauses.push((dataset.column_index(key)?, value.to_string()));
            }
        }
        Ok(Predicate { clauses })
    }

    pub fn is_all(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.clauses
            .iter()
            .all(|(idx, value)| record.get(*idx).matches_text(value))
    }
}

// ---------------------------------------------------------------------------
// View: the rows of a dataset that pass a predicate
// ---------------------------------------------------------------------------

/// A filtered, read-only window on a dataset. Holds row indices in
/// dataset order; the base rows are never copied or modified.
#[derive(Debug, Clone)]
pub struct View<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> View<'a> {
    /// Return the view of rows that pass `predicate`.
    pub fn new(dataset: &'a Dataset, predicate: &Predicate) -> Self {
        let indices = dataset
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, record)| predicate.matches(record))
            .map(|(i, _)| i)
            .collect();
        View { dataset, indices }
    }

    /// The unfiltered view.
    pub fn full(dataset: &'a Dataset) -> Self {
        View {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    /// Narrow this view to the rows for which `keep` holds.
    pub fn retain(&self, mut keep: impl FnMut(&Record) -> bool) -> View<'a> {
        let rows = self.dataset.rows();
        View {
            dataset: self.dataset,
            indices: self
                .indices
                .iter()
                .copied()
                .filter(|&i| keep(&rows[i]))
                .collect(),
        }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Iterate the selected rows in dataset order.
    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let rows = self.dataset.rows();
        self.indices.iter().map(move |&i| &rows[i])
    }

    pub fn column(&self, name: &str) -> EngineResult<usize> {
        self.dataset.column_index(name)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Params: optional operation parameters carried in the filter set
// ---------------------------------------------------------------------------

pub const DEFAULT_PERIOD: &str = "month";
pub const DEFAULT_DEMO: &str = "gender";
pub const DEFAULT_AGE_THRESHOLD: f64 = 25.0;

/// Optional parameters for the operations that take one.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    /// Column used as the time axis.
    pub period: String,
    /// Demographic column for shipping preferences.
    pub demo: String,
    /// Inclusive upper age bound for "young" customers.
    pub age_threshold: f64,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            period: DEFAULT_PERIOD.to_string(),
            demo: DEFAULT_DEMO.to_string(),
            age_threshold: DEFAULT_AGE_THRESHOLD,
        }
    }
}

impl Params {
    pub fn from_filters(filters: &FilterSet) -> EngineResult<Self> {
        let mut params = Params::default();
        if let Some(period) = active_value(filters, "period") {
            params.period = period.to_string();
        }
        if let Some(demo) = active_value(filters, "demo") {
            params.demo = demo.to_string();
        }
        if let Some(raw) = active_value(filters, "age_threshold") {
            params.age_threshold = raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| EngineError::InvalidParameter {
                    name: "age_threshold".to_string(),
                    value: raw.to_string(),
                })?;
        }
        Ok(params)
    }
}
