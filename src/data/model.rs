use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Column names used by the question catalog
// ---------------------------------------------------------------------------

pub mod col {
    pub const CUSTOMER_ID: &str = "customer_id";
    pub const ITEM_PURCHASED: &str = "item_purchased";
    pub const CATEGORY: &str = "category";
    pub const REGION: &str = "region";
    pub const REGION_TYPE: &str = "region_type";
    pub const GENDER: &str = "gender";
    pub const SEASON: &str = "season";
    pub const PRODUCT_SIZE: &str = "product_size";
    pub const PRODUCT_COLOR: &str = "product_color";
    pub const SHIPPING_TYPE: &str = "shipping_type";
    pub const PAYMENT_METHOD: &str = "payment_method";
    pub const PROMO_CODE_USED: &str = "promo_code_used";
    pub const IS_SUBSCRIBED: &str = "is_subscribed";
    pub const IS_WEEKEND: &str = "is_weekend";
    pub const TREND_FLAG: &str = "trend_flag";
    pub const CATEGORY_BY_AGE: &str = "most_purchased_category_by_age";
    pub const CATEGORY_BY_GENDER: &str = "most_purchased_category_by_gender";

    pub const TOTAL_REVENUE: &str = "total_revenue";
    pub const QUANTITY: &str = "quantity";
    pub const PRICE: &str = "price";
    pub const POPULARITY_SCORE: &str = "popularity_score";
    pub const PURCHASE_FREQUENCY: &str = "purchase_frequency";
    pub const REVIEW_RATING: &str = "review_rating";
    pub const AVERAGE_SPENDING: &str = "average_spending";
    pub const DISCOUNT_EFFECTIVENESS: &str = "discount_effectiveness";
    pub const AGE: &str = "age";

    pub const MONTH: &str = "month";
    pub const DAY_OF_WEEK: &str = "day_of_week";
}

/// Columns a source must carry to be accepted at load time.
pub const REQUIRED_COLUMNS: &[&str] = &[
    col::CUSTOMER_ID,
    col::ITEM_PURCHASED,
    col::CATEGORY,
    col::REGION,
    col::TOTAL_REVENUE,
    col::QUANTITY,
];

// ---------------------------------------------------------------------------
// Value – a single cell of the dataset
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes found in a processed
/// retail export. `Ord` so values can key a `BTreeMap` (natural group order).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "null"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(v) if v.is_finite() => serializer.serialize_f64(*v),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Float(_) | Value::Null => serializer.serialize_none(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl Value {
    /// Interpret the value as an `f64`. Booleans count as 1/0 so that the
    /// mean of a flag column is its usage rate.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether the cell's display text equals `text` (filter equality).
    pub fn matches_text(&self, text: &str) -> bool {
        match self {
            Value::String(s) => s == text,
            Value::Bool(b) => text.eq_ignore_ascii_case(if *b { "true" } else { "false" }),
            other => other.to_string() == text,
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the dataset
// ---------------------------------------------------------------------------

/// A single purchase transaction. Cells are positional, matching
/// [`Dataset::columns`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    values: Vec<Value>,
}

impl Record {
    pub fn new(values: Vec<Value>) -> Self {
        Record { values }
    }

    /// Cell at a column position; out-of-range positions read as `Null`.
    pub fn get(&self, idx: usize) -> &Value {
        static NULL: Value = Value::Null;
        self.values.get(idx).unwrap_or(&NULL)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with a column-name index. Immutable once built:
/// operations only ever read through a filtered view.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    column_index: BTreeMap<String, usize>,
    records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset from positional rows. Short rows are padded with
    /// `Null`, long rows are truncated to the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = columns.len();
        let column_index = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        let records = rows
            .into_iter()
            .map(|mut values| {
                values.resize(width, Value::Null);
                Record::new(values)
            })
            .collect();
        Dataset {
            columns,
            column_index,
            records,
        }
    }

    /// Build a dataset from name-keyed rows (JSON records, parquet rows).
    /// Column order is first appearance across the rows.
    pub fn from_named_rows(rows: Vec<BTreeMap<String, Value>>, order: Vec<String>) -> Self {
        let mut columns = order;
        let mut seen: BTreeSet<String> = columns.iter().cloned().collect();
        for row in &rows {
            for key in row.keys() {
                if seen.insert(key.clone()) {
                    columns.push(key.clone());
                }
            }
        }
        let positional = rows
            .into_iter()
            .map(|mut row| {
                columns
                    .iter()
                    .map(|c| row.remove(c).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        Dataset::new(columns, positional)
    }

    /// Immutable view of every row.
    pub fn rows(&self) -> &[Record] {
        &self.records
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index.contains_key(name)
    }

    /// Position of a column, or [`EngineError::MissingColumn`].
    pub fn column_index(&self, name: &str) -> Result<usize, EngineError> {
        self.column_index
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::MissingColumn(name.to_string()))
    }

    /// Sorted distinct non-null values of a column (empty if unknown).
    pub fn unique_values(&self, name: &str) -> BTreeSet<Value> {
        let Some(&idx) = self.column_index.get(name) else {
            return BTreeSet::new();
        };
        self.records
            .iter()
            .map(|r| r.get(idx))
            .filter(|v| !v.is_null())
            .cloned()
            .collect()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
