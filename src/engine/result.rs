//! Result shapes produced by the aggregation engine.
//!
//! Every shape serializes to JSON in its own key order: top-N results stay
//! sorted by value, grouped results stay in natural key order. Non-finite
//! numbers serialize as `null`.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::data::Value;

/// Ordered group-key → aggregate pairs.
pub type Series = Vec<(Value, f64)>;

/// A single-valued result.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Number(f64),
    Integer(i64),
    Text(String),
    /// Undefined but not an error (e.g. correlation with zero variance).
    Null,
}

/// Two-key aggregate laid out as a complete grid. `cells[o][i]` is the
/// aggregate for `outer[o]` × `inner[i]`, `None` where that combination
/// never occurs in the view (a gap, never zero-filled).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CrossTab {
    pub outer: Vec<Value>,
    pub inner: Vec<Value>,
    pub cells: Vec<Vec<Option<f64>>>,
}

impl CrossTab {
    pub fn get(&self, outer: &Value, inner: &Value) -> Option<f64> {
        let o = self.outer.iter().position(|v| v == outer)?;
        let i = self.inner.iter().position(|v| v == inner)?;
        self.cells[o][i]
    }

    pub fn is_empty(&self) -> bool {
        self.outer.is_empty()
    }

    /// Largest present cell, used to scale heatmaps.
    pub fn max_value(&self) -> Option<f64> {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .reduce(f64::max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AggregateResult {
    Scalar(Scalar),
    /// Distinct values in first-encountered order.
    List(Vec<Value>),
    Mapping(Series),
    CrossTab(CrossTab),
    /// Named sub-results, e.g. `{"size": .., "color": ..}`.
    Composite(Vec<(String, AggregateResult)>),
}

impl AggregateResult {
    pub fn as_mapping(&self) -> Option<&Series> {
        match self {
            AggregateResult::Mapping(series) => Some(series),
            _ => None,
        }
    }

    pub fn as_cross_tab(&self) -> Option<&CrossTab> {
        match self {
            AggregateResult::CrossTab(tab) => Some(tab),
            _ => None,
        }
    }

    /// Look up a named part of a composite result.
    pub fn part(&self, name: &str) -> Option<&AggregateResult> {
        match self {
            AggregateResult::Composite(parts) => {
                parts.iter().find(|(n, _)| n == name).map(|(_, r)| r)
            }
            _ => None,
        }
    }

    /// Whether the result holds no groups. Scalars are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            AggregateResult::Scalar(_) => false,
            AggregateResult::List(items) => items.is_empty(),
            AggregateResult::Mapping(series) => series.is_empty(),
            AggregateResult::CrossTab(tab) => tab.is_empty(),
            AggregateResult::Composite(parts) => parts.iter().all(|(_, r)| r.is_empty()),
        }
    }
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

struct Number(f64);

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.is_finite() {
            serializer.serialize_f64(self.0)
        } else {
            serializer.serialize_none()
        }
    }
}

struct Row<'a> {
    keys: &'a [Value],
    cells: &'a [Option<f64>],
}

impl Serialize for Row<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.keys.len()))?;
        for (key, cell) in self.keys.iter().zip(self.cells) {
            map.serialize_entry(&key.to_string(), &cell.map(Number))?;
        }
        map.end()
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Number(v) => Number(*v).serialize(serializer),
            Scalar::Integer(i) => serializer.serialize_i64(*i),
            Scalar::Text(s) => serializer.serialize_str(s),
            Scalar::Null => serializer.serialize_none(),
        }
    }
}

impl Serialize for CrossTab {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.outer.len()))?;
        for (key, cells) in self.outer.iter().zip(&self.cells) {
            let row = Row {
                keys: &self.inner,
                cells,
            };
            map.serialize_entry(&key.to_string(), &row)?;
        }
        map.end()
    }
}

impl Serialize for AggregateResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AggregateResult::Scalar(scalar) => scalar.serialize(serializer),
            AggregateResult::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            AggregateResult::Mapping(series) => {
                let mut map = serializer.serialize_map(Some(series.len()))?;
                for (key, value) in series {
                    map.serialize_entry(&key.to_string(), &Number(*value))?;
                }
                map.end()
            }
            AggregateResult::CrossTab(tab) => tab.serialize(serializer),
            AggregateResult::Composite(parts) => {
                let mut map = serializer.serialize_map(Some(parts.len()))?;
                for (name, part) in parts {
                    map.serialize_entry(name, part)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_keeps_its_order() {
        let result = AggregateResult::Mapping(vec![(Value::from("B"), 20.0), (Value::from("A"), 15.0)]);
        assert_eq!(serde_json::to_string(&result).unwrap(), r#"{"B":20.0,"A":15.0}"#);
    }

    #[test]
    fn gaps_and_nan_serialize_as_null() {
        let tab = CrossTab {
            outer: vec![Value::from("Express")],
            inner: vec![Value::from("Female"), Value::from("Male")],
            cells: vec![vec![Some(2.0), None]],
        };
        assert_eq!(
            serde_json::to_string(&AggregateResult::CrossTab(tab)).unwrap(),
            r#"{"Express":{"Female":2.0,"Male":null}}"#
        );
        assert_eq!(
            serde_json::to_string(&AggregateResult::Scalar(Scalar::Number(f64::NAN))).unwrap(),
            "null"
        );
    }

    #[test]
    fn composite_of_empty_parts_is_empty() {
        let result = AggregateResult::Composite(vec![
            ("size".into(), AggregateResult::Mapping(vec![])),
            ("color".into(), AggregateResult::Mapping(vec![])),
        ]);
        assert!(result.is_empty());
        assert!(result.part("size").is_some());
        assert_eq!(serde_json::to_string(&result).unwrap(), r#"{"size":{},"color":{}}"#);
    }
}
