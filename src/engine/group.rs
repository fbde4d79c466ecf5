use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use super::result::{CrossTab, Series};
use crate::data::{Value, View};
use crate::error::EngineResult;

/// How a group's rows are reduced to one number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Agg<'c> {
    /// Sum of a numeric column; non-numeric cells are skipped.
    Sum(&'c str),
    /// Arithmetic mean of a numeric column; NaN if no cell is numeric.
    Mean(&'c str),
    /// Number of rows.
    Count,
}

/// One group after aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: Value,
    pub value: f64,
    /// Position in the view of the group's first row, for tie-breaking.
    pub first_seen: usize,
}

#[derive(Default)]
struct Acc {
    sum: f64,
    numeric: usize,
    rows: usize,
    first_seen: usize,
}

impl Acc {
    fn push(&mut self, cell: Option<&Value>) {
        self.rows += 1;
        if let Some(v) = cell.and_then(Value::as_f64) {
            self.sum += v;
            self.numeric += 1;
        }
    }

    fn finish(&self, agg: Agg<'_>) -> f64 {
        match agg {
            Agg::Sum(_) => self.sum,
            Agg::Mean(_) if self.numeric == 0 => f64::NAN,
            Agg::Mean(_) => self.sum / self.numeric as f64,
            Agg::Count => self.rows as f64,
        }
    }
}

fn measure_column(view: &View<'_>, agg: Agg<'_>) -> EngineResult<Option<usize>> {
    match agg {
        Agg::Sum(c) | Agg::Mean(c) => view.column(c).map(Some),
        Agg::Count => Ok(None),
    }
}

/// Partition the view by `key` and reduce each partition with `agg`.
/// Rows whose key is null belong to no group. Groups come back in natural
/// (sorted) key order.
pub fn group_by(view: &View<'_>, key: &str, agg: Agg<'_>) -> EngineResult<Vec<Group>> {
    let key_idx = view.column(key)?;
    let value_idx = measure_column(view, agg)?;

    let mut groups: BTreeMap<&Value, Acc> = BTreeMap::new();
    for (pos, record) in view.records().enumerate() {
        let k = record.get(key_idx);
        if k.is_null() {
            continue;
        }
        let acc = groups.entry(k).or_insert_with(|| Acc {
            first_seen: pos,
            ..Acc::default()
        });
        acc.push(value_idx.map(|i| record.get(i)));
    }

    Ok(groups
        .into_iter()
        .map(|(k, acc)| Group {
            key: k.clone(),
            value: acc.finish(agg),
            first_seen: acc.first_seen,
        })
        .collect())
}

/// Groups as a series in natural key order.
pub fn natural(groups: Vec<Group>) -> Series {
    groups.into_iter().map(|g| (g.key, g.value)).collect()
}

fn ranked(mut groups: Vec<Group>, n: usize, cmp: impl Fn(f64, f64) -> Ordering) -> Series {
    groups.retain(|g| !g.value.is_nan());
    groups.sort_by(|a, b| cmp(a.value, b.value).then(a.first_seen.cmp(&b.first_seen)));
    groups.truncate(n);
    natural(groups)
}

/// The `n` largest groups, descending. Ties go to the group seen first.
pub fn top_n(groups: Vec<Group>, n: usize) -> Series {
    ranked(groups, n, |a, b| b.total_cmp(&a))
}

/// The `n` smallest groups, ascending. Ties go to the group seen first.
pub fn bottom_n(groups: Vec<Group>, n: usize) -> Series {
    ranked(groups, n, |a, b| a.total_cmp(&b))
}

/// Every group, descending by value (frequency tables).
pub fn by_frequency(groups: Vec<Group>) -> Series {
    top_n(groups, usize::MAX)
}

/// Cross-tabulate `agg` over `row_key` × `col_key`.
///
/// The table is keyed the way a column-oriented dump of a pivot reads:
/// outer keys are the distinct `col_key` values, inner keys the distinct
/// `row_key` values, both sorted. Combinations absent from the view are
/// gaps (`None`), not zeros.
pub fn cross_tab(
    view: &View<'_>,
    row_key: &str,
    col_key: &str,
    agg: Agg<'_>,
) -> EngineResult<CrossTab> {
    let row_idx = view.column(row_key)?;
    let col_idx = view.column(col_key)?;
    let value_idx = measure_column(view, agg)?;

    let mut cells: BTreeMap<(&Value, &Value), Acc> = BTreeMap::new();
    let mut rows: BTreeSet<&Value> = BTreeSet::new();
    let mut cols: BTreeSet<&Value> = BTreeSet::new();

    for record in view.records() {
        let (r, c) = (record.get(row_idx), record.get(col_idx));
        if r.is_null() || c.is_null() {
            continue;
        }
        rows.insert(r);
        cols.insert(c);
        cells
            .entry((c, r))
            .or_default()
            .push(value_idx.map(|i| record.get(i)));
    }

    let outer: Vec<Value> = cols.into_iter().cloned().collect();
    let inner: Vec<Value> = rows.into_iter().cloned().collect();
    let grid = outer
        .iter()
        .map(|o| {
            inner
                .iter()
                .map(|i| cells.get(&(o, i)).map(|acc| acc.finish(agg)))
                .collect()
        })
        .collect();

    Ok(CrossTab {
        outer,
        inner,
        cells: grid,
    })
}

/// Numeric cells of a column over the view; non-numeric cells are `None`.
pub fn numeric_cells(view: &View<'_>, column: &str) -> EngineResult<Vec<Option<f64>>> {
    let idx = view.column(column)?;
    Ok(view.records().map(|r| r.get(idx).as_f64()).collect())
}

/// Mean of the numeric cells, NaN if there are none.
pub fn mean(values: &[Option<f64>]) -> f64 {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return f64::NAN;
    }
    present.iter().sum::<f64>() / present.len() as f64
}

/// Quantile `q` of the numeric cells, interpolating linearly between the
/// closest ranks. `None` when no cell is numeric.
pub fn quantile(values: &[Option<f64>], q: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = values
        .iter()
        .flatten()
        .copied()
        .filter(|v| !v.is_nan())
        .collect();
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let pos = q * (n - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let fraction = pos - lower as f64;

    if lower == upper || upper >= n {
        Some(sorted[lower.min(n - 1)])
    } else {
        Some(sorted[lower] * (1.0 - fraction) + sorted[upper] * fraction)
    }
}

/// Pearson correlation over the rows where both sides are numeric.
/// `None` with fewer than two pairs or when either side has zero variance.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let (dx, dy) = (x - mean_x, y - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(key: &str, value: f64, first_seen: usize) -> Group {
        Group {
            key: Value::from(key),
            value,
            first_seen,
        }
    }

    #[test]
    fn top_n_breaks_ties_by_first_seen() {
        let groups = vec![g("a", 5.0, 2), g("b", 9.0, 1), g("c", 5.0, 0)];
        let top = top_n(groups, 3);
        let keys: Vec<String> = top.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, ["b", "c", "a"]);
    }

    #[test]
    fn bottom_n_ascends_and_truncates() {
        let groups = vec![g("a", 3.0, 0), g("b", 1.0, 1), g("c", 2.0, 2)];
        assert_eq!(
            bottom_n(groups, 2),
            vec![(Value::from("b"), 1.0), (Value::from("c"), 2.0)]
        );
    }

    #[test]
    fn nan_groups_are_not_ranked() {
        let groups = vec![g("a", f64::NAN, 0), g("b", 1.0, 1)];
        assert_eq!(top_n(groups, 5), vec![(Value::from("b"), 1.0)]);
    }

    #[test]
    fn quantile_interpolates() {
        let values: Vec<Option<f64>> = (1..=5).map(|v| Some(v as f64)).collect();
        assert_eq!(quantile(&values, 0.75), Some(4.0));
        let values = vec![Some(1.0), Some(2.0), None, Some(3.0), Some(4.0)];
        assert_eq!(quantile(&values, 0.75), Some(3.25));
        assert_eq!(quantile(&[None], 0.75), None);
    }

    #[test]
    fn pearson_limits() {
        let xs = vec![Some(1.0), Some(2.0), Some(3.0)];
        let up = vec![Some(2.0), Some(4.0), Some(6.0)];
        let down = vec![Some(3.0), Some(2.0), Some(1.0)];
        let flat = vec![Some(7.0), Some(7.0), Some(7.0)];
        assert!((pearson(&xs, &up).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson(&xs, &down).unwrap() + 1.0).abs() < 1e-12);
        assert_eq!(pearson(&xs, &flat), None);
        assert_eq!(pearson(&xs[..1], &up[..1]), None);
    }

    #[test]
    fn mean_skips_missing_cells() {
        assert_eq!(mean(&[Some(1.0), None, Some(3.0)]), 2.0);
        assert!(mean(&[None]).is_nan());
    }
}
