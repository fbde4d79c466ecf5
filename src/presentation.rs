//! Presentation adapter: turns an aggregate result and its visualization
//! hint into a chart model the dashboard can draw.

use crate::catalog::VizHint;
use crate::data::Value;
use crate::engine::{AggregateResult, CrossTab, Scalar};

/// Labelled values in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    fn from_pairs(pairs: &[(Value, f64)]) -> Self {
        ChartSeries {
            labels: pairs.iter().map(|(k, _)| k.to_string()).collect(),
            values: pairs.iter().map(|(_, v)| *v).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Bar(ChartSeries),
    Line(ChartSeries),
    Pie(ChartSeries),
    Scatter(ChartSeries),
    Metric(String),
    Heatmap(CrossTab),
    List(Vec<String>),
    /// One titled sub-chart per part of a composite result.
    Panels(Vec<(String, Chart)>),
    /// Shape did not fit the hint: show key/value rows.
    Table(Vec<(String, String)>),
    Empty,
}

impl Chart {
    pub fn from_result(hint: VizHint, result: &AggregateResult) -> Chart {
        if result.is_empty() {
            return Chart::Empty;
        }
        match (hint, result) {
            (VizHint::Bar, AggregateResult::Mapping(s)) => Chart::Bar(ChartSeries::from_pairs(s)),
            (VizHint::Line, AggregateResult::Mapping(s)) => Chart::Line(ChartSeries::from_pairs(s)),
            (VizHint::Pie, AggregateResult::Mapping(s)) => Chart::Pie(ChartSeries::from_pairs(s)),
            (VizHint::Scatter, AggregateResult::Mapping(s)) => {
                Chart::Scatter(ChartSeries::from_pairs(s))
            }
            (VizHint::Metric, AggregateResult::Scalar(s)) => Chart::Metric(format_scalar(s)),
            (VizHint::Heatmap, AggregateResult::CrossTab(t)) => Chart::Heatmap(t.clone()),
            (VizHint::Heatmap, AggregateResult::Mapping(s)) => Chart::Heatmap(single_row(s)),
            (VizHint::List, AggregateResult::List(items)) => {
                Chart::List(items.iter().map(Value::to_string).collect())
            }
            (VizHint::DualBar | VizHint::DualHeatmap | VizHint::DualLine, AggregateResult::Composite(parts)) => {
                let inner = match hint {
                    VizHint::DualBar => VizHint::Bar,
                    VizHint::DualLine => VizHint::Line,
                    _ => VizHint::Heatmap,
                };
                Chart::Panels(
                    parts
                        .iter()
                        .map(|(name, part)| (title_case(name), panel(inner, part)))
                        .collect(),
                )
            }
            (_, other) => Chart::Table(raw_rows(other)),
        }
    }
}

/// A composite part may have a different shape than its siblings, e.g.
/// seasonal revenue (mapping) next to seasonal category sales (cross-tab).
fn panel(hint: VizHint, part: &AggregateResult) -> Chart {
    match part {
        AggregateResult::CrossTab(_) => Chart::from_result(VizHint::Heatmap, part),
        _ => Chart::from_result(hint, part),
    }
}

fn single_row(series: &[(Value, f64)]) -> CrossTab {
    CrossTab {
        outer: series.iter().map(|(k, _)| k.clone()).collect(),
        inner: vec![Value::from("value")],
        cells: series.iter().map(|(_, v)| vec![Some(*v)]).collect(),
    }
}

pub fn format_number(v: f64) -> String {
    if !v.is_finite() {
        "n/a".to_string()
    } else if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v:.4}")
    }
}

pub fn format_scalar(s: &Scalar) -> String {
    match s {
        Scalar::Number(v) => format_number(*v),
        Scalar::Integer(i) => i.to_string(),
        Scalar::Text(t) => t.clone(),
        Scalar::Null => "n/a".to_string(),
    }
}

/// Flatten any result into key/value rows for the raw-data table.
pub fn raw_rows(result: &AggregateResult) -> Vec<(String, String)> {
    match result {
        AggregateResult::Scalar(s) => vec![("value".to_string(), format_scalar(s))],
        AggregateResult::List(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| ((i + 1).to_string(), v.to_string()))
            .collect(),
        AggregateResult::Mapping(series) => series
            .iter()
            .map(|(k, v)| (k.to_string(), format_number(*v)))
            .collect(),
        AggregateResult::CrossTab(tab) => tab
            .outer
            .iter()
            .zip(&tab.cells)
            .flat_map(|(o, row)| {
                tab.inner.iter().zip(row).map(move |(i, cell)| {
                    (
                        format!("{o} / {i}"),
                        cell.map_or_else(|| "n/a".to_string(), format_number),
                    )
                })
            })
            .collect(),
        AggregateResult::Composite(parts) => parts
            .iter()
            .flat_map(|(name, part)| {
                raw_rows(part)
                    .into_iter()
                    .map(move |(k, v)| (format!("{name}: {k}"), v))
            })
            .collect(),
    }
}

fn title_case(name: &str) -> String {
    name.split('_')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
