use std::path::PathBuf;
use std::sync::Arc;

use trendlens::catalog::{self, Category, Question, CATEGORIES};
use trendlens::data::{col, Dataset, FilterSet, ALL};
use trendlens::presentation::{raw_rows, Chart};
use trendlens::Engine;

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The answer currently on screen.
pub struct Insight {
    pub question: &'static Question,
    pub summary: &'static str,
    pub filter_text: String,
    pub chart: Chart,
    /// Key/value rows for the raw-data table.
    pub raw: Vec<(String, String)>,
    /// Colours for the chart's labels (bars, wedges, list items).
    pub color_map: ColorMap,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Arc<Dataset>>,

    /// Where the dataset came from, for the top bar.
    pub source: Option<PathBuf>,

    pub engine: Engine,

    /// Index into [`CATEGORIES`] of the active tab.
    pub category_idx: usize,

    /// Index of the selected question within the active tab.
    pub question_idx: usize,

    /// Region / category filter selections ("All" = unrestricted).
    pub region: String,
    pub category: String,

    /// Choices offered by the filter selectors, "All" first.
    pub region_choices: Vec<String>,
    pub category_choices: Vec<String>,

    /// Result of the last "Analyze" click.
    pub insight: Option<Insight>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            source: None,
            engine: Engine::new(),
            category_idx: 0,
            question_idx: 0,
            region: ALL.to_string(),
            category: ALL.to_string(),
            region_choices: vec![ALL.to_string()],
            category_choices: vec![ALL.to_string()],
            insight: None,
            status_message: None,
            loading: false,
        }
    }
}

fn choices(dataset: &Dataset, column: &str) -> Vec<String> {
    std::iter::once(ALL.to_string())
        .chain(dataset.unique_values(column).iter().map(|v| v.to_string()))
        .collect()
}

/// Every label a chart will colour, in first-appearance order.
fn chart_labels(chart: &Chart) -> Vec<String> {
    match chart {
        Chart::Bar(s) | Chart::Line(s) | Chart::Pie(s) | Chart::Scatter(s) => s.labels.clone(),
        Chart::List(items) => items.clone(),
        Chart::Panels(panels) => {
            let mut labels: Vec<String> = Vec::new();
            for label in panels.iter().flat_map(|(_, c)| chart_labels(c)) {
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
            labels
        }
        Chart::Metric(_) | Chart::Heatmap(_) | Chart::Table(_) | Chart::Empty => Vec::new(),
    }
}

impl AppState {
    /// Ingest a newly loaded dataset and reset the filters.
    pub fn set_dataset(&mut self, dataset: Dataset, source: PathBuf) {
        self.region_choices = choices(&dataset, col::REGION);
        self.category_choices = choices(&dataset, col::CATEGORY);
        self.region = ALL.to_string();
        self.category = ALL.to_string();

        self.dataset = Some(Arc::new(dataset));
        self.source = Some(source);
        self.insight = None;
        self.status_message = None;
        self.loading = false;
    }

    pub fn current_category(&self) -> &'static Category {
        &CATEGORIES[self.category_idx.min(CATEGORIES.len() - 1)]
    }

    pub fn current_question(&self) -> Option<&'static Question> {
        self.current_category().questions.get(self.question_idx)
    }

    /// Switch tabs; the previous answer belongs to the old tab.
    pub fn select_category(&mut self, idx: usize) {
        if idx != self.category_idx {
            self.category_idx = idx;
            self.question_idx = 0;
            self.insight = None;
        }
    }

    /// The filters as the API would receive them. "All" is sent as-is and
    /// means unrestricted.
    pub fn filters(&self) -> FilterSet {
        let mut filters = FilterSet::new();
        filters.insert(col::REGION.to_string(), self.region.clone());
        filters.insert(col::CATEGORY.to_string(), self.category.clone());
        filters
    }

    /// Compute the selected question against the loaded dataset.
    pub fn analyze(&mut self) {
        let (Some(dataset), Some(question)) = (self.dataset.clone(), self.current_question()) else {
            return;
        };
        let filters = self.filters();
        match self.engine.run(&dataset, question.operation, &filters) {
            Ok(result) => {
                let chart = Chart::from_result(question.viz, &result);
                let raw = raw_rows(&result);
                let labels = chart_labels(&chart);
                self.insight = Some(Insight {
                    question,
                    summary: self.current_category().summary,
                    filter_text: catalog::filter_text(&filters),
                    chart,
                    raw,
                    color_map: ColorMap::new(&labels),
                });
                self.status_message = None;
            }
            Err(e) => {
                log::error!("{} failed: {e}", question.operation);
                self.insight = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
