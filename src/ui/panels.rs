use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use trendlens::catalog::CATEGORIES;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

fn filter_combo(ui: &mut Ui, label: &str, selected: &mut String, choices: &[String]) -> bool {
    let mut changed = false;
    ui.strong(label);
    egui::ComboBox::from_id_salt(label)
        .selected_text(selected.as_str())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            ScrollArea::vertical().max_height(300.0).show(ui, |ui: &mut Ui| {
                for choice in choices {
                    if ui
                        .selectable_label(*selected == *choice, choice)
                        .clicked()
                    {
                        *selected = choice.clone();
                        changed = true;
                    }
                }
            });
        });
    ui.add_space(6.0);
    changed
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };
    let total = dataset.len();

    let region_choices = state.region_choices.clone();
    let category_choices = state.category_choices.clone();

    let mut changed = filter_combo(ui, "Region", &mut state.region, &region_choices);
    changed |= filter_combo(ui, "Category", &mut state.category, &category_choices);

    ui.separator();
    ui.label(format!("{total} transactions"));

    // Keep the answer on screen in step with the filters.
    if changed && state.insight.is_some() {
        state.analyze();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar with the category tabs.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(src)) = (&state.dataset, &state.source) {
            let name = src
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.label(format!("{name}: {} rows, {} columns", ds.len(), ds.columns().len()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });

    ui.horizontal(|ui: &mut Ui| {
        for (idx, category) in CATEGORIES.iter().enumerate() {
            if ui
                .selectable_label(state.category_idx == idx, category.title)
                .clicked()
            {
                state.select_category(idx);
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Question selector
// ---------------------------------------------------------------------------

/// Render the question picker and the Analyze button above the chart.
pub fn question_bar(ui: &mut Ui, state: &mut AppState) {
    let category = state.current_category();
    ui.heading(category.summary);

    ui.horizontal(|ui: &mut Ui| {
        let current = state
            .current_question()
            .map(|q| q.text)
            .unwrap_or("Select a question");
        egui::ComboBox::from_id_salt(("question", category.name))
            .selected_text(current)
            .width(360.0)
            .show_ui(ui, |ui: &mut Ui| {
                for (idx, question) in category.questions.iter().enumerate() {
                    ui.selectable_value(&mut state.question_idx, idx, question.text);
                }
            });

        let enabled = state.dataset.is_some() && !state.loading;
        if ui.add_enabled(enabled, egui::Button::new("Analyze")).clicked() {
            state.analyze();
        }
    });
    ui.separator();
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open retail dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        load_path(state, path);
    }
}

/// Load a dataset into the state, reporting failures in the status line.
pub fn load_path(state: &mut AppState, path: PathBuf) {
    state.loading = true;
    match trendlens::data::load_file(&path) {
        Ok(dataset) => state.set_dataset(dataset, path),
        Err(e) => {
            log::error!("Failed to load {}: {e}", path.display());
            state.status_message = Some(format!("Error: {e}"));
            state.loading = false;
        }
    }
}
