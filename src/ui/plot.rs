use std::f64::consts::TAU;

use eframe::egui::{self, Align2, Color32, FontId, RichText, ScrollArea, Sense, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, PlotUi, Points, Polygon};

use trendlens::presentation::{format_number, Chart, ChartSeries};
use trendlens::CrossTab;

use crate::color::{heat_color, ColorMap};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Insight view (central panel)
// ---------------------------------------------------------------------------

/// Render the current answer in the central panel.
pub fn insight_view(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to start  (File → Open…)");
        });
        return;
    }
    let Some(insight) = &state.insight else {
        ui.label("Pick a question and press Analyze.");
        return;
    };

    ui.label(RichText::new(insight.summary).weak());
    ui.strong(format!("{}{}", insight.question.text, insight.filter_text));
    ui.add_space(4.0);

    let chart_height = (ui.available_height() - 180.0).max(240.0);
    ScrollArea::vertical()
        .id_salt("insight_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            draw_chart(ui, "insight", &insight.chart, &insight.color_map, chart_height);

            ui.add_space(8.0);
            egui::CollapsingHeader::new("View Raw Data")
                .default_open(false)
                .show(ui, |ui: &mut Ui| raw_table(ui, "raw_data", &insight.raw));
        });
}

fn draw_chart(ui: &mut Ui, id: &str, chart: &Chart, colors: &ColorMap, height: f32) {
    match chart {
        Chart::Bar(series) => bar_chart(ui, id, series, colors, height),
        Chart::Line(series) => line_chart(ui, id, series, height),
        Chart::Scatter(series) => scatter_chart(ui, id, series, height),
        Chart::Pie(series) => pie_chart(ui, id, series, colors, height),
        Chart::Metric(text) => {
            ui.label(RichText::new("Result").weak());
            ui.label(RichText::new(text).size(36.0).strong());
        }
        Chart::Heatmap(tab) => heatmap(ui, tab),
        Chart::List(items) => {
            for item in items {
                ui.label(RichText::new(format!("• {item}")).color(colors.color_for(item)));
            }
        }
        Chart::Panels(panels) => {
            let each = (height / panels.len().max(1) as f32).max(200.0);
            for (idx, (title, sub)) in panels.iter().enumerate() {
                ui.heading(title);
                draw_chart(ui, &format!("{id}_{idx}"), sub, colors, each);
                ui.add_space(8.0);
            }
        }
        Chart::Table(rows) => raw_table(ui, id, rows),
        Chart::Empty => {
            ui.label("No rows match the current filters.");
        }
    }
}

/// Category axis: integer grid marks show the matching label.
fn category_plot(
    ui: &mut Ui,
    id: &str,
    series: &ChartSeries,
    height: f32,
    add_contents: impl FnOnce(&mut PlotUi),
) {
    let labels = series.labels.clone();
    Plot::new(id.to_string())
        .height(height)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .allow_boxed_zoom(true)
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, add_contents);
}

fn bar_chart(ui: &mut Ui, id: &str, series: &ChartSeries, colors: &ColorMap, height: f32) {
    let bars: Vec<Bar> = series
        .labels
        .iter()
        .zip(&series.values)
        .enumerate()
        .map(|(i, (label, &value))| {
            Bar::new(i as f64, value)
                .name(label)
                .fill(colors.color_for(label))
                .width(0.7)
        })
        .collect();

    category_plot(ui, id, series, height, |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars));
    });
}

fn line_chart(ui: &mut Ui, id: &str, series: &ChartSeries, height: f32) {
    let points: Vec<[f64; 2]> = series
        .values
        .iter()
        .enumerate()
        .map(|(i, &v)| [i as f64, v])
        .collect();

    category_plot(ui, id, series, height, |plot_ui| {
        plot_ui.line(
            Line::new(PlotPoints::from(points.clone()))
                .color(Color32::LIGHT_BLUE)
                .width(2.0),
        );
        plot_ui.points(Points::new(PlotPoints::from(points)).radius(3.5));
    });
}

/// Numeric keys (ratings, ages) are plotted at their own value.
fn scatter_chart(ui: &mut Ui, id: &str, series: &ChartSeries, height: f32) {
    let numeric: Option<Vec<f64>> = series.labels.iter().map(|l| l.parse().ok()).collect();
    let Some(xs) = numeric else {
        return line_chart(ui, id, series, height);
    };
    let points: PlotPoints = xs
        .iter()
        .zip(&series.values)
        .map(|(&x, &y)| [x, y])
        .collect();

    Plot::new(id.to_string())
        .height(height)
        .show(ui, |plot_ui| {
            plot_ui.points(Points::new(points).radius(4.0).color(Color32::LIGHT_BLUE));
        });
}

fn pie_chart(ui: &mut Ui, id: &str, series: &ChartSeries, colors: &ColorMap, height: f32) {
    let total: f64 = series.values.iter().filter(|v| v.is_finite()).sum();
    if total <= 0.0 {
        ui.label("Nothing to chart.");
        return;
    }

    Plot::new(id.to_string())
        .height(height)
        .data_aspect(1.0)
        .show_axes([false, false])
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            let mut start = 0.0;
            for (label, &value) in series.labels.iter().zip(&series.values) {
                if !value.is_finite() || value <= 0.0 {
                    continue;
                }
                let sweep = value / total * TAU;
                let steps = ((sweep / TAU) * 90.0).ceil().max(2.0) as usize;
                let mut wedge = vec![[0.0, 0.0]];
                wedge.extend((0..=steps).map(|s| {
                    let a = start + sweep * s as f64 / steps as f64;
                    [a.cos(), a.sin()]
                }));
                let share = format_number(value / total * 100.0);
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(wedge))
                        .name(format!("{label} ({share}%)"))
                        .fill_color(colors.color_for(label)),
                );
                start += sweep;
            }
        });
}

// ---------------------------------------------------------------------------
// Heatmap: rows are the inner keys, columns the outer keys
// ---------------------------------------------------------------------------

fn heatmap(ui: &mut Ui, tab: &CrossTab) {
    const LABEL_WIDTH: f32 = 140.0;
    const ROW_HEIGHT: f32 = 22.0;

    let max = tab.max_value().unwrap_or(0.0);
    let n_cols = tab.outer.len().max(1) as f32;
    let width = ui.available_width().max(LABEL_WIDTH + 60.0);
    let cell_width = (width - LABEL_WIDTH) / n_cols;
    let height = ROW_HEIGHT * (tab.inner.len() + 1) as f32;

    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, height), Sense::hover());
    let painter = ui.painter_at(rect);
    let font = FontId::proportional(12.0);
    let text_color = ui.visuals().text_color();

    for (c, key) in tab.outer.iter().enumerate() {
        let pos = rect.min + egui::vec2(LABEL_WIDTH + cell_width * (c as f32 + 0.5), ROW_HEIGHT * 0.5);
        painter.text(pos, Align2::CENTER_CENTER, key.to_string(), font.clone(), text_color);
    }

    for (r, key) in tab.inner.iter().enumerate() {
        let y = ROW_HEIGHT * (r as f32 + 1.0);
        painter.text(
            rect.min + egui::vec2(4.0, y + ROW_HEIGHT * 0.5),
            Align2::LEFT_CENTER,
            key.to_string(),
            font.clone(),
            text_color,
        );
        for (c, cells) in tab.cells.iter().enumerate() {
            let cell_rect = egui::Rect::from_min_size(
                rect.min + egui::vec2(LABEL_WIDTH + cell_width * c as f32, y),
                egui::vec2(cell_width - 1.0, ROW_HEIGHT - 1.0),
            );
            let (fill, text) = match cells[r] {
                Some(v) if max > 0.0 => (heat_color(v / max), format_number(v)),
                Some(v) => (heat_color(0.0), format_number(v)),
                None => (Color32::from_gray(40), "–".to_string()),
            };
            painter.rect_filled(cell_rect, 2.0, fill);
            painter.text(
                cell_rect.center(),
                Align2::CENTER_CENTER,
                text,
                font.clone(),
                Color32::WHITE,
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Raw data
// ---------------------------------------------------------------------------

fn raw_table(ui: &mut Ui, id: &str, rows: &[(String, String)]) {
    ui.push_id(id, |ui: &mut Ui| {
        table(ui, rows);
    });
}

fn table(ui: &mut Ui, rows: &[(String, String)]) {
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(160.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Key");
            });
            header.col(|ui| {
                ui.strong("Value");
            });
        })
        .body(|mut body| {
            for (key, value) in rows {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(key);
                    });
                    row.col(|ui| {
                        ui.label(value);
                    });
                });
            }
        });
}
