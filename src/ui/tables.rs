use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::TableSlice;
use crate::data::series::TopicSummary;
use crate::state::DashboardView;

const UP: Color32 = Color32::from_rgb(0x09, 0xab, 0x3b);
const DOWN: Color32 = Color32::from_rgb(0xff, 0x2b, 0x2b);

/// Integers without decimals, everything else with two.
fn format_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

fn format_delta(delta: f64) -> String {
    let sign = if delta > 0.0 { "+" } else { "" };
    format!("{sign}{}", format_value(delta))
}

fn format_opt(v: Option<f64>) -> String {
    v.map(format_value).unwrap_or_else(|| "n/a".to_string())
}

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// One card per topic: latest value, change, min / max / mean.
pub fn metrics(ui: &mut Ui, view: &DashboardView) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for topic_view in &view.topics {
            ui.group(|ui: &mut Ui| {
                ui.vertical(|ui: &mut Ui| {
                    ui.label(
                        RichText::new(topic_view.topic.display_label())
                            .color(topic_view.topic.color()),
                    );
                    match &topic_view.summary {
                        Some(summary) => summary_card(ui, summary),
                        None => {
                            ui.weak("Нет данных по региону");
                        }
                    }
                });
            });
        }
    });
}

fn summary_card(ui: &mut Ui, summary: &TopicSummary) {
    match summary.latest {
        Some((year, value)) => {
            ui.heading(format_value(value));
            ui.weak(format!("{year} г."));
        }
        None => {
            ui.heading("n/a");
        }
    }

    if let (Some(delta), Some((prev_year, _))) = (summary.delta(), summary.previous) {
        let pct = summary
            .delta_percent()
            .map(|p| format!(" ({p:+.1}%)"))
            .unwrap_or_default();
        let color = if delta < 0.0 { DOWN } else { UP };
        ui.colored_label(color, format!("{}{pct} к {prev_year}", format_delta(delta)));
    }

    ui.weak(format!(
        "мин {} · макс {} · среднее {}",
        format_opt(summary.min),
        format_opt(summary.max),
        format_opt(summary.mean)
    ));
}

// ---------------------------------------------------------------------------
// Raw data tables
// ---------------------------------------------------------------------------

/// `Name` plus the selected year columns, one table per topic.
pub fn data_tables(ui: &mut Ui, view: &DashboardView) {
    for topic_view in &view.topics {
        ui.label(
            RichText::new(topic_view.topic.display_label()).color(topic_view.topic.color()),
        );
        if topic_view.table.rows.is_empty() {
            ui.weak("Регион отсутствует в этом наборе данных");
            continue;
        }
        ui.push_id(topic_view.topic.file_name(), |ui: &mut Ui| {
            egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
                slice_table(ui, &topic_view.table);
            });
        });
        ui.add_space(6.0);
    }
}

fn slice_table(ui: &mut Ui, slice: &TableSlice) {
    let value_columns = slice.header.len().saturating_sub(1);
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(160.0))
        .columns(Column::auto().at_least(60.0), value_columns)
        .header(20.0, |mut header| {
            for name in &slice.header {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|mut body| {
            for row in &slice.rows {
                body.row(18.0, |mut table_row| {
                    for cell in row {
                        table_row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_drop_decimals_for_whole_numbers() {
        assert_eq!(format_value(1500.0), "1500");
        assert_eq!(format_value(12.345), "12.35");
        assert_eq!(format_opt(None), "n/a");
    }

    #[test]
    fn deltas_carry_a_sign() {
        assert_eq!(format_delta(20.0), "+20");
        assert_eq!(format_delta(-0.5), "-0.50");
        assert_eq!(format_delta(0.0), "0");
    }
}
