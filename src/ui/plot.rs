use std::ops::RangeInclusive;

use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, MarkerShape, Plot, PlotPoints, Points};

use crate::state::DashboardView;

const CHART_HEIGHT: f32 = 300.0;

/// Share of a year slot covered by one year's group of bars.
const BAR_GROUP_WIDTH: f64 = 0.8;

/// Whole years only on the x axis.
fn year_label(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    if mark.value.fract() == 0.0 {
        format!("{:.0}", mark.value)
    } else {
        String::new()
    }
}

fn base_plot(id: &'static str) -> Plot<'static> {
    Plot::new(id)
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Год")
        .y_axis_label("Значение")
        .x_axis_formatter(year_label)
        .allow_scroll(false)
}

// ---------------------------------------------------------------------------
// Line chart – topic dynamics
// ---------------------------------------------------------------------------

/// One line with circle markers per topic; lines break where values are missing.
pub fn line_chart(ui: &mut Ui, view: &DashboardView) {
    base_plot("line_chart").show(ui, |plot_ui| {
        for topic_view in &view.topics {
            let Some(series) = &topic_view.series else {
                continue;
            };
            let name = topic_view.topic.display_label();
            let color = topic_view.topic.color();

            for segment in series.segments() {
                plot_ui.line(
                    Line::new(PlotPoints::from(segment.clone()))
                        .name(name)
                        .color(color)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(segment))
                        .name(name)
                        .color(color)
                        .shape(MarkerShape::Circle)
                        .radius(4.0),
                );
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Bar chart – topics side by side per year
// ---------------------------------------------------------------------------

/// Grouped bars: each year slot is split evenly between the selected topics.
pub fn bar_chart(ui: &mut Ui, view: &DashboardView) {
    let n = view.topics.len().max(1) as f64;
    let bar_width = BAR_GROUP_WIDTH / n;

    base_plot("bar_chart").show(ui, |plot_ui| {
        for (i, topic_view) in view.topics.iter().enumerate() {
            let Some(series) = &topic_view.series else {
                continue;
            };
            let offset = (i as f64 - (n - 1.0) / 2.0) * bar_width;
            let bars: Vec<Bar> = series
                .defined()
                .map(|(year, value)| {
                    Bar::new(year as f64 + offset, value)
                        .width(bar_width)
                        .name(year)
                })
                .collect();

            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name(topic_view.topic.display_label())
                    .color(topic_view.topic.color().gamma_multiply(0.8)),
            );
        }
    });
}
