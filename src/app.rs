use eframe::egui;

use crate::config::AppConfig;
use crate::state::{AppState, Selection};
use crate::ui::{panels, plot, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RegionDashboardApp {
    pub state: AppState,
}

impl RegionDashboardApp {
    /// Restore the last selection (if any) and load the data directory.
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let selection: Selection = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        Self {
            state: AppState::bootstrap(config, selection),
        }
    }
}

impl eframe::App for RegionDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // Loading failed: nothing else is rendered.
        if let Some(err) = &self.state.load_error {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.colored_label(egui::Color32::RED, err);
                });
            });
            return;
        }

        // ---- Left side panel: analysis settings ----
        egui::SidePanel::left("settings_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts, metrics, tables ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(view) = &self.state.view else {
                ui.centered_and_justified(|ui| {
                    ui.heading("Измените выбор на боковой панели");
                });
                return;
            };

            ui.heading(format!("Анализ региона: {}", view.region));
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.strong("Динамика показателей");
                    plot::line_chart(ui, view);
                    ui.add_space(8.0);

                    ui.strong("Сравнение показателей по годам");
                    plot::bar_chart(ui, view);
                    ui.add_space(8.0);

                    ui.strong("Ключевые показатели");
                    tables::metrics(ui, view);
                    ui.add_space(8.0);

                    ui.strong("Детальные данные");
                    tables::data_tables(ui, view);
                });
        });
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.state.selection);
    }
}
