use eframe::egui::{self, Color32, RichText, Slider, Ui};

use crate::state::AppState;
use crate::topic::Topic;

// ---------------------------------------------------------------------------
// Left side panel – analysis settings
// ---------------------------------------------------------------------------

/// Render the region / topic / year-range selectors.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Настройки анализа");
    ui.separator();

    let Some(data) = &state.data else {
        ui.label("Данные не загружены.");
        return;
    };
    for dataset in data.datasets.values() {
        if let Some(err) = &dataset.schema_error {
            ui.colored_label(Color32::RED, err.to_string());
        }
    }

    // Clone what we need so we can mutate state below.
    let regions = data.regions.clone();

    // ---- Region selector ----
    ui.strong("Выберите регион:");
    let current = state.selection.region.clone().unwrap_or_default();
    let mut picked = None;
    egui::ComboBox::from_id_salt("region")
        .selected_text(&current)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for region in &regions {
                if ui.selectable_label(current == *region, region).clicked() {
                    picked = Some(region.clone());
                }
            }
        });
    if let Some(region) = picked {
        state.set_region(region);
    }
    ui.add_space(8.0);

    // ---- Topic multi-select ----
    ui.strong("Выберите темы:");
    for topic in Topic::ALL {
        let mut checked = state.selection.topics.contains(&topic);
        let text = RichText::new(topic.label()).color(topic.color());
        if ui.checkbox(&mut checked, text).changed() {
            state.toggle_topic(topic);
        }
    }
    ui.add_space(8.0);

    // ---- Year range ----
    ui.strong("Диапазон лет:");
    if let Some((min, max)) = state.year_bounds {
        let (mut lo, mut hi) = state.selection.year_range.unwrap_or((min, max));
        let lo_changed = ui.add(Slider::new(&mut lo, min..=max).text("с")).changed();
        let hi_changed = ui.add(Slider::new(&mut hi, min..=max).text("по")).changed();
        if lo_changed || hi_changed {
            state.set_year_range(lo, hi);
        }
    }

    if let Some(err) = &state.selection_error {
        ui.add_space(8.0);
        ui.colored_label(Color32::from_rgb(0xd9, 0x8c, 0x00), err.to_string());
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Файл", |ui: &mut Ui| {
            if ui.button("Открыть папку с данными…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(data) = &state.data {
            ui.label(format!(
                "{}: {} регионов, файлов в кэше: {}",
                data.data_dir.display(),
                data.regions.len(),
                state.cached_datasets()
            ));
        }

        if let Some(view) = &state.view {
            ui.separator();
            ui.label(format!(
                "тем: {}, лет: {}",
                view.topics.len(),
                view.years.len()
            ));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Папка с budget.csv, housing.csv, investments.csv")
        .set_directory(&state.config.data_dir)
        .pick_folder();

    if let Some(dir) = folder {
        log::info!("Switching data directory to {}", dir.display());
        state.reload(dir);
    }
}
