use std::path::Path;

use eframe::egui::{self, Color32, Key, RichText, ScrollArea, Ui};

use pokedex_viz::data::filter::TypeFilter;
use pokedex_viz::data::loader;
use pokedex_viz::state::{AppState, ChartView};

// ---------------------------------------------------------------------------
// Left side panel – search, filters and chart selectors
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the closures.
    let types = dataset.types.clone();
    let generations = dataset.generations.clone();
    let names: Vec<String> = dataset.iter().map(|r| r.name.clone()).collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::CollapsingHeader::new(RichText::new("Search").strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| search_box(ui, state));

            if state.config.show_type_filters {
                egui::CollapsingHeader::new(RichText::new("Type filters").strong())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        let t1 = state.interaction.type1_filter().cloned();
                        if let Some((on, value)) = type_filter_row(ui, "Type 1", t1, &types) {
                            state.set_type1_filter(on, &value);
                        }
                        let t2 = state.interaction.type2_filter().cloned();
                        if let Some((on, value)) = type_filter_row(ui, "Type 2", t2, &types) {
                            state.set_type2_filter(on, &value);
                        }
                    });
            }

            if ui.button("Reset search & filters").clicked() {
                state.reset_interaction();
            }
            ui.label(format!(
                "{} of {} visible",
                state.visible_indices.len(),
                names.len()
            ));
            ui.separator();

            egui::CollapsingHeader::new(RichText::new("Bar legend").strong())
                .default_open(state.view == ChartView::StackedBars)
                .show(ui, |ui: &mut Ui| {
                    for (type_name, color) in state.palette.legend_entries() {
                        let selected = state.stack_type.as_deref() == Some(type_name.as_str());
                        let text = RichText::new(format!("■ {type_name}")).color(color);
                        if ui.selectable_label(selected, text).clicked() {
                            state.toggle_stack_type(&type_name);
                        }
                    }
                    if ui.small_button("Show all types").clicked() {
                        state.reset_stack();
                    }
                });

            egui::CollapsingHeader::new(RichText::new("Histogram").strong())
                .default_open(state.view == ChartView::Histogram)
                .show(ui, |ui: &mut Ui| {
                    if let (Some(&lo), Some(&hi)) = (generations.first(), generations.last()) {
                        let mut generation = state.histogram_generation.unwrap_or(lo);
                        let slider = egui::Slider::new(&mut generation, lo..=hi).text("Generation");
                        if ui.add(slider).changed() {
                            state.set_histogram_generation(generation);
                        }
                    }
                });

            egui::CollapsingHeader::new(RichText::new("Radar").strong())
                .default_open(state.view == ChartView::Radar)
                .show(ui, |ui: &mut Ui| {
                    let current = state.radar_primary.clone().unwrap_or_default();
                    if let Some(name) = name_combo(ui, "radar_primary", &current, &names) {
                        state.set_radar_primary(&name);
                    }
                    if state.config.dual_radar {
                        let current = state.radar_secondary.clone().unwrap_or_default();
                        if let Some(name) = name_combo(ui, "radar_secondary", &current, &names) {
                            state.set_radar_secondary(&name);
                        }
                    }
                });

            if let Some(rec) = state.highlighted_record() {
                ui.separator();
                ui.strong(&rec.name);
                ui.label(format!("Type 1: {}", rec.type1));
                ui.label(format!("Type 2: {}", rec.type2_label()));
                ui.label(format!("Total: {}  ·  Gen {}", rec.total, rec.generation));
                if rec.legendary {
                    ui.label(RichText::new("Legendary").color(Color32::GOLD));
                }
            }
        });
}

/// Search text box with its suggestion list.
fn search_box(ui: &mut Ui, state: &mut AppState) {
    let area = ui.vertical(|ui: &mut Ui| {
        let mut text = state.search_text.clone();
        ui.horizontal(|ui: &mut Ui| {
            let response = ui.text_edit_singleline(&mut text);
            if response.changed() {
                state.set_search_text(&text);
            }
            if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Escape)) {
                state.dismiss_suggestions();
            }
            if ui.small_button("✕").clicked() {
                state.clear_search();
            }
        });

        let suggestions = state.interaction.suggestions().to_vec();
        for name in suggestions {
            if ui.selectable_label(false, &name).clicked() {
                state.select_suggestion(&name);
            }
        }
    });

    // A click outside the box and its list closes the list.
    if area.response.clicked_elsewhere() {
        state.dismiss_suggestions();
    }
}

/// Checkbox + type dropdown. Returns the new `(enabled, value)` on change.
fn type_filter_row(
    ui: &mut Ui,
    label: &str,
    current: Option<TypeFilter>,
    types: &[String],
) -> Option<(bool, String)> {
    let (mut enabled, mut value) = match current {
        Some(f) => (f.enabled, f.value),
        None => (false, types.first().cloned().unwrap_or_default()),
    };
    let mut changed = false;

    ui.horizontal(|ui: &mut Ui| {
        changed |= ui.checkbox(&mut enabled, label).changed();
        egui::ComboBox::from_id_salt(label)
            .selected_text(&value)
            .show_ui(ui, |ui: &mut Ui| {
                for t in types {
                    changed |= ui.selectable_value(&mut value, t.clone(), t).changed();
                }
            });
    });

    changed.then_some((enabled, value))
}

/// Dropdown of every record name. Returns the newly picked name.
fn name_combo(ui: &mut Ui, id: &str, current: &str, names: &[String]) -> Option<String> {
    let mut picked = None;
    egui::ComboBox::from_id_salt(id)
        .selected_text(current)
        .height(300.0)
        .show_ui(ui, |ui: &mut Ui| {
            for name in names {
                if ui.selectable_label(name == current, name).clicked() {
                    picked = Some(name.clone());
                }
            }
        });
    picked
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        for view in ChartView::ALL {
            ui.selectable_value(&mut state.view, view, view.label());
        }

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records, {} generations",
                ds.len(),
                ds.generations.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File loading
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open Pokémon dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        load_into(state, &path);
    }
}

/// Load `path` into `state`, reporting failures in the status line.
pub fn load_into(state: &mut AppState, path: &Path) {
    state.loading = true;
    match loader::load_file(path) {
        Ok(loaded) => state.set_dataset(loaded),
        Err(e) => {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
            state.loading = false;
        }
    }
}
