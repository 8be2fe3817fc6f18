use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use pokedex_viz::data::model::Stat;
use pokedex_viz::state::AppState;

// ---------------------------------------------------------------------------
// Record table (visible records only)
// ---------------------------------------------------------------------------

const ROW_HEIGHT: f32 = 18.0;

pub fn record_table(ui: &mut Ui, state: &AppState) {
    let records = state.records();
    let visible = &state.visible_indices;

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(120.0))
        .columns(Column::auto(), 2)
        .columns(Column::auto().at_least(48.0), Stat::ALL.len() + 2)
        .column(Column::remainder())
        .header(20.0, |mut header| {
            let titles = ["Name", "Type 1", "Type 2", "Total"]
                .into_iter()
                .chain(Stat::ALL.iter().map(|s| s.label()))
                .chain(["Gen", "Legendary"]);
            for title in titles {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, visible.len(), |mut row| {
                let idx = visible[row.index()];
                let rec = &records[idx];
                let emphasized = state.decision(idx).emphasized;

                row.col(|ui| {
                    let name = RichText::new(&rec.name);
                    ui.label(if emphasized { name.strong() } else { name });
                });
                row.col(|ui| {
                    ui.label(RichText::new(&rec.type1).color(state.palette.color_for(&rec.type1)));
                });
                row.col(|ui| {
                    ui.label(rec.type2_label());
                });
                row.col(|ui| {
                    ui.label(rec.total.to_string());
                });
                for stat in Stat::ALL {
                    row.col(|ui| {
                        ui.label(rec.stat(stat).to_string());
                    });
                }
                row.col(|ui| {
                    ui.label(rec.generation.to_string());
                });
                row.col(|ui| {
                    ui.label(if rec.legendary { "★" } else { "" });
                });
            });
        });
}
