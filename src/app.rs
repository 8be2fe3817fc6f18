use eframe::egui;

use pokedex_viz::state::{AppState, ChartView};

use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PokedexApp {
    pub state: AppState,
}

impl PokedexApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for PokedexApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + view tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: search, filters, selectors ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: selected chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a dataset to explore  (File → Open…)");
                });
                return;
            }
            match self.state.view {
                ChartView::StackedBars => plot::stacked_bar_chart(ui, &self.state),
                ChartView::Histogram => plot::total_histogram(ui, &self.state),
                ChartView::Radar => plot::radar_chart(ui, &self.state),
                ChartView::ParallelCoordinates => plot::parallel_coordinates(ui, &self.state),
                ChartView::Table => table::record_table(ui, &self.state),
            }
        });
    }
}
