use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Polygon, Text,
};

use pokedex_viz::color::radar_colors;
use pokedex_viz::data::model::Stat;
use pokedex_viz::state::AppState;

/// Only whole-number grid marks get a label.
fn integer_mark(mark: &GridMark) -> Option<i64> {
    (mark.value.fract() == 0.0).then_some(mark.value as i64)
}

fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

// ---------------------------------------------------------------------------
// Stacked bars: type distribution per generation
// ---------------------------------------------------------------------------

pub fn stacked_bar_chart(ui: &mut Ui, state: &AppState) {
    let stack = &state.stack;

    let charts: Vec<BarChart> = stack
        .type_order
        .iter()
        .enumerate()
        .map(|(i, type_name)| {
            let bars: Vec<Bar> = stack
                .generations
                .iter()
                .map(|g| {
                    let seg = &g.segments[i];
                    Bar::new(g.generation as f64, seg.count as f64)
                        .base_offset(seg.baseline as f64)
                        .width(0.8)
                        .name(format!("Gen {} · {type_name}", g.generation))
                })
                .collect();
            BarChart::new(bars)
                .color(state.palette.color_for(type_name))
                .name(type_name)
        })
        .collect();

    Plot::new("stacked_bars")
        .legend(Legend::default())
        .x_axis_label("Generation")
        .y_axis_label("Count")
        .x_axis_formatter(|mark, _range| match integer_mark(&mark) {
            Some(g) if g > 0 => format!("Gen {g}"),
            _ => String::new(),
        })
        .include_y(0.0)
        .include_y(stack.max_top() as f64)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Histogram of totals for the selected generation
// ---------------------------------------------------------------------------

pub fn total_histogram(ui: &mut Ui, state: &AppState) {
    let width = state.config.histogram_bin_width as f64;
    let bars: Vec<Bar> = state
        .histogram
        .iter()
        .map(|bin| {
            Bar::new(bin.start as f64 + width / 2.0, bin.count as f64)
                .width(width * 0.95)
                .name(format!("[{}, {})", bin.start, bin.end))
        })
        .collect();

    let title = match state.histogram_generation {
        Some(g) => format!("Generation {g}"),
        None => "No generation".to_string(),
    };
    ui.heading(title);
    if bars.is_empty() {
        ui.label("No records in this generation.");
    }

    Plot::new("total_histogram")
        .x_axis_label("Total")
        .y_axis_label("Count")
        .include_y(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::from_rgb(0x63, 0x90, 0xF0)));
        });
}

// ---------------------------------------------------------------------------
// Radar: one or two stat profiles
// ---------------------------------------------------------------------------

/// Unit-circle position of axis `i` of `n`, first axis at 12 o'clock,
/// clockwise.
fn radar_point(i: usize, n: usize, radius: f64) -> [f64; 2] {
    let angle = TAU * i as f64 / n as f64 - FRAC_PI_2;
    [radius * angle.cos(), -radius * angle.sin()]
}

pub fn radar_chart(ui: &mut Ui, state: &AppState) {
    let Some(radar) = state.radar() else {
        ui.label("Select a Pokémon to compare.");
        return;
    };
    let n = radar.stats.len();
    let scale = radar.scale_max.max(1) as f64;

    let primary_type = radar.series[0].type1.as_str();
    let secondary_type = radar.series.get(1).map_or(primary_type, |s| s.type1.as_str());
    let (first, second) = radar_colors(primary_type, secondary_type);

    Plot::new("radar")
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes([false, false])
        .show_grid([false, false])
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .include_x(-1.3)
        .include_x(1.3)
        .include_y(-1.3)
        .include_y(1.3)
        .show(ui, |plot_ui| {
            for ring in [0.25, 0.5, 0.75, 1.0] {
                let points: PlotPoints = (0..=n).map(|i| radar_point(i % n, n, ring)).collect();
                plot_ui.line(Line::new(points).color(Color32::from_gray(90)).width(0.5));
            }
            for (i, stat) in radar.stats.iter().enumerate() {
                let spoke: PlotPoints = vec![[0.0, 0.0], radar_point(i, n, 1.0)].into();
                plot_ui.line(Line::new(spoke).color(Color32::from_gray(120)));

                let [x, y] = radar_point(i, n, 1.15);
                plot_ui.text(Text::new(PlotPoint::new(x, y), RichText::new(stat.label()).strong()));
            }

            for (series, color) in radar.series.iter().zip([first, second]) {
                let points: PlotPoints = series
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| radar_point(i, n, v as f64 / scale))
                    .collect();
                plot_ui.polygon(
                    Polygon::new(points)
                        .fill_color(with_alpha(color, 128))
                        .stroke(Stroke::new(2.0, color))
                        .name(&series.name),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Parallel coordinates with search / filter decisions
// ---------------------------------------------------------------------------

/// Record whose polyline passes closest to `(x, y)` at the nearest axis.
fn nearest_row(rows: &[(usize, Vec<f64>)], x: f64, y: f64, tolerance: f64) -> Option<usize> {
    let axis = x.round();
    if (x - axis).abs() > 0.25 || axis < 0.0 {
        return None;
    }
    let axis = axis as usize;
    rows.iter()
        .filter_map(|(idx, values)| values.get(axis).map(|v| (*idx, (v - y).abs())))
        .filter(|(_, dist)| *dist <= tolerance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(idx, _)| idx)
}

pub fn parallel_coordinates(ui: &mut Ui, state: &AppState) {
    let records = state.records();
    let stats = Stat::ALL;

    // Normalized polylines of the visible records.
    let rows: Vec<(usize, Vec<f64>)> = state
        .visible_indices
        .iter()
        .map(|&idx| {
            let rec = &records[idx];
            let values = stats
                .iter()
                .map(|s| {
                    let extent = state.extents.get(s).copied().unwrap_or_default();
                    extent.normalize(rec.stat(*s))
                })
                .collect();
            (idx, values)
        })
        .collect();

    if rows.is_empty() {
        ui.label("No Pokémon match the current search and filters.");
    }

    let response = Plot::new("parallel_coordinates")
        .show_axes([true, false])
        .show_grid([true, false])
        .x_axis_formatter(|mark, _range| match integer_mark(&mark) {
            Some(i) if (0..Stat::ALL.len() as i64).contains(&i) => {
                Stat::ALL[i as usize].label().to_string()
            }
            _ => String::new(),
        })
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .include_x(-0.3)
        .include_x(stats.len() as f64 - 0.7)
        .include_y(-0.1)
        .include_y(1.1)
        .show(ui, |plot_ui| {
            let hovered = plot_ui.pointer_coordinate().and_then(|p| {
                let targets: Vec<(usize, Vec<f64>)> = rows
                    .iter()
                    .filter(|(idx, _)| state.interaction.is_hover_target(&records[*idx]))
                    .cloned()
                    .collect();
                nearest_row(&targets, p.x, p.y, 0.03)
            });

            // Emphasized and hovered lines are drawn last so they sit on top.
            let mut ordered: Vec<&(usize, Vec<f64>)> = rows.iter().collect();
            ordered.sort_by_key(|(idx, _)| {
                state.decision(*idx).emphasized || hovered == Some(*idx)
            });

            for (idx, values) in ordered {
                let rec = &records[*idx];
                let base = state.palette.color_for(&rec.type1);
                let (width, alpha) = if state.decision(*idx).emphasized {
                    (5.0, 255)
                } else if hovered == Some(*idx) {
                    (3.0, 255)
                } else {
                    (1.0, 128)
                };
                let points: PlotPoints = values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| [i as f64, v])
                    .collect();
                plot_ui.line(Line::new(points).color(with_alpha(base, alpha)).width(width));
            }

            for (i, stat) in stats.iter().enumerate() {
                let extent = state.extents.get(stat).copied().unwrap_or_default();
                let x = i as f64;
                plot_ui.text(Text::new(PlotPoint::new(x, 1.05), extent.max.to_string()));
                plot_ui.text(Text::new(PlotPoint::new(x, -0.05), extent.min.to_string()));
            }

            hovered
        });

    if let Some(idx) = response.inner {
        let rec = &records[idx];
        response.response.on_hover_ui(|ui: &mut Ui| {
            ui.strong(&rec.name);
            ui.label(format!("Type 1: {}", rec.type1));
            ui.label(format!("Type 2: {}", rec.type2_label()));
        });
    }
}
