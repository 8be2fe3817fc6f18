use std::collections::BTreeMap;

use crate::color::TypePalette;
use crate::config::ViewerConfig;
use crate::data::aggregate::{
    build_stack_series, build_total_histogram, count_by_generation_and_type, radar_comparison,
    stat_extents, Extent, HistogramBin, RadarComparison, StackSeries, TypeGenerationCounts,
};
use crate::data::filter::{Decision, InteractionState};
use crate::data::loader::LoadedDataset;
use crate::data::model::{Record, RecordSet, Stat};

// ---------------------------------------------------------------------------
// Chart views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartView {
    #[default]
    StackedBars,
    Histogram,
    Radar,
    ParallelCoordinates,
    Table,
}

impl ChartView {
    pub const ALL: [ChartView; 5] = [
        ChartView::StackedBars,
        ChartView::Histogram,
        ChartView::Radar,
        ChartView::ParallelCoordinates,
        ChartView::Table,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartView::StackedBars => "Types per generation",
            ChartView::Histogram => "Total histogram",
            ChartView::Radar => "Stat radar",
            ChartView::ParallelCoordinates => "Parallel coordinates",
            ChartView::Table => "Table",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// One chart session, independent of rendering. Owns the dataset, the
/// interaction state and every derived view model.
pub struct AppState {
    pub config: ViewerConfig,

    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<RecordSet>,

    /// Search / highlight / type filters.
    pub interaction: InteractionState,

    /// Contents of the search text box.
    pub search_text: String,

    /// Legend drill-down: stack only this type.
    pub stack_type: Option<String>,

    /// Generation shown by the histogram.
    pub histogram_generation: Option<u32>,

    /// Radar selections, by exact name.
    pub radar_primary: Option<String>,
    pub radar_secondary: Option<String>,

    pub view: ChartView,

    // -- derived, rebuilt by `rebuild_*` --
    pub palette: TypePalette,
    pub counts: TypeGenerationCounts,
    pub stack: StackSeries,
    pub histogram: Vec<HistogramBin>,
    pub extents: BTreeMap<Stat, Extent>,
    /// One decision per record, same order as `dataset.records`.
    pub decisions: Vec<Decision>,
    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl AppState {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            interaction: InteractionState::with_suggestion_limit(config.suggestion_limit),
            config,
            dataset: None,
            search_text: String::new(),
            stack_type: None,
            histogram_generation: None,
            radar_primary: None,
            radar_secondary: None,
            view: ChartView::default(),
            palette: TypePalette::default(),
            counts: TypeGenerationCounts::default(),
            stack: StackSeries::default(),
            histogram: Vec::new(),
            extents: BTreeMap::new(),
            decisions: Vec::new(),
            visible_indices: Vec::new(),
            status_message: None,
            loading: false,
        }
    }

    /// Ingest a newly loaded dataset and reset every selection.
    pub fn set_dataset(&mut self, loaded: LoadedDataset) {
        let dataset = loaded.records;

        self.interaction = InteractionState::with_suggestion_limit(self.config.suggestion_limit);
        self.search_text.clear();
        self.stack_type = None;
        self.histogram_generation = dataset.generations.first().copied();

        // Radar starts on the first two records, like the dropdown defaults.
        self.radar_primary = dataset.records.first().map(|r| r.name.clone());
        self.radar_secondary = dataset.records.get(1).map(|r| r.name.clone());

        self.palette = TypePalette::new(&dataset.types);
        self.counts = count_by_generation_and_type(&dataset.records);
        self.dataset = Some(dataset);

        self.rebuild_stack();
        self.rebuild_histogram();
        self.refilter();

        self.status_message = (!loaded.warnings.is_empty())
            .then(|| format!("{} cell(s) coerced to defaults", loaded.warnings.len()));
        self.loading = false;
    }

    pub fn records(&self) -> &[Record] {
        self.dataset
            .as_ref()
            .map(|ds| ds.records.as_slice())
            .unwrap_or(&[])
    }

    // -- stacked bars --

    /// Type order currently stacked: the drill-down type alone, or all types.
    pub fn stack_order(&self) -> Vec<String> {
        match &self.stack_type {
            Some(t) => vec![t.clone()],
            None => self.counts.types.clone(),
        }
    }

    pub fn rebuild_stack(&mut self) {
        let order = self.stack_order();
        self.stack = build_stack_series(&self.counts, &order, &self.counts.generations);
    }

    /// Legend click: drill into `type_name`, or back out if it is already
    /// selected.
    pub fn toggle_stack_type(&mut self, type_name: &str) {
        self.stack_type = match &self.stack_type {
            Some(current) if current == type_name => None,
            _ => Some(type_name.to_string()),
        };
        self.rebuild_stack();
    }

    pub fn reset_stack(&mut self) {
        self.stack_type = None;
        self.rebuild_stack();
    }

    // -- histogram --

    pub fn set_histogram_generation(&mut self, generation: u32) {
        self.histogram_generation = Some(generation);
        self.rebuild_histogram();
    }

    pub fn rebuild_histogram(&mut self) {
        self.histogram = match self.histogram_generation {
            Some(generation) => {
                build_total_histogram(self.records(), generation, self.config.histogram_spec())
            }
            None => Vec::new(),
        };
    }

    // -- interaction --

    /// Recompute decisions, visible indices and (optionally) extents after
    /// any interaction change.
    pub fn refilter(&mut self) {
        let records = self.records();
        let decisions = self.interaction.decide_all(records);
        let visible_indices: Vec<usize> = decisions
            .iter()
            .enumerate()
            .filter(|(_, d)| d.visible)
            .map(|(i, _)| i)
            .collect();

        let extents = if self.config.extents_follow_filter {
            stat_extents(visible_indices.iter().map(|&i| &records[i]), &Stat::ALL)
        } else {
            stat_extents(records, &Stat::ALL)
        };

        self.decisions = decisions;
        self.visible_indices = visible_indices;
        self.extents = extents;
    }

    pub fn set_search_text(&mut self, text: &str) {
        self.search_text = text.to_string();
        let records = self
            .dataset
            .as_ref()
            .map(|ds| ds.records.as_slice())
            .unwrap_or(&[]);
        self.interaction.set_search_term(text, records);
        self.refilter();
    }

    /// Close the suggestion list; the search and its highlight stay.
    pub fn dismiss_suggestions(&mut self) {
        self.interaction.dismiss_suggestions();
    }

    pub fn select_suggestion(&mut self, name: &str) {
        self.search_text = name.to_string();
        self.interaction.select_suggestion(name);
        self.refilter();
    }

    pub fn clear_search(&mut self) {
        self.search_text.clear();
        self.interaction.clear_search();
        self.refilter();
    }

    pub fn set_type1_filter(&mut self, enabled: bool, value: &str) {
        self.interaction.set_type1_filter(enabled, value);
        self.refilter();
    }

    pub fn set_type2_filter(&mut self, enabled: bool, value: &str) {
        self.interaction.set_type2_filter(enabled, value);
        self.refilter();
    }

    /// Reset button of the parallel-coordinates view.
    pub fn reset_interaction(&mut self) {
        self.search_text.clear();
        self.interaction.reset();
        self.refilter();
    }

    /// Decision for record `idx`; records outside the cache are shown plainly.
    pub fn decision(&self, idx: usize) -> Decision {
        self.decisions.get(idx).copied().unwrap_or(Decision {
            visible: true,
            emphasized: false,
        })
    }

    /// The record the search currently resolves to, if any.
    pub fn highlighted_record(&self) -> Option<&Record> {
        let key = self.interaction.highlighted_name()?;
        self.records().iter().find(|r| r.search_key() == key)
    }

    // -- radar --

    /// Select the first radar record. Returns whether `name` is in the
    /// dataset; an unknown name is kept but draws nothing.
    pub fn set_radar_primary(&mut self, name: &str) -> bool {
        self.radar_primary = Some(name.to_string());
        self.knows_record(name)
    }

    pub fn set_radar_secondary(&mut self, name: &str) -> bool {
        self.radar_secondary = Some(name.to_string());
        self.knows_record(name)
    }

    fn knows_record(&self, name: &str) -> bool {
        let known = self
            .dataset
            .as_ref()
            .is_some_and(|ds| ds.get(name).is_some());
        if !known {
            log::warn!("radar selection '{name}' not in dataset");
        }
        known
    }

    /// Radar model for the current selection. `None` until a primary record
    /// is selected and present in the dataset.
    pub fn radar(&self) -> Option<RadarComparison> {
        let dataset = self.dataset.as_ref()?;
        let primary = self.radar_primary.as_deref().and_then(|n| dataset.get(n))?;
        let secondary = if self.config.dual_radar {
            self.radar_secondary.as_deref().and_then(|n| dataset.get(n))
        } else {
            None
        };
        Some(radar_comparison(primary, secondary, self.config.radar_padding))
    }
}
