use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::model::{Record, Stat};

// ---------------------------------------------------------------------------
// Type × generation counts (stacked bar chart input)
// ---------------------------------------------------------------------------

/// Primary-type counts per generation.
///
/// Only `type1` is counted; `types` still lists every primary and secondary
/// type so legends and colour scales cover the whole dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeGenerationCounts {
    /// generation → type1 → count
    pub counts: BTreeMap<u32, BTreeMap<String, usize>>,
    /// Distinct `type1` ∪ `type2`, sorted lexicographically.
    pub types: Vec<String>,
    /// Distinct generations, ascending.
    pub generations: Vec<u32>,
}

impl TypeGenerationCounts {
    pub fn get(&self, generation: u32, type_name: &str) -> usize {
        self.counts
            .get(&generation)
            .and_then(|by_type| by_type.get(type_name))
            .copied()
            .unwrap_or(0)
    }

    /// Number of records in `generation`.
    pub fn generation_total(&self, generation: u32) -> usize {
        self.counts
            .get(&generation)
            .map(|by_type| by_type.values().sum())
            .unwrap_or(0)
    }
}

pub fn count_by_generation_and_type<'a, I>(records: I) -> TypeGenerationCounts
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut counts: BTreeMap<u32, BTreeMap<String, usize>> = BTreeMap::new();
    let mut types: BTreeSet<String> = BTreeSet::new();

    for rec in records {
        *counts
            .entry(rec.generation)
            .or_default()
            .entry(rec.type1.clone())
            .or_default() += 1;

        types.insert(rec.type1.clone());
        if let Some(t2) = &rec.type2 {
            types.insert(t2.clone());
        }
    }

    let generations = counts.keys().copied().collect();
    TypeGenerationCounts {
        counts,
        types: types.into_iter().collect(),
        generations,
    }
}

// ---------------------------------------------------------------------------
// Stack series
// ---------------------------------------------------------------------------

/// One type's band within a generation's bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackSegment {
    pub type_name: String,
    pub count: usize,
    /// Sum of the counts of every type before this one in the stack order.
    pub baseline: usize,
    /// `baseline + count`.
    pub top: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStack {
    pub generation: u32,
    /// One segment per entry of the stack order, zero counts included.
    pub segments: Vec<StackSegment>,
}

impl GenerationStack {
    /// Height of the whole bar.
    pub fn total(&self) -> usize {
        self.segments.last().map(|s| s.top).unwrap_or(0)
    }

    pub fn segment(&self, type_name: &str) -> Option<&StackSegment> {
        self.segments.iter().find(|s| s.type_name == type_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackSeries {
    pub type_order: Vec<String>,
    pub generations: Vec<GenerationStack>,
}

impl StackSeries {
    /// Upper bound for the count axis.
    pub fn max_top(&self) -> usize {
        self.generations
            .iter()
            .map(GenerationStack::total)
            .max()
            .unwrap_or(0)
    }
}

/// Lay out `counts` as stacked bands, one bar per generation in
/// `generation_order`, bands in `type_order`.
///
/// A single-entry `type_order` is the legend drill-down: every bar becomes
/// `[0, count]` for that type.
pub fn build_stack_series(
    counts: &TypeGenerationCounts,
    type_order: &[String],
    generation_order: &[u32],
) -> StackSeries {
    let generations = generation_order
        .iter()
        .map(|&generation| {
            let mut running = 0;
            let segments = type_order
                .iter()
                .map(|type_name| {
                    let count = counts.get(generation, type_name);
                    let segment = StackSegment {
                        type_name: type_name.clone(),
                        count,
                        baseline: running,
                        top: running + count,
                    };
                    running += count;
                    segment
                })
                .collect();
            GenerationStack {
                generation,
                segments,
            }
        })
        .collect();

    StackSeries {
        type_order: type_order.to_vec(),
        generations,
    }
}

// ---------------------------------------------------------------------------
// Total-stat histogram
// ---------------------------------------------------------------------------

/// Bin layout for [`build_total_histogram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramSpec {
    pub bin_width: u32,
    pub floor: u32,
}

impl Default for HistogramSpec {
    fn default() -> Self {
        Self {
            bin_width: 100,
            floor: 200,
        }
    }
}

/// Half-open bin `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: u32,
    pub end: u32,
    pub count: usize,
}

/// Histogram of `total` for one generation.
///
/// Bin edges start at `spec.floor` and run up to the smallest multiple of the
/// bin width that is at least the generation's largest total plus one bin
/// width, so the last bin is usually empty. Totals below the floor are
/// counted in the first bin. An unknown generation yields no bins.
pub fn build_total_histogram<'a, I>(
    records: I,
    generation: u32,
    spec: HistogramSpec,
) -> Vec<HistogramBin>
where
    I: IntoIterator<Item = &'a Record>,
{
    let totals: Vec<u32> = records
        .into_iter()
        .filter(|r| r.generation == generation)
        .map(|r| r.total)
        .collect();

    let Some(&max_total) = totals.iter().max() else {
        return Vec::new();
    };

    let width = spec.bin_width.max(1);
    let bin_of = |total: u32| (total.saturating_sub(spec.floor) / width) as usize;
    let step = u64::from(width);
    let last_edge = (u64::from(max_total) + step).div_ceil(step) * step;
    let span = last_edge.saturating_sub(u64::from(spec.floor));
    let n_bins = (span.div_ceil(step) as usize).max(bin_of(max_total) + 1);

    let mut bins: Vec<HistogramBin> = (0..n_bins)
        .map(|i| {
            let start = spec.floor.saturating_add(width.saturating_mul(i as u32));
            HistogramBin {
                start,
                end: start.saturating_add(width),
                count: 0,
            }
        })
        .collect();

    for total in totals {
        bins[bin_of(total)].count += 1;
    }
    bins
}

// ---------------------------------------------------------------------------
// Per-stat extents (axis scaling)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extent {
    pub min: u32,
    pub max: u32,
}

impl Extent {
    /// Position of `value` on this axis in `[0, 1]`. Degenerate axes put
    /// everything in the middle.
    pub fn normalize(&self, value: u32) -> f64 {
        if self.max <= self.min {
            return 0.5;
        }
        let v = value.clamp(self.min, self.max);
        (v - self.min) as f64 / (self.max - self.min) as f64
    }
}

/// (min, max) of each stat in `stats` over `records`; `(0, 0)` when empty.
pub fn stat_extents<'a, I>(records: I, stats: &[Stat]) -> BTreeMap<Stat, Extent>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut extents: BTreeMap<Stat, Option<Extent>> =
        stats.iter().map(|&s| (s, None)).collect();

    for rec in records {
        for (&stat, slot) in extents.iter_mut() {
            let v = rec.stat(stat);
            let next = match *slot {
                Some(e) => Extent {
                    min: e.min.min(v),
                    max: e.max.max(v),
                },
                None => Extent { min: v, max: v },
            };
            *slot = Some(next);
        }
    }

    extents
        .into_iter()
        .map(|(stat, e)| (stat, e.unwrap_or_default()))
        .collect()
}

// ---------------------------------------------------------------------------
// Simple type counts and type1 × type2 cross-tab
// ---------------------------------------------------------------------------

/// Primary-type counts across all generations, sorted by type.
pub fn count_by_type<'a, I>(records: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for rec in records {
        *counts.entry(rec.type1.clone()).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// Counts per (type1, type2) pair. Single-typed records are keyed with `None`.
pub fn type_cross_tab<'a, I>(records: I) -> BTreeMap<(String, Option<String>), usize>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut tab = BTreeMap::new();
    for rec in records {
        *tab.entry((rec.type1.clone(), rec.type2.clone())).or_default() += 1;
    }
    tab
}

// ---------------------------------------------------------------------------
// Radar comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadarSeries {
    pub name: String,
    pub type1: String,
    /// One value per entry of [`Stat::ALL`].
    pub values: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadarComparison {
    pub stats: Vec<Stat>,
    pub series: Vec<RadarSeries>,
    /// Shared radial maximum: largest plotted value plus padding.
    pub scale_max: u32,
}

/// Stat profiles of one or two records on a shared radial scale.
pub fn radar_comparison(
    primary: &Record,
    secondary: Option<&Record>,
    padding: u32,
) -> RadarComparison {
    let series: Vec<RadarSeries> = std::iter::once(primary)
        .chain(secondary)
        .map(|rec| RadarSeries {
            name: rec.name.clone(),
            type1: rec.type1.clone(),
            values: Stat::ALL.iter().map(|&s| rec.stat(s)).collect(),
        })
        .collect();

    let largest = series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .max()
        .unwrap_or(0);

    RadarComparison {
        stats: Stat::ALL.to_vec(),
        series,
        scale_max: largest.saturating_add(padding),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::StatLine;
    use pretty_assertions::assert_eq;

    fn rec(name: &str, type1: &str, type2: Option<&str>, generation: u32, total: u32) -> Record {
        Record {
            name: name.to_string(),
            type1: type1.to_string(),
            type2: type2.map(str::to_string),
            stats: StatLine::default(),
            total,
            generation,
            legendary: false,
        }
    }

    fn with_stats(mut r: Record, values: [u32; 6]) -> Record {
        for (stat, v) in Stat::ALL.iter().zip(values) {
            r.stats.set(*stat, v);
        }
        r
    }

    fn sample() -> Vec<Record> {
        vec![
            rec("Bulbasaur", "Grass", Some("Poison"), 1, 318),
            rec("Charmander", "Fire", None, 1, 309),
            rec("Charizard", "Fire", Some("Flying"), 1, 534),
            rec("Chikorita", "Grass", None, 2, 318),
            rec("Lugia", "Psychic", Some("Flying"), 2, 680),
        ]
    }

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn counts_use_primary_type_only() {
        let counts = count_by_generation_and_type(&sample());

        assert_eq!(counts.get(1, "Fire"), 2);
        assert_eq!(counts.get(1, "Grass"), 1);
        assert_eq!(counts.get(1, "Poison"), 0);
        assert_eq!(counts.get(2, "Psychic"), 1);
        assert_eq!(counts.get(9, "Fire"), 0);
        assert_eq!(
            counts.types,
            strings(&["Fire", "Flying", "Grass", "Poison", "Psychic"])
        );
        assert_eq!(counts.generations, vec![1, 2]);
    }

    #[test]
    fn generation_totals_match_record_counts() {
        let records = sample();
        let counts = count_by_generation_and_type(&records);
        for &g in &counts.generations {
            let expected = records.iter().filter(|r| r.generation == g).count();
            let summed: usize = counts.types.iter().map(|t| counts.get(g, t)).sum();
            assert_eq!(summed, expected);
            assert_eq!(counts.generation_total(g), expected);
        }
    }

    #[test]
    fn empty_input_gives_empty_counts() {
        let counts = count_by_generation_and_type(&Vec::<Record>::new());
        assert_eq!(counts, TypeGenerationCounts::default());
        let stack = build_stack_series(&counts, &counts.types, &counts.generations);
        assert_eq!(stack.max_top(), 0);
    }

    #[test]
    fn stack_offsets_accumulate_in_type_order() {
        let counts = count_by_generation_and_type(&sample());
        let stack = build_stack_series(&counts, &counts.types, &counts.generations);

        for gen_stack in &stack.generations {
            let mut prev_top = 0;
            for seg in &gen_stack.segments {
                assert_eq!(seg.baseline, prev_top);
                assert_eq!(seg.top, seg.baseline + seg.count);
                prev_top = seg.top;
            }
            assert_eq!(
                gen_stack.total(),
                counts.generation_total(gen_stack.generation)
            );
        }
        assert_eq!(stack.max_top(), 3);
    }

    #[test]
    fn single_type_stack_degenerates() {
        let counts = count_by_generation_and_type(&sample());
        let stack = build_stack_series(&counts, &strings(&["Fire"]), &[1, 2]);

        let gen1 = &stack.generations[0].segments[0];
        assert_eq!((gen1.baseline, gen1.top), (0, 2));
        let gen2 = &stack.generations[1].segments[0];
        assert_eq!((gen2.baseline, gen2.top), (0, 0));
    }

    #[test]
    fn histogram_bins_cover_generation() {
        let mut records = sample();
        records.push(rec("Pidgey", "Normal", Some("Flying"), 1, 251));
        records.push(rec("Caterpie", "Bug", None, 1, 195));

        let bins = build_total_histogram(&records, 1, HistogramSpec::default());

        let starts: Vec<u32> = bins.iter().map(|b| b.start).collect();
        // Max 534: edges run to 700, the first multiple of 100 at or above 634.
        assert_eq!(starts, vec![200, 300, 400, 500, 600]);
        assert_eq!(bins[4].end, 700);
        // Caterpie (195) is clamped into the first bin.
        let counts: Vec<usize> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 2, 0, 1, 0]);

        let in_gen = records.iter().filter(|r| r.generation == 1).count();
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), in_gen);
    }

    #[test]
    fn histogram_edge_cases() {
        let records = sample();
        assert!(build_total_histogram(&records, 7, HistogramSpec::default()).is_empty());
        assert!(build_total_histogram(&Vec::<Record>::new(), 1, HistogramSpec::default()).is_empty());

        // Max total exactly on a boundary: 300 + 100 is already a multiple.
        let on_edge = vec![rec("Edge", "Normal", None, 3, 300)];
        let bins = build_total_histogram(&on_edge, 3, HistogramSpec::default());
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[1], HistogramBin { start: 300, end: 400, count: 1 });

        let mid_bin = vec![rec("Mid", "Normal", None, 3, 350)];
        let bins = build_total_histogram(&mid_bin, 3, HistogramSpec::default());
        assert_eq!(bins.iter().map(|b| b.start).collect::<Vec<_>>(), vec![200, 300, 400]);
        assert_eq!(bins.last().map(|b| b.end), Some(500));
        assert_eq!(bins[1].count, 1);

        // Everything below the floor still gets one bin to land in.
        let low = vec![rec("Low", "Bug", None, 3, 50)];
        let bins = build_total_histogram(&low, 3, HistogramSpec::default());
        assert_eq!(bins, vec![HistogramBin { start: 200, end: 300, count: 1 }]);

        let custom = build_total_histogram(
            &records,
            2,
            HistogramSpec { bin_width: 250, floor: 0 },
        );
        assert_eq!(
            custom.iter().map(|b| b.start).collect::<Vec<_>>(),
            vec![0, 250, 500, 750]
        );
        assert_eq!(custom.iter().map(|b| b.count).collect::<Vec<_>>(), vec![0, 1, 1, 0]);
    }

    #[test]
    fn histogram_edges_saturate_near_u32_max() {
        let huge = vec![rec("Huge", "Dragon", None, 1, u32::MAX)];
        let spec = HistogramSpec {
            bin_width: 100,
            floor: u32::MAX - 50,
        };
        let bins = build_total_histogram(&huge, 1, spec);

        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].start, u32::MAX - 50);
        assert_eq!(bins.last().map(|b| b.end), Some(u32::MAX));
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 1);
    }

    #[test]
    fn extents_empty_singleton_and_many() {
        let empty = stat_extents(&Vec::<Record>::new(), &Stat::ALL);
        assert_eq!(empty.len(), 6);
        assert!(empty.values().all(|e| *e == Extent { min: 0, max: 0 }));

        let mew = with_stats(rec("Mew", "Psychic", None, 1, 600), [100; 6]);
        let single = stat_extents(std::iter::once(&mew), &[Stat::Hp, Stat::Speed]);
        assert_eq!(single.len(), 2);
        assert_eq!(single[&Stat::Hp], Extent { min: 100, max: 100 });

        let records = vec![
            with_stats(rec("A", "Fire", None, 1, 0), [10, 20, 30, 40, 50, 60]),
            with_stats(rec("B", "Fire", None, 1, 0), [5, 25, 30, 45, 10, 0]),
        ];
        let extents = stat_extents(&records, &Stat::ALL);
        assert_eq!(extents[&Stat::Hp], Extent { min: 5, max: 10 });
        assert_eq!(extents[&Stat::Speed], Extent { min: 0, max: 60 });
    }

    #[test]
    fn extent_normalize() {
        let e = Extent { min: 20, max: 120 };
        assert_eq!(e.normalize(20), 0.0);
        assert_eq!(e.normalize(70), 0.5);
        assert_eq!(e.normalize(500), 1.0);
        assert_eq!(Extent { min: 5, max: 5 }.normalize(5), 0.5);
    }

    #[test]
    fn simple_type_counts_and_cross_tab() {
        let records = sample();
        assert_eq!(
            count_by_type(&records),
            vec![
                ("Fire".to_string(), 2),
                ("Grass".to_string(), 2),
                ("Psychic".to_string(), 1)
            ]
        );

        let tab = type_cross_tab(&records);
        assert_eq!(tab[&("Fire".to_string(), None)], 1);
        assert_eq!(tab[&("Fire".to_string(), Some("Flying".to_string()))], 1);
        assert_eq!(tab.values().sum::<usize>(), records.len());
    }

    #[test]
    fn radar_scale_covers_both_series() {
        let a = with_stats(rec("A", "Fire", None, 1, 0), [39, 52, 43, 60, 50, 65]);
        let b = with_stats(rec("B", "Water", None, 1, 0), [44, 48, 65, 50, 64, 43]);

        let single = radar_comparison(&a, None, 5);
        assert_eq!(single.series.len(), 1);
        assert_eq!(single.scale_max, 70);

        let dual = radar_comparison(&a, Some(&b), 5);
        assert_eq!(dual.series[1].values, vec![44, 48, 65, 50, 64, 43]);
        assert_eq!(dual.scale_max, 70);
        assert_eq!(dual.stats, Stat::ALL.to_vec());
    }

    #[test]
    fn radar_scale_saturates() {
        let maxed = with_stats(rec("Max", "Steel", None, 1, 0), [u32::MAX; 6]);
        assert_eq!(radar_comparison(&maxed, None, 5).scale_max, u32::MAX);
    }
}
