/// Data layer: core types, loading, aggregation and interaction state.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse rows → normalize → RecordSet (+ ParseWarnings)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ RecordSet  │  Vec<Record>, sorted types/generations, name index
///   └───────────┘
///        │                         │
///        ▼                         ▼
///   ┌───────────┐            ┌──────────┐
///   │ aggregate  │ counts,    │  filter   │ search / highlight / type
///   └───────────┘ stacks,    └──────────┘ filters → per-record Decision
///                 histograms, extents
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
