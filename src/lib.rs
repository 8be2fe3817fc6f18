//! Pokémon stat explorer core: dataset normalization, chart aggregations and
//! the search/filter state shared by the charts.
//!
//! The egui viewer in `main.rs` is one consumer; everything here is
//! rendering-agnostic apart from the colour types in [`color`].

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod state;

pub use config::ViewerConfig;
pub use data::filter::{Decision, InteractionState};
pub use data::loader::{load_file, LoadedDataset};
pub use data::model::{Record, RecordSet, Stat, StatLine};
pub use error::{DatasetError, ParseWarning};
pub use state::AppState;
