//! Selection pipeline for global conflict-event datasets.
//!
//! Filters an in-memory conflict-event extract down to the events matching
//! configured property criteria and a year range, then clips the survivors
//! to a continent and to a set of Köppen–Geiger climate zones. See
//! [`select::select`] for the one-shot entry point.

pub mod config;
pub mod data;
pub mod error;
pub mod plot;
pub mod select;

pub use config::SelectionConfig;
pub use data::model::{BoundaryLayer, ClimateLayer, ConflictDataset, ConflictEvent};
pub use error::SelectionError;
pub use select::{select, select_with_layers};
