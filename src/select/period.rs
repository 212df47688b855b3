use log::info;

use crate::data::model::ConflictDataset;

// ---------------------------------------------------------------------------
// Stage 2: period filter
// ---------------------------------------------------------------------------

/// Keep events whose `year` falls in `[y_start, y_end]`, both ends inclusive.
pub fn filter_period(dataset: ConflictDataset, y_start: i32, y_end: i32) -> ConflictDataset {
    info!("focussing on period between {y_start} and {y_end}");
    dataset.retain_events(|ev| ev.year >= y_start && ev.year <= y_end)
}
