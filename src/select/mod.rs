//! The selection pipeline: four filters applied in fixed order.
//!
//! 1. [`properties`] – casualty / violence-type / country criteria
//! 2. [`period`] – inclusive year range
//! 3. [`continent`] – spatial clip against the configured continent
//! 4. [`climate`] – spatial clip against the configured climate zones
//!
//! Row-wise predicates run first so the expensive spatial clips see the
//! smallest possible row count. Every stage consumes its input dataset and
//! returns a new one; there is no shared mutable state.

pub mod climate;
pub mod continent;
pub mod period;
pub mod properties;

use anyhow::Result;
use log::info;

use crate::config::SelectionConfig;
use crate::data::loader;
use crate::data::model::{BoundaryLayer, ClimateLayer, CodeClassRow, ConflictDataset};
use crate::error::SelectionError;

/// Run the full pipeline over in-memory reference layers.
///
/// This is the pure core: no file access, fully deterministic. Returns the
/// selected events together with the continent polygon subset (the latter is
/// only needed for optional plotting).
pub fn select_with_layers(
    dataset: ConflictDataset,
    config: &SelectionConfig,
    world: &BoundaryLayer,
    climate_layer: &ClimateLayer,
    code2class: &[CodeClassRow],
) -> Result<(ConflictDataset, BoundaryLayer), SelectionError> {
    let dataset = properties::filter_properties(dataset, &config.conflict);
    let dataset = period::filter_period(dataset, config.settings.y_start, config.settings.y_end);

    let (dataset, continent_layer) =
        continent::clip_to_continent(dataset, world, &config.settings.continent)?;

    let codes = climate::resolve_zone_codes(&config.zone_classes(), code2class)?;
    let dataset = climate::clip_to_zones(dataset, climate_layer, &codes);

    Ok((dataset, continent_layer))
}

/// Run the full pipeline, reading the reference layers named by the config.
///
/// Reference files are read once per invocation; nothing is cached across
/// calls and nothing is written.
pub fn select(
    dataset: ConflictDataset,
    config: &SelectionConfig,
) -> Result<(ConflictDataset, BoundaryLayer)> {
    config.validate()?;

    info!("loading reference layers");
    let world = loader::load_boundaries(&config.world_path())?;
    let climate_layer = loader::load_climate_layer(&config.climate_shp_path())?;
    let code2class = loader::load_code2class(&config.code2class_path())?;

    let result = select_with_layers(dataset, config, &world, &climate_layer, &code2class)?;
    info!("{} events selected", result.0.len());
    Ok(result)
}
