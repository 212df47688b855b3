/// Data layer: core types and file loading.
///
/// Architecture:
/// ```text
///  events.csv / .geojson        world.shp   climate.shp   code2class.txt
///        │                          │            │             │
///        ▼                          ▼            ▼             ▼
///   ┌──────────┐              ┌───────────────────────────────────┐
///   │  loader   │              │  loader (shapefile + dbf, TSV)   │
///   └──────────┘              └───────────────────────────────────┘
///        │                          │            │             │
///        ▼                          ▼            ▼             ▼
///  ConflictDataset          BoundaryLayer  ClimateLayer  Vec<CodeClassRow>
/// ```
///
/// The selection stages in [`crate::select`] consume these types; nothing in
/// this module filters anything.

pub mod loader;
pub mod model;
