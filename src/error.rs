use std::path::PathBuf;

use thiserror::Error;

/// Typed failures of the selection pipeline.
///
/// I/O and low-level parse failures in the loaders are reported through
/// `anyhow` with context; this enum covers the conditions a caller may want
/// to match on.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// A required configuration value is missing, unparsable, or inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// A climate zone class name did not resolve to exactly one grid code.
    #[error("climate class '{class}' matched {matches} grid codes, expected exactly one")]
    ZoneLookup { class: String, matches: usize },

    /// The configured continent name matched no polygons in the world layer.
    /// Without this check a typo'd name would silently empty the whole
    /// pipeline downstream.
    #[error("continent '{0}' matched no polygons in the world boundary layer")]
    UnknownContinent(String),

    /// A reference layer is not in the canonical EPSG:4326 system.
    #[error("layer '{path}' is not in EPSG:4326: {detail}")]
    CrsMismatch { path: PathBuf, detail: String },
}
