//! Run configuration: which events to keep and which reference files to use.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SelectionError;

/// Parsed selection settings, grouped into the same sections as the
/// configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    pub general: GeneralSection,
    pub settings: SettingsSection,
    #[serde(default)]
    pub conflict: ConflictSection,
    pub climate: ClimateSection,
}

/// Input locations. All other paths in the file are relative to `input_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSection {
    pub input_dir: PathBuf,
    /// World country-boundary shapefile, relative to `input_dir`.
    #[serde(default = "default_world")]
    pub world: PathBuf,
}

fn default_world() -> PathBuf {
    PathBuf::from("naturalearth_lowres.shp")
}

/// Period and continent selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsSection {
    /// First year of the period, inclusive.
    pub y_start: i32,
    /// Last year of the period, inclusive.
    pub y_end: i32,
    pub continent: String,
}

/// Conflict-property criteria. An absent or empty value means "do not filter
/// on this field".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConflictSection {
    /// Keep events with at least this many estimated fatalities.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub min_nr_casualties: Option<i64>,
    /// Keep events with exactly this violence-type code.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub type_of_conflict: Option<i32>,
    /// Keep events from exactly this country.
    #[serde(default)]
    pub country: String,
}

/// Climate classification inputs and the zone subset to keep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClimateSection {
    /// Köppen–Geiger polygon shapefile, relative to `input_dir`.
    pub shp: PathBuf,
    /// Tab-separated code→class lookup table, relative to `input_dir`.
    pub code2class: PathBuf,
    /// Comma-separated climate class names, e.g. `"Tropical,Arid"`.
    pub zones: String,
}

/// Accept an integer, an empty string (meaning "unset"), or nothing at all.
/// Mirrors the convention of leaving a criterion blank in the config file.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr + Deserialize<'de>,
    T::Err: fmt::Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Value(T),
        Text(String),
    }

    match Option::<Raw<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Value(v)) => Ok(Some(v)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("'{s}': {e}"))),
    }
}

impl SelectionConfig {
    /// Load and validate a configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, SelectionError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SelectionError::Config(format!("reading {}: {e}", path.display())))?;
        let config: SelectionConfig = serde_yaml::from_str(&contents)
            .map_err(|e| SelectionError::Config(format!("parsing {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field invariants the type system cannot express.
    pub fn validate(&self) -> Result<(), SelectionError> {
        if self.settings.y_start > self.settings.y_end {
            return Err(SelectionError::Config(format!(
                "y_start ({}) is after y_end ({})",
                self.settings.y_start, self.settings.y_end
            )));
        }
        if self.settings.continent.trim().is_empty() {
            return Err(SelectionError::Config("continent is empty".into()));
        }
        if self.zone_classes().is_empty() {
            return Err(SelectionError::Config(
                "climate.zones names no classes".into(),
            ));
        }
        Ok(())
    }

    /// The configured climate class names, trimmed, empty entries dropped.
    pub fn zone_classes(&self) -> Vec<String> {
        self.climate
            .zones
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn world_path(&self) -> PathBuf {
        self.general.input_dir.join(&self.general.world)
    }

    pub fn climate_shp_path(&self) -> PathBuf {
        self.general.input_dir.join(&self.climate.shp)
    }

    pub fn code2class_path(&self) -> PathBuf {
        self.general.input_dir.join(&self.climate.code2class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> SelectionConfig {
        serde_yaml::from_str(yaml).expect("config should parse")
    }

    const BASE: &str = r#"
general:
  input_dir: /data
settings:
  y_start: 2000
  y_end: 2015
  continent: Africa
conflict:
  min_nr_casualties: 10
  type_of_conflict: 1
  country: ""
climate:
  shp: KG_1986-2010.shp
  code2class: code2class.txt
  zones: Tropical,Arid
"#;

    #[test]
    fn parses_full_config() {
        let config = parse(BASE);
        assert_eq!(config.conflict.min_nr_casualties, Some(10));
        assert_eq!(config.conflict.type_of_conflict, Some(1));
        assert_eq!(config.conflict.country, "");
        assert_eq!(config.settings.y_start, 2000);
        assert_eq!(config.zone_classes(), vec!["Tropical", "Arid"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_string_criteria_deserialize_to_none() {
        let yaml = BASE
            .replace("min_nr_casualties: 10", "min_nr_casualties: \"\"")
            .replace("type_of_conflict: 1", "type_of_conflict: \"\"");
        let config = parse(&yaml);
        assert_eq!(config.conflict.min_nr_casualties, None);
        assert_eq!(config.conflict.type_of_conflict, None);
    }

    #[test]
    fn missing_conflict_section_means_no_criteria() {
        let yaml: String = BASE
            .lines()
            .filter(|l| {
                !l.starts_with("conflict")
                    && !l.contains("min_nr_casualties")
                    && !l.contains("type_of_conflict")
                    && !l.contains("country")
            })
            .collect::<Vec<_>>()
            .join("\n");
        let config = parse(&yaml);
        assert_eq!(config.conflict.min_nr_casualties, None);
        assert_eq!(config.conflict.type_of_conflict, None);
        assert_eq!(config.conflict.country, "");
    }

    #[test]
    fn inverted_period_is_rejected() {
        let yaml = BASE.replace("y_end: 2015", "y_end: 1990");
        let err = parse(&yaml).validate().unwrap_err();
        assert!(err.to_string().contains("y_start"));
    }

    #[test]
    fn empty_zone_list_is_rejected() {
        let yaml = BASE.replace("zones: Tropical,Arid", "zones: \"  , \"");
        assert!(parse(&yaml).validate().is_err());
    }

    #[test]
    fn world_layer_defaults_to_naturalearth() {
        let config = parse(BASE);
        assert_eq!(
            config.world_path(),
            PathBuf::from("/data/naturalearth_lowres.shp")
        );
    }
}
