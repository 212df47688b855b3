use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};
use geo::{MultiPolygon, Point};
use geojson::{FeatureCollection, GeoJson};
use log::warn;
use serde_json::Value as JsonValue;
use shapefile::dbase::FieldValue;

use super::model::{
    AttrValue, BoundaryFeature, BoundaryLayer, ClimateLayer, ClimatePolygon, CodeClassRow,
    ConflictDataset, ConflictEvent,
};
use crate::error::SelectionError;

// ---------------------------------------------------------------------------
// Event extracts
// ---------------------------------------------------------------------------

/// Load a conflict-event extract from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – one event per row, `latitude`/`longitude` columns
/// * `.geojson` / `.json` – a FeatureCollection of point features
pub fn load_events(path: &Path) -> Result<ConflictDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_events_csv(path),
        "geojson" | "json" => load_events_geojson(path),
        other => bail!("Unsupported event file extension: .{other}"),
    }
}

/// CSV layout: header row with column names. Required columns are
/// `latitude`, `longitude`, `best`, `type_of_violence`, `country`, `year`
/// (matching a UCDP GED extract); all other columns are kept as opaque
/// extra attributes.
fn load_events_csv(path: &Path) -> Result<ConflictDataset> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening event CSV {}", path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let col = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("CSV missing '{name}' column"))
    };
    let lat_idx = col("latitude")?;
    let lon_idx = col("longitude")?;
    let best_idx = col("best")?;
    let violence_idx = col("type_of_violence")?;
    let country_idx = col("country")?;
    let year_idx = col("year")?;
    let core = [lat_idx, lon_idx, best_idx, violence_idx, country_idx, year_idx];

    let mut events = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let field = |idx: usize| record.get(idx).unwrap_or("").trim();
        let lat: f64 = field(lat_idx)
            .parse()
            .with_context(|| format!("CSV row {row_no}: bad latitude"))?;
        let lon: f64 = field(lon_idx)
            .parse()
            .with_context(|| format!("CSV row {row_no}: bad longitude"))?;
        let best: i64 = field(best_idx)
            .parse()
            .with_context(|| format!("CSV row {row_no}: bad 'best' count"))?;
        let type_of_violence: i32 = field(violence_idx)
            .parse()
            .with_context(|| format!("CSV row {row_no}: bad 'type_of_violence'"))?;
        let year: i32 = field(year_idx)
            .parse()
            .with_context(|| format!("CSV row {row_no}: bad 'year'"))?;

        let mut extra = BTreeMap::new();
        for (col_idx, value) in record.iter().enumerate() {
            if core.contains(&col_idx) {
                continue;
            }
            extra.insert(headers[col_idx].clone(), guess_attr_type(value));
        }

        events.push(ConflictEvent {
            point: Point::new(lon, lat),
            best,
            type_of_violence,
            country: field(country_idx).to_string(),
            year,
            extra,
        });
    }

    Ok(ConflictDataset::from_events(events))
}

/// GeoJSON layout: a FeatureCollection of Point features whose properties
/// carry the same required columns as the CSV format.
fn load_events_geojson(path: &Path) -> Result<ConflictDataset> {
    let file =
        File::open(path).with_context(|| format!("opening GeoJSON {}", path.display()))?;
    let geojson = GeoJson::from_reader(BufReader::new(file)).context("parsing GeoJSON")?;
    let collection =
        FeatureCollection::try_from(geojson).context("expected a FeatureCollection")?;

    let mut events = Vec::with_capacity(collection.features.len());

    for (i, feature) in collection.features.into_iter().enumerate() {
        let geometry = feature
            .geometry
            .with_context(|| format!("feature {i} has no geometry"))?;
        let geometry = geo::Geometry::<f64>::try_from(geometry.value)
            .with_context(|| format!("feature {i}: unsupported geometry"))?;
        let point = match geometry {
            geo::Geometry::Point(p) => p,
            other => bail!("feature {i}: expected Point geometry, got {other:?}"),
        };

        let props = feature
            .properties
            .with_context(|| format!("feature {i} has no properties"))?;

        let best = prop_i64(&props, "best", i)?;
        let type_of_violence = prop_i64(&props, "type_of_violence", i)? as i32;
        let year = prop_i64(&props, "year", i)? as i32;
        let country = props
            .get("country")
            .and_then(|v| v.as_str())
            .with_context(|| format!("feature {i}: missing 'country' property"))?
            .to_string();

        let mut extra = BTreeMap::new();
        for (key, val) in &props {
            if matches!(key.as_str(), "best" | "type_of_violence" | "year" | "country") {
                continue;
            }
            extra.insert(key.clone(), json_to_attr(val));
        }

        events.push(ConflictEvent {
            point,
            best,
            type_of_violence,
            country,
            year,
            extra,
        });
    }

    Ok(ConflictDataset::from_events(events))
}

fn prop_i64(props: &serde_json::Map<String, JsonValue>, key: &str, row: usize) -> Result<i64> {
    props
        .get(key)
        .and_then(|v| v.as_i64())
        .with_context(|| format!("feature {row}: missing or non-integer '{key}' property"))
}

fn json_to_attr(val: &JsonValue) -> AttrValue {
    match val {
        JsonValue::String(s) => AttrValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                AttrValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                AttrValue::Float(f)
            } else {
                AttrValue::String(n.to_string())
            }
        }
        JsonValue::Null => AttrValue::Null,
        other => AttrValue::String(other.to_string()),
    }
}

fn guess_attr_type(s: &str) -> AttrValue {
    if s.is_empty() {
        return AttrValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return AttrValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return AttrValue::Float(f);
    }
    AttrValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Write a dataset back out as CSV: the core columns first, then every extra
/// attribute column present in the dataset (empty cell where a row lacks
/// one).
pub fn write_events_csv(dataset: &ConflictDataset, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating output CSV {}", path.display()))?;

    let mut header = vec![
        "longitude".to_string(),
        "latitude".to_string(),
        "best".to_string(),
        "type_of_violence".to_string(),
        "country".to_string(),
        "year".to_string(),
    ];
    header.extend(dataset.column_names.iter().cloned());
    writer.write_record(&header).context("writing CSV header")?;

    for ev in &dataset.events {
        let mut row = vec![
            ev.point.x().to_string(),
            ev.point.y().to_string(),
            ev.best.to_string(),
            ev.type_of_violence.to_string(),
            ev.country.clone(),
            ev.year.to_string(),
        ];
        for col in &dataset.column_names {
            row.push(match ev.extra.get(col) {
                Some(val) => val.to_string(),
                None => String::new(),
            });
        }
        writer.write_record(&row).context("writing CSV row")?;
    }

    writer.flush().context("flushing output CSV")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Reference polygon layers (shapefile + dbf attributes)
// ---------------------------------------------------------------------------

/// Load the world country-boundary layer. Each feature needs a `continent`
/// attribute and (for logging) a country name.
pub fn load_boundaries(path: &Path) -> Result<BoundaryLayer> {
    ensure_epsg4326(path)?;

    let mut reader = shapefile::Reader::from_path(path)
        .with_context(|| format!("opening boundary shapefile {}", path.display()))?;

    let mut features = Vec::new();
    for (i, result) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = result.with_context(|| format!("boundary feature {i}"))?;
        let geometry = match shape_to_multipolygon(shape) {
            Some(g) => g,
            None => continue, // non-polygon shapes carry no boundary
        };
        let continent = record_string(&record, &["continent", "CONTINENT"])
            .with_context(|| format!("boundary feature {i}: missing 'continent' attribute"))?;
        let name = record_string(&record, &["name", "NAME", "admin", "ADMIN"])
            .unwrap_or_else(|| format!("feature {i}"));

        features.push(BoundaryFeature {
            name,
            continent,
            geometry,
        });
    }

    Ok(BoundaryLayer { features })
}

/// Load the Köppen–Geiger climate classification layer. Each polygon carries
/// an integer `GRIDCODE` naming its climate class.
pub fn load_climate_layer(path: &Path) -> Result<ClimateLayer> {
    ensure_epsg4326(path)?;

    let mut reader = shapefile::Reader::from_path(path)
        .with_context(|| format!("opening climate shapefile {}", path.display()))?;

    let mut polygons = Vec::new();
    for (i, result) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = result.with_context(|| format!("climate feature {i}"))?;
        let geometry = match shape_to_multipolygon(shape) {
            Some(g) => g,
            None => continue,
        };
        let gridcode = record_int(&record, &["GRIDCODE", "gridcode", "GRID_CODE"])
            .with_context(|| format!("climate feature {i}: missing 'GRIDCODE' attribute"))?;

        polygons.push(ClimatePolygon { gridcode, geometry });
    }

    Ok(ClimateLayer { polygons })
}

/// Load the tab-separated grid-code → class-name lookup table.
pub fn load_code2class(path: &Path) -> Result<Vec<CodeClassRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("opening code2class table {}", path.display()))?;

    let mut rows = Vec::new();
    for (i, result) in reader.deserialize::<CodeClassRow>().enumerate() {
        rows.push(result.with_context(|| format!("code2class row {i}"))?);
    }
    Ok(rows)
}

fn shape_to_multipolygon(shape: shapefile::Shape) -> Option<MultiPolygon<f64>> {
    match shape {
        shapefile::Shape::Polygon(p) => Some(MultiPolygon::from(p)),
        _ => None,
    }
}

fn record_string(record: &shapefile::dbase::Record, names: &[&str]) -> Option<String> {
    for name in names {
        match record.get(name) {
            Some(FieldValue::Character(Some(s))) => return Some(s.clone()),
            Some(FieldValue::Character(None)) => return None,
            _ => continue,
        }
    }
    None
}

fn record_int(record: &shapefile::dbase::Record, names: &[&str]) -> Option<i32> {
    for name in names {
        match record.get(name) {
            Some(FieldValue::Numeric(Some(n))) => return Some(*n as i32),
            Some(FieldValue::Integer(n)) => return Some(*n),
            Some(FieldValue::Float(Some(n))) => return Some(*n as i32),
            _ => continue,
        }
    }
    None
}

// ---------------------------------------------------------------------------
// CRS check
// ---------------------------------------------------------------------------

/// Every geospatial input must be in EPSG:4326 (lon/lat). Shapefiles name
/// their CRS in a `.prj` sidecar; a projected or non-WGS84 entry is an
/// error, a missing sidecar is assumed geographic with a warning.
fn ensure_epsg4326(shp_path: &Path) -> Result<(), SelectionError> {
    let prj_path = shp_path.with_extension("prj");
    let wkt = match std::fs::read_to_string(&prj_path) {
        Ok(text) => text,
        Err(_) => {
            warn!(
                "no .prj sidecar for {}; assuming EPSG:4326",
                shp_path.display()
            );
            return Ok(());
        }
    };

    let upper = wkt.to_ascii_uppercase();
    if upper.contains("PROJCS") {
        return Err(SelectionError::CrsMismatch {
            path: shp_path.to_path_buf(),
            detail: "projected coordinate system in .prj".into(),
        });
    }
    if upper.contains("WGS_1984") || upper.contains("WGS 84") || upper.contains("WGS84") {
        return Ok(());
    }
    Err(SelectionError::CrsMismatch {
        path: shp_path.to_path_buf(),
        detail: format!("unrecognised geographic CRS in {}", prj_path.display()),
    })
}
