use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use geo::{MultiPolygon, Point};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// AttrValue – a single extra-attribute cell
// ---------------------------------------------------------------------------

/// A dynamically-typed attribute value for the columns the selector does not
/// interpret. Conflict-database extracts (e.g. UCDP GED) carry dozens of
/// columns beyond the four we filter on; they ride along untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    String(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::String(s) => write!(f, "{s}"),
            AttrValue::Integer(i) => write!(f, "{i}"),
            AttrValue::Float(v) => write!(f, "{v}"),
            AttrValue::Null => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// ConflictEvent – one row of the event table
// ---------------------------------------------------------------------------

/// A single conflict event (one row of the source extract).
///
/// `point` is lon/lat in EPSG:4326, matching the reference polygon layers.
#[derive(Debug, Clone)]
pub struct ConflictEvent {
    /// Event location (x = longitude, y = latitude).
    pub point: Point<f64>,
    /// Best estimate of the fatality count.
    pub best: i64,
    /// Violence type code (1 = state-based, 2 = non-state, 3 = one-sided).
    pub type_of_violence: i32,
    /// Country name as recorded in the source database.
    pub country: String,
    /// Calendar year of the event.
    pub year: i32,
    /// Remaining columns, opaque to the selector.
    pub extra: BTreeMap<String, AttrValue>,
}

// ---------------------------------------------------------------------------
// ConflictDataset – the in-memory event collection
// ---------------------------------------------------------------------------

/// The full event collection handed through the pipeline. Each stage consumes
/// a dataset and returns a (possibly smaller) new one; nothing mutates rows
/// in place.
#[derive(Debug, Clone, Default)]
pub struct ConflictDataset {
    /// All events (rows).
    pub events: Vec<ConflictEvent>,
    /// Ordered list of extra-attribute column names present in any row.
    pub column_names: Vec<String>,
}

impl ConflictDataset {
    /// Build the dataset and its extra-column index from loaded events.
    pub fn from_events(events: Vec<ConflictEvent>) -> Self {
        let mut column_names_set: BTreeSet<String> = BTreeSet::new();
        for ev in &events {
            for col in ev.extra.keys() {
                column_names_set.insert(col.clone());
            }
        }
        ConflictDataset {
            events,
            column_names: column_names_set.into_iter().collect(),
        }
    }

    /// Keep only the events passing `pred`, preserving the column index.
    pub fn retain_events<F>(self, mut pred: F) -> Self
    where
        F: FnMut(&ConflictEvent) -> bool,
    {
        let mut events = self.events;
        events.retain(|ev| pred(ev));
        ConflictDataset {
            events,
            column_names: self.column_names,
        }
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Reference polygon layers
// ---------------------------------------------------------------------------

/// One country polygon from the world boundary reference layer.
#[derive(Debug, Clone)]
pub struct BoundaryFeature {
    /// Country name (informational, used in logs).
    pub name: String,
    /// Continent attribute used for the continent subset.
    pub continent: String,
    pub geometry: MultiPolygon<f64>,
}

/// World country-boundary layer, or a continent subset of it.
#[derive(Debug, Clone, Default)]
pub struct BoundaryLayer {
    pub features: Vec<BoundaryFeature>,
}

impl BoundaryLayer {
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// One polygon of the Köppen–Geiger climate classification layer.
#[derive(Debug, Clone)]
pub struct ClimatePolygon {
    /// Integer grid code identifying the climate class.
    pub gridcode: i32,
    pub geometry: MultiPolygon<f64>,
}

/// Climate classification polygon layer.
#[derive(Debug, Clone, Default)]
pub struct ClimateLayer {
    pub polygons: Vec<ClimatePolygon>,
}

/// One row of the tab-separated grid-code → class-name lookup table.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeClassRow {
    pub code: i32,
    pub class: String,
}
