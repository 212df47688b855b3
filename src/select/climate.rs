use geo::Intersects;
use log::{debug, info, warn};

use crate::data::model::{ClimateLayer, CodeClassRow, ConflictDataset};
use crate::error::SelectionError;

// ---------------------------------------------------------------------------
// Stage 4: climate-zone clip
// ---------------------------------------------------------------------------

/// Resolve climate class names to grid codes via the lookup table.
///
/// Each class name must match exactly one row; zero or multiple matches is a
/// [`SelectionError::ZoneLookup`] rather than an arbitrary pick.
pub fn resolve_zone_codes(
    classes: &[String],
    code2class: &[CodeClassRow],
) -> Result<Vec<i32>, SelectionError> {
    classes
        .iter()
        .map(|class| {
            let matches: Vec<i32> = code2class
                .iter()
                .filter(|row| &row.class == class)
                .map(|row| row.code)
                .collect();
            match matches.as_slice() {
                [code] => {
                    debug!("climate class '{class}' resolved to grid code {code}");
                    Ok(*code)
                }
                other => Err(SelectionError::ZoneLookup {
                    class: class.clone(),
                    matches: other.len(),
                }),
            }
        })
        .collect()
}

/// Keep the events located in any climate polygon carrying one of `codes`.
///
/// A point is inside the configured zones exactly when it intersects at
/// least one selected polygon, so no polygon union (or repair of
/// self-intersecting unions) is needed.
pub fn clip_to_zones(
    dataset: ConflictDataset,
    layer: &ClimateLayer,
    codes: &[i32],
) -> ConflictDataset {
    let zones: Vec<_> = layer
        .polygons
        .iter()
        .filter(|p| codes.contains(&p.gridcode))
        .collect();

    info!(
        "clipping to climate zones with grid codes {codes:?} ({} polygons)",
        zones.len()
    );
    if zones.is_empty() {
        warn!("no climate polygons carry the requested grid codes");
    }

    dataset.retain_events(|ev| zones.iter().any(|z| z.geometry.intersects(&ev.point)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{ClimatePolygon, ConflictEvent};
    use geo::{LineString, MultiPolygon, Point, Polygon};
    use std::collections::BTreeMap;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![Polygon::new(
            LineString::from(vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)]),
            vec![],
        )])
    }

    fn table() -> Vec<CodeClassRow> {
        vec![
            CodeClassRow {
                code: 1,
                class: "Tropical".to_string(),
            },
            CodeClassRow {
                code: 2,
                class: "Arid".to_string(),
            },
        ]
    }

    #[test]
    fn resolves_each_class_to_one_code() {
        let codes = resolve_zone_codes(&["Tropical".to_string()], &table()).unwrap();
        assert_eq!(codes, vec![1]);

        let codes =
            resolve_zone_codes(&["Arid".to_string(), "Tropical".to_string()], &table()).unwrap();
        assert_eq!(codes, vec![2, 1]);
    }

    #[test]
    fn unknown_class_is_a_lookup_error() {
        let err = resolve_zone_codes(&["Polar".to_string()], &table()).unwrap_err();
        match err {
            SelectionError::ZoneLookup { class, matches } => {
                assert_eq!(class, "Polar");
                assert_eq!(matches, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ambiguous_class_is_a_lookup_error() {
        let mut rows = table();
        rows.push(CodeClassRow {
            code: 9,
            class: "Tropical".to_string(),
        });
        let err = resolve_zone_codes(&["Tropical".to_string()], &rows).unwrap_err();
        match err {
            SelectionError::ZoneLookup { class, matches } => {
                assert_eq!(class, "Tropical");
                assert_eq!(matches, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn clips_to_the_selected_zones_only() {
        let layer = ClimateLayer {
            polygons: vec![
                ClimatePolygon {
                    gridcode: 1,
                    geometry: rect(0.0, 0.0, 10.0, 10.0),
                },
                ClimatePolygon {
                    gridcode: 2,
                    geometry: rect(10.0, 0.0, 20.0, 10.0),
                },
            ],
        };
        let event_at = |lon: f64, lat: f64| ConflictEvent {
            point: Point::new(lon, lat),
            best: 1,
            type_of_violence: 1,
            country: "Kenya".to_string(),
            year: 2000,
            extra: BTreeMap::new(),
        };
        let dataset = ConflictDataset::from_events(vec![
            event_at(5.0, 5.0),  // tropical
            event_at(15.0, 5.0), // arid
            event_at(25.0, 5.0), // neither
        ]);

        let out = clip_to_zones(dataset, &layer, &[1]);
        assert_eq!(out.len(), 1);
        assert_eq!(out.events[0].point, Point::new(5.0, 5.0));
    }
}
