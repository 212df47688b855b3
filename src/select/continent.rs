use geo::Intersects;
use log::{info, warn};

use crate::data::model::{BoundaryLayer, ConflictDataset};
use crate::error::SelectionError;

// ---------------------------------------------------------------------------
// Stage 3: continent clip
// ---------------------------------------------------------------------------

/// Clip the dataset to the configured continent.
///
/// Selects the world polygons whose `continent` attribute equals `continent`
/// (exact match) and keeps the events whose point intersects any of them.
/// Intersection rather than strict containment, so events sitting exactly on
/// a country boundary are kept.
///
/// Returns the clipped dataset together with the continent polygon subset;
/// downstream only needs the latter for optional plotting.
pub fn clip_to_continent(
    dataset: ConflictDataset,
    world: &BoundaryLayer,
    continent: &str,
) -> Result<(ConflictDataset, BoundaryLayer), SelectionError> {
    let subset = BoundaryLayer {
        features: world
            .features
            .iter()
            .filter(|f| f.continent == continent)
            .cloned()
            .collect(),
    };
    if subset.is_empty() {
        // A typo'd continent name would otherwise empty the whole pipeline.
        return Err(SelectionError::UnknownContinent(continent.to_string()));
    }

    info!(
        "clipping dataset to continent {continent} ({} countries)",
        subset.features.len()
    );

    let clipped = dataset.retain_events(|ev| {
        subset
            .features
            .iter()
            .any(|f| f.geometry.intersects(&ev.point))
    });

    if clipped.is_empty() {
        warn!("no events located in continent {continent}");
    }

    Ok((clipped, subset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{BoundaryFeature, ConflictEvent};
    use geo::{LineString, MultiPolygon, Point, Polygon};
    use std::collections::BTreeMap;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![Polygon::new(
            LineString::from(vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)]),
            vec![],
        )])
    }

    fn world() -> BoundaryLayer {
        BoundaryLayer {
            features: vec![
                BoundaryFeature {
                    name: "Kenya".to_string(),
                    continent: "Africa".to_string(),
                    geometry: rect(0.0, -10.0, 20.0, 10.0),
                },
                BoundaryFeature {
                    name: "France".to_string(),
                    continent: "Europe".to_string(),
                    geometry: rect(40.0, 40.0, 50.0, 50.0),
                },
            ],
        }
    }

    fn event_at(lon: f64, lat: f64) -> ConflictEvent {
        ConflictEvent {
            point: Point::new(lon, lat),
            best: 1,
            type_of_violence: 1,
            country: "Kenya".to_string(),
            year: 2000,
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn keeps_only_events_inside_the_continent() {
        let dataset = ConflictDataset::from_events(vec![
            event_at(5.0, 5.0),   // inside Africa
            event_at(45.0, 45.0), // inside Europe
            event_at(-30.0, 0.0), // ocean
        ]);
        let (clipped, subset) = clip_to_continent(dataset, &world(), "Africa").unwrap();
        assert_eq!(clipped.len(), 1);
        assert_eq!(clipped.events[0].point, Point::new(5.0, 5.0));
        assert_eq!(subset.features.len(), 1);
        assert_eq!(subset.features[0].continent, "Africa");
    }

    #[test]
    fn boundary_points_are_retained() {
        let dataset = ConflictDataset::from_events(vec![
            event_at(0.0, 0.0),  // on the western edge
            event_at(20.0, 10.0), // on the north-eastern corner
        ]);
        let (clipped, _) = clip_to_continent(dataset, &world(), "Africa").unwrap();
        assert_eq!(clipped.len(), 2);
    }

    #[test]
    fn unknown_continent_is_an_error() {
        let dataset = ConflictDataset::from_events(vec![event_at(5.0, 5.0)]);
        let err = clip_to_continent(dataset, &world(), "Afrika").unwrap_err();
        assert!(matches!(err, SelectionError::UnknownContinent(_)));
    }
}
