//! Optional rendering of a finished selection.
//!
//! Takes the final dataset and the continent boundary as explicit inputs and
//! writes a PNG; it never runs inside the pipeline and touches no shared
//! drawing state.

use std::path::Path;

use anyhow::{bail, Context, Result};
use geo::BoundingRect;
use plotters::prelude::*;

use crate::data::model::{BoundaryLayer, ConflictDataset};

/// Axis padding beyond the continent bounding box, in degrees.
const PADDING_DEG: f64 = 1.0;

/// Render the selected events over the continent boundary to a PNG file.
pub fn render_selection(
    dataset: &ConflictDataset,
    continent: &BoundaryLayer,
    path: &Path,
) -> Result<()> {
    let (x_range, y_range) = padded_extent(continent)?;

    let root = BitMapBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE).context("filling plot background")?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Selected conflict events", ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_range, y_range)
        .context("building chart axes")?;

    chart
        .configure_mesh()
        .x_desc("Longitude")
        .y_desc("Latitude")
        .draw()
        .context("drawing chart mesh")?;

    // Country outlines, exterior and interior rings alike.
    for feature in &continent.features {
        for polygon in feature.geometry.iter() {
            let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors().iter());
            for ring in rings {
                let outline: Vec<(f64, f64)> =
                    ring.points().map(|p| (p.x(), p.y())).collect();
                chart
                    .draw_series(std::iter::once(PathElement::new(
                        outline,
                        BLACK.mix(0.5),
                    )))
                    .context("drawing boundary outline")?;
            }
        }
    }

    chart
        .draw_series(
            dataset
                .events
                .iter()
                .map(|ev| Circle::new((ev.point.x(), ev.point.y()), 3, RED.filled())),
        )
        .context("drawing events")?
        .label("UCDP/PRIO events")
        .legend(|(x, y)| Circle::new((x, y), 3, RED.filled()));

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()
        .context("drawing legend")?;

    root.present().context("writing plot file")?;
    Ok(())
}

/// Bounding box of the continent layer, padded by one degree on every side.
fn padded_extent(
    continent: &BoundaryLayer,
) -> Result<(std::ops::Range<f64>, std::ops::Range<f64>)> {
    let mut bounds: Option<geo::Rect<f64>> = None;
    for feature in &continent.features {
        if let Some(rect) = feature.geometry.bounding_rect() {
            bounds = Some(match bounds {
                None => rect,
                Some(acc) => geo::Rect::new(
                    geo::coord! {
                        x: acc.min().x.min(rect.min().x),
                        y: acc.min().y.min(rect.min().y),
                    },
                    geo::coord! {
                        x: acc.max().x.max(rect.max().x),
                        y: acc.max().y.max(rect.max().y),
                    },
                ),
            });
        }
    }
    let bounds = match bounds {
        Some(b) => b,
        None => bail!("continent layer has no drawable geometry"),
    };

    Ok((
        bounds.min().x - PADDING_DEG..bounds.max().x + PADDING_DEG,
        bounds.min().y - PADDING_DEG..bounds.max().y + PADDING_DEG,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::BoundaryFeature;
    use geo::{LineString, MultiPolygon, Polygon};

    #[test]
    fn extent_is_padded_by_one_degree() {
        let layer = BoundaryLayer {
            features: vec![BoundaryFeature {
                name: "Kenya".to_string(),
                continent: "Africa".to_string(),
                geometry: MultiPolygon(vec![Polygon::new(
                    LineString::from(vec![
                        (0.0, -10.0),
                        (20.0, -10.0),
                        (20.0, 10.0),
                        (0.0, 10.0),
                        (0.0, -10.0),
                    ]),
                    vec![],
                )]),
            }],
        };
        let (x, y) = padded_extent(&layer).unwrap();
        assert_eq!(x, -1.0..21.0);
        assert_eq!(y, -11.0..11.0);
    }

    #[test]
    fn empty_layer_cannot_be_plotted() {
        assert!(padded_extent(&BoundaryLayer::default()).is_err());
    }
}
