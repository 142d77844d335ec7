use geo::{Closest, ClosestPoint, Coord, Distance, Euclidean, Geometry, Intersects, Point};

use super::{MapModel, VectorLayer};
use crate::feature::MapFeature;

/// A feature under the cursor, with the layer it belongs to.
#[derive(Clone, Copy, Debug)]
pub struct FeatureHit<'a> {
    pub layer: &'a VectorLayer,
    pub feature: &'a MapFeature,
}

impl MapModel {
    /// Features at `coord`, top-most first. Hidden layers are skipped.
    ///
    /// `tolerance` is in map units; callers convert their pixel tolerance with
    /// the current view resolution.
    pub fn features_at(&self, coord: Coord<f64>, tolerance: f64) -> Vec<FeatureHit<'_>> {
        let point = Point::from(coord);

        self.layers
            .iter()
            .rev()
            .filter(|layer| layer.visible)
            .flat_map(|layer| {
                layer
                    .features
                    .iter()
                    .rev()
                    .filter(move |feature| hits(&feature.geometry, point, tolerance))
                    .map(move |feature| FeatureHit { layer, feature })
            })
            .collect()
    }
}

fn hits(geometry: &Geometry<f64>, point: Point<f64>, tolerance: f64) -> bool {
    if let Geometry::Polygon(polygon) = geometry {
        if polygon.intersects(&point) {
            return true;
        }
    }

    match geometry.closest_point(&point) {
        Closest::Intersection(_) => true,
        Closest::SinglePoint(closest) => Euclidean.distance(closest, point) <= tolerance,
        Closest::Indeterminate => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::tests::sample_document;
    use crate::map::{MapOptions, build_map};
    use geo::{LineString, MultiLineString};

    fn names(hits: &[FeatureHit<'_>]) -> Vec<String> {
        hits.iter()
            .map(|hit| match hit.feature.attributes.get("NAME").or(hit.feature.attributes.get("BLOCK")) {
                Some(serde_json::Value::String(name)) => name.clone(),
                _ => String::new(),
            })
            .collect()
    }

    #[test]
    fn test_features_at_top_most_first() {
        let map = build_map(&sample_document(), &MapOptions::default()).unwrap();

        let hits = map.features_at(Coord { x: 5.0, y: 5.0 }, 0.5);
        assert_eq!(names(&hits), ["Central High", "A <1>"]);
        assert_eq!(hits[0].layer.name, "schools");
    }

    #[test]
    fn test_features_at_tolerance() {
        let map = build_map(&sample_document(), &MapOptions::default()).unwrap();

        // near the school but outside both blocks
        let outside = Coord { x: 5.0, y: 10.5 };
        assert!(map.features_at(outside, 0.1).is_empty());
        assert_eq!(names(&map.features_at(outside, 1.0)), ["A <1>"]);
    }

    #[test]
    fn test_hidden_layers_skipped() {
        let mut map = build_map(&sample_document(), &MapOptions::default()).unwrap();
        map.layers[0].visible = false;

        let hits = map.features_at(Coord { x: 15.0, y: 5.0 }, 0.0);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_line_hit() {
        let line = Geometry::MultiLineString(MultiLineString::new(vec![LineString::from(vec![
            (0.0, 0.0),
            (10.0, 0.0),
        ])]));

        assert!(hits(&line, Point::new(5.0, 0.0), 0.0));
        assert!(hits(&line, Point::new(5.0, 0.4), 0.5));
        assert!(!hits(&line, Point::new(5.0, 2.0), 0.5));
    }
}
