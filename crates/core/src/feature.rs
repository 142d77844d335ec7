//! ESRI feature sets to [`geo`] features.
//!
//! Only points, polylines and polygons are converted. Polylines always become
//! `MultiLineString`s and a polygon's first ring is its exterior; the remaining
//! rings are holes.

use geo::{Coord, Geometry, LineString, MultiLineString, Point, Polygon};
use tracing::debug;

use crate::esri::{EsriFeature, FeatureSet, GeometryType};
use crate::style::not_implemented;

/// Feature attributes, in the order the portal sent them.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

#[derive(Clone, Debug, PartialEq)]
pub struct MapFeature {
    pub geometry: Geometry<f64>,
    pub attributes: Attributes,
}

/// Converts every feature of a feature set. The set's own geometry type wins
/// over `fallback_geometry_type` (the layer definition's).
pub fn features_from_feature_set(
    feature_set: &FeatureSet,
    fallback_geometry_type: Option<&str>,
) -> Vec<MapFeature> {
    let Some(type_name) = feature_set
        .geometry_type
        .as_deref()
        .or(fallback_geometry_type)
    else {
        if !feature_set.features.is_empty() {
            not_implemented("Feature set without a geometry type");
        }
        return Vec::new();
    };

    let Ok(geometry_type) = type_name.parse::<GeometryType>() else {
        not_implemented(type_name);
        return Vec::new();
    };

    let features: Vec<MapFeature> = feature_set
        .features
        .iter()
        .filter_map(|feature| feature_from_esri_feature(geometry_type, feature))
        .collect();

    if features.len() < feature_set.features.len() {
        debug!(
            "Skipped {} of {} {} features without usable geometry",
            feature_set.features.len() - features.len(),
            feature_set.features.len(),
            geometry_type
        );
    }

    features
}

pub fn feature_from_esri_feature(
    geometry_type: GeometryType,
    feature: &EsriFeature,
) -> Option<MapFeature> {
    let esri = feature.geometry.as_ref()?;

    let geometry = match geometry_type {
        GeometryType::Point => Geometry::Point(Point::new(esri.x?, esri.y?)),
        GeometryType::Polyline => {
            let paths = esri.paths.as_ref()?;
            Geometry::MultiLineString(MultiLineString::new(
                paths.iter().map(|path| to_line_string(path)).collect(),
            ))
        }
        GeometryType::Polygon => {
            let mut rings = esri.rings.as_ref()?.iter().map(|ring| to_line_string(ring));
            let exterior = rings.next()?;
            Geometry::Polygon(Polygon::new(exterior, rings.collect()))
        }
    };

    Some(MapFeature {
        geometry,
        attributes: feature.attributes.clone(),
    })
}

/// Drops any z/m ordinates; vertices with fewer than two are skipped.
fn to_line_string(vertices: &[Vec<f64>]) -> LineString<f64> {
    vertices
        .iter()
        .filter_map(|vertex| match vertex.as_slice() {
            [x, y, ..] => Some(Coord { x: *x, y: *y }),
            _ => None,
        })
        .collect()
}
