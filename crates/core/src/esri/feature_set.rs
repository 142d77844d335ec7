use serde::Deserialize;
use strum::{Display, EnumString};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSet {
    #[serde(default)]
    pub geometry_type: Option<String>,
    #[serde(default)]
    pub features: Vec<EsriFeature>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EsriFeature {
    #[serde(default)]
    pub geometry: Option<EsriGeometry>,
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// Union of the point, polyline and polygon geometry shapes.
///
/// Vertices may carry z/m values; only the first two ordinates are read.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct EsriGeometry {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub paths: Option<Vec<Vec<Vec<f64>>>>,
    #[serde(default)]
    pub rings: Option<Vec<Vec<Vec<f64>>>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumString, Display)]
pub enum GeometryType {
    #[strum(serialize = "esriGeometryPoint")]
    Point,
    #[strum(serialize = "esriGeometryPolyline")]
    Polyline,
    #[strum(serialize = "esriGeometryPolygon")]
    Polygon,
}
