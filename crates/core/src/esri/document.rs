use std::fmt;

use geo::Rect;
use serde::{Deserialize, Serialize, Serializer};

use super::{DrawingInfo, FeatureSet, default_opacity, default_visibility};

/// Root of the `/content/items/<id>/data` response for a web map item.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebMapDocument {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub spatial_reference: Option<SpatialReference>,
    #[serde(default)]
    pub base_map: BaseMap,
    #[serde(default)]
    pub operational_layers: Vec<OperationalLayer>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialReference {
    pub wkid: Option<u32>,
    pub latest_wkid: Option<u32>,
}

impl SpatialReference {
    /// `latestWkid` wins over the legacy `wkid` (102100 vs 3857).
    pub fn projection(&self) -> Option<Projection> {
        self.latest_wkid.or(self.wkid).map(Projection)
    }
}

/// An EPSG code, rendered as `EPSG:<code>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Projection(pub u32);

impl Projection {
    pub const WEB_MERCATOR: Projection = Projection(3857);

    pub fn code(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

impl Serialize for Projection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseMap {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub base_map_layers: Vec<BaseMapLayer>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseMapLayer {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub layer_type: Option<String>,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default = "default_visibility")]
    pub visibility: bool,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationalLayer {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub layer_type: Option<String>,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default = "default_visibility")]
    pub visibility: bool,
    #[serde(default)]
    pub feature_collection: Option<FeatureCollection>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub layers: Vec<FeatureCollectionLayer>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureCollectionLayer {
    pub layer_definition: LayerDefinition,
    #[serde(default)]
    pub feature_set: FeatureSet,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub geometry_type: Option<String>,
    #[serde(default)]
    pub spatial_reference: Option<SpatialReference>,
    #[serde(default)]
    pub drawing_info: Option<DrawingInfo>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub extent: Option<Envelope>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(rename = "type", default)]
    pub field_type: Option<String>,
}

impl Field {
    pub const STRING_TYPE: &'static str = "esriFieldTypeString";

    /// Alias when it differs from the field name, otherwise the name.
    pub fn display_name(&self) -> &str {
        match &self.alias {
            Some(alias) if alias != &self.name => alias,
            _ => &self.name,
        }
    }

    pub fn is_string(&self) -> bool {
        self.field_type.as_deref() == Some(Self::STRING_TYPE)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
    #[serde(default)]
    pub spatial_reference: Option<SpatialReference>,
}

impl Envelope {
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new((self.xmin, self.ymin), (self.xmax, self.ymax))
    }
}

/// In-band error body the portal returns (with HTTP 200) for bad item ids.
#[derive(Clone, Debug, Deserialize)]
pub struct PortalErrorEnvelope {
    pub error: PortalError,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PortalError {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}
