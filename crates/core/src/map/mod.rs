//! Assembles a [`MapModel`] from a web map document.

mod query;

use geo::{BoundingRect, Coord, Rect};
use tracing::{debug, info, warn};

use crate::error::{Result, WebMapError};
use crate::esri::{
    BaseMapLayer, FeatureCollectionLayer, Field, OperationalLayer, Projection, SpatialReference,
    WebMapDocument,
};
use crate::feature::{MapFeature, features_from_feature_set};
use crate::style::{Color, LayerStyle, Style, not_implemented, style_from_drawing_info};

pub use query::FeatureHit;

pub const DEFAULT_ZOOM: f64 = 10.0;

#[derive(Clone, Debug)]
pub struct MapOptions {
    /// `layerDefinition.name` of the layer whose extent frames the view.
    pub extent_layer_name: Option<String>,
    pub zoom: f64,
    pub highlight_color: Color,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            extent_layer_name: None,
            zoom: DEFAULT_ZOOM,
            highlight_color: Color::rgba(255, 0, 0, 1.0),
        }
    }
}

/// An ArcGIS REST tiled basemap.
#[derive(Clone, Debug, PartialEq)]
pub struct TileLayer {
    pub id: Option<String>,
    pub title: Option<String>,
    pub url: String,
    pub projection: Projection,
    pub opacity: f64,
    pub visible: bool,
}

#[derive(Clone, Debug)]
pub struct VectorLayer {
    /// Id of the operational layer this layer was flattened out of.
    pub id: Option<String>,
    pub title: String,
    pub name: String,
    pub opacity: f64,
    pub visible: bool,
    pub projection: Projection,
    pub fields: Vec<Field>,
    pub features: Vec<MapFeature>,
    pub style: Option<LayerStyle>,
}

impl VectorLayer {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn style_for(&self, feature: &MapFeature) -> Option<&Style> {
        self.style.as_ref()?.style_for(&feature.attributes)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct View {
    pub projection: Projection,
    /// Panning is constrained to this extent when set.
    pub extent: Option<Rect<f64>>,
    pub center: Option<Coord<f64>>,
    pub zoom: f64,
}

#[derive(Clone, Debug)]
pub struct MapModel {
    pub projection: Projection,
    pub basemaps: Vec<TileLayer>,
    /// Draw order: first layer is drawn first, i.e. bottom-most.
    pub layers: Vec<VectorLayer>,
    pub view: View,
    pub highlight: Style,
}

pub fn build_map(document: &WebMapDocument, options: &MapOptions) -> Result<MapModel> {
    let projection = document
        .spatial_reference
        .as_ref()
        .and_then(SpatialReference::projection)
        .ok_or(WebMapError::MissingSpatialReference)?;
    debug!("Map projection: {projection}");

    let basemaps: Vec<TileLayer> = document
        .base_map
        .base_map_layers
        .iter()
        .filter_map(|layer| tile_layer(layer, projection))
        .collect();

    let mut layers = Vec::new();
    let mut extent = None;

    for operational in &document.operational_layers {
        let Some(collection) = &operational.feature_collection else {
            not_implemented(&format!(
                "Operational layer {:?} without a feature collection",
                operational.title.as_deref().unwrap_or_default()
            ));
            continue;
        };

        for collection_layer in &collection.layers {
            let definition = &collection_layer.layer_definition;
            if options.extent_layer_name.as_deref() == Some(definition.name.as_str()) {
                match definition.extent {
                    Some(envelope) => extent = Some(envelope.to_rect()),
                    None => warn!("Extent layer {:?} has no extent", definition.name),
                }
            }

            layers.push(vector_layer(operational, collection_layer, projection));
        }
    }

    if extent.is_none() {
        if let Some(name) = &options.extent_layer_name {
            warn!("No layer named {name:?}; framing all features instead");
        }
        extent = features_extent(&layers);
    }

    info!(
        "Built map with {} basemap layers and {} vector layers ({} features)",
        basemaps.len(),
        layers.len(),
        layers.iter().map(|layer| layer.features.len()).sum::<usize>()
    );

    Ok(MapModel {
        projection,
        basemaps,
        layers,
        view: View {
            projection,
            extent,
            center: extent.map(|rect| rect.center()),
            zoom: options.zoom,
        },
        highlight: Style::highlight(options.highlight_color),
    })
}

fn tile_layer(layer: &BaseMapLayer, projection: Projection) -> Option<TileLayer> {
    let Some(url) = &layer.url else {
        not_implemented(&format!(
            "Basemap layer {:?} without a url",
            layer.id.as_deref().unwrap_or_default()
        ));
        return None;
    };

    Some(TileLayer {
        id: layer.id.clone(),
        title: layer.title.clone(),
        url: url.clone(),
        projection,
        opacity: layer.opacity,
        visible: layer.visibility,
    })
}

fn vector_layer(
    operational: &OperationalLayer,
    collection_layer: &FeatureCollectionLayer,
    map_projection: Projection,
) -> VectorLayer {
    let definition = &collection_layer.layer_definition;

    let projection = definition
        .spatial_reference
        .as_ref()
        .and_then(SpatialReference::projection)
        .unwrap_or(map_projection);

    let style = match &definition.drawing_info {
        Some(drawing_info) => {
            debug!("Drawing info for {:?}: {drawing_info:?}", definition.name);
            style_from_drawing_info(drawing_info)
        }
        None => {
            not_implemented(&format!("Layer {:?} without drawing info", definition.name));
            None
        }
    };

    let features = features_from_feature_set(
        &collection_layer.feature_set,
        definition.geometry_type.as_deref(),
    );
    debug!(
        "Layer {:?}: {} features, style {:?}",
        definition.name,
        features.len(),
        style
    );

    VectorLayer {
        id: operational.id.clone(),
        title: operational
            .title
            .clone()
            .unwrap_or_else(|| definition.name.clone()),
        name: definition.name.clone(),
        opacity: operational.opacity,
        visible: operational.visibility,
        projection,
        fields: definition.fields.clone(),
        features,
        style,
    }
}

fn features_extent(layers: &[VectorLayer]) -> Option<Rect<f64>> {
    layers
        .iter()
        .flat_map(|layer| &layer.features)
        .filter_map(|feature| feature.geometry.bounding_rect())
        .reduce(|a, b| {
            Rect::new(
                Coord {
                    x: a.min().x.min(b.min().x),
                    y: a.min().y.min(b.min().y),
                },
                Coord {
                    x: a.max().x.max(b.max().x),
                    y: a.max().y.max(b.max().y),
                },
            )
        })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    /// Two operational layers: census blocks (polygons, class breaks) and
    /// schools (points, unique values), on top of one tiled basemap.
    pub(crate) fn sample_document() -> WebMapDocument {
        serde_json::from_value(json!({
            "version": "2.7",
            "spatialReference": { "wkid": 102100, "latestWkid": 3857 },
            "baseMap": {
                "title": "Topographic",
                "baseMapLayers": [
                    {
                        "id": "World_Topo_Map",
                        "url": "https://services.arcgisonline.com/ArcGIS/rest/services/World_Topo_Map/MapServer",
                        "layerType": "ArcGISTiledMapServiceLayer",
                        "opacity": 1,
                        "visibility": true
                    },
                    { "id": "VectorTile", "layerType": "VectorTileLayer", "styleUrl": "https://example.com/style.json" }
                ]
            },
            "operationalLayers": [
                {
                    "id": "blocks_1",
                    "title": "Census Blocks",
                    "opacity": 0.8,
                    "visibility": true,
                    "featureCollection": { "layers": [{
                        "layerDefinition": {
                            "name": "census_blocks",
                            "geometryType": "esriGeometryPolygon",
                            "spatialReference": { "wkid": 102100, "latestWkid": 3857 },
                            "extent": { "xmin": 0, "ymin": 0, "xmax": 20, "ymax": 10 },
                            "drawingInfo": {
                                "fixedSymbols": true,
                                "renderer": {
                                    "type": "simple",
                                    "symbol": {
                                        "type": "esriSFS",
                                        "style": "esriSFSSolid",
                                        "color": [255, 0, 0, 128],
                                        "outline": { "type": "esriSLS", "style": "esriSLSSolid", "color": [0, 0, 0, 255], "width": 1 }
                                    }
                                }
                            },
                            "fields": [
                                { "name": "BLOCK", "alias": "Block", "type": "esriFieldTypeString" },
                                { "name": "POP", "alias": "POP", "type": "esriFieldTypeInteger" }
                            ]
                        },
                        "featureSet": {
                            "geometryType": "esriGeometryPolygon",
                            "features": [
                                {
                                    "geometry": { "rings": [[[0, 0], [0, 10], [10, 10], [10, 0], [0, 0]]] },
                                    "attributes": { "BLOCK": "A <1>", "POP": 120 }
                                },
                                {
                                    "geometry": { "rings": [[[10, 0], [10, 10], [20, 10], [20, 0], [10, 0]]] },
                                    "attributes": { "BLOCK": "B & C", "POP": 45 }
                                }
                            ]
                        }
                    }]}
                },
                {
                    "id": "schools_2",
                    "title": "Schools",
                    "featureCollection": { "layers": [{
                        "layerDefinition": {
                            "name": "schools",
                            "geometryType": "esriGeometryPoint",
                            "drawingInfo": {
                                "fixedSymbols": true,
                                "renderer": {
                                    "type": "uniqueValue",
                                    "field1": "KIND",
                                    "uniqueValueInfos": [
                                        { "value": "high", "symbol": { "type": "esriSMS", "style": "esriSMSCircle", "color": [0, 0, 255, 255], "size": 12 } }
                                    ]
                                }
                            },
                            "fields": [
                                { "name": "NAME", "alias": "School name", "type": "esriFieldTypeString" },
                                { "name": "KIND", "type": "esriFieldTypeString" }
                            ]
                        },
                        "featureSet": {
                            "geometryType": "esriGeometryPoint",
                            "features": [
                                { "geometry": { "x": 5, "y": 5 }, "attributes": { "NAME": "Central High", "KIND": "high" } }
                            ]
                        }
                    }]}
                },
                { "id": "service_3", "title": "Parcels", "url": "https://example.com/FeatureServer/0" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_build_map() {
        let options = MapOptions {
            extent_layer_name: Some("census_blocks".into()),
            ..MapOptions::default()
        };
        let map = build_map(&sample_document(), &options).unwrap();

        assert_eq!(map.projection, Projection(3857));
        // vector tile basemap has no url and is skipped
        assert_eq!(map.basemaps.len(), 1);
        assert_eq!(map.basemaps[0].projection, Projection(3857));

        // the service-backed operational layer is skipped
        let names: Vec<&str> = map.layers.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["census_blocks", "schools"]);

        let blocks = &map.layers[0];
        assert_eq!(blocks.title, "Census Blocks");
        assert_eq!(blocks.id.as_deref(), Some("blocks_1"));
        assert_eq!(blocks.opacity, 0.8);
        assert!(blocks.visible);
        assert_eq!(blocks.features.len(), 2);
        assert!(matches!(blocks.style, Some(LayerStyle::Static(_))));
        assert_eq!(blocks.field("BLOCK").unwrap().display_name(), "Block");

        assert_eq!(map.view.extent, Some(Rect::new((0.0, 0.0), (20.0, 10.0))));
        assert_eq!(map.view.center, Some(Coord { x: 10.0, y: 5.0 }));
        assert_eq!(map.view.zoom, DEFAULT_ZOOM);
    }

    #[test]
    fn test_layer_projection_falls_back_to_map() {
        let map = build_map(&sample_document(), &MapOptions::default()).unwrap();
        assert_eq!(map.layers[1].projection, Projection(3857));
    }

    #[test]
    fn test_extent_falls_back_to_features() {
        let options = MapOptions {
            extent_layer_name: Some("missing".into()),
            zoom: 12.0,
            ..MapOptions::default()
        };
        let map = build_map(&sample_document(), &options).unwrap();

        assert_eq!(map.view.extent, Some(Rect::new((0.0, 0.0), (20.0, 10.0))));
        assert_eq!(map.view.zoom, 12.0);
    }

    #[test]
    fn test_style_for_feature() {
        let map = build_map(&sample_document(), &MapOptions::default()).unwrap();
        let schools = &map.layers[1];
        let style = schools.style_for(&schools.features[0]).unwrap();
        assert!(style.image.is_some());
    }

    #[test]
    fn test_missing_spatial_reference() {
        let document: WebMapDocument = serde_json::from_value(json!({
            "operationalLayers": []
        }))
        .unwrap();

        assert!(matches!(
            build_map(&document, &MapOptions::default()),
            Err(WebMapError::MissingSpatialReference)
        ));
    }
}
