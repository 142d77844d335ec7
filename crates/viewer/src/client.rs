//! JSON handed to the browser: the map model with every feature's style
//! already resolved, and geometries as GeoJSON in the map projection.

use agol_webmap_core::prelude::*;
use geojson::{Feature, FeatureCollection, Geometry};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ClientMap {
    pub projection: Projection,
    pub basemaps: Vec<ClientBasemap>,
    pub layers: Vec<ClientLayer>,
    pub view: ClientView,
    pub highlight: Style,
}

#[derive(Debug, Serialize)]
pub struct ClientBasemap {
    pub title: Option<String>,
    pub url: String,
    pub opacity: f64,
    pub visible: bool,
}

#[derive(Debug, Serialize)]
pub struct ClientLayer {
    pub id: Option<String>,
    pub title: String,
    pub opacity: f64,
    pub visible: bool,
    pub features: FeatureCollection,
}

#[derive(Debug, Serialize)]
pub struct ClientView {
    /// `[minx, miny, maxx, maxy]`
    pub extent: Option<[f64; 4]>,
    pub center: Option<[f64; 2]>,
    pub zoom: f64,
}

impl ClientMap {
    pub fn from_model(map: &MapModel) -> Self {
        Self {
            projection: map.projection,
            basemaps: map
                .basemaps
                .iter()
                .map(|basemap| ClientBasemap {
                    title: basemap.title.clone(),
                    url: basemap.url.clone(),
                    opacity: basemap.opacity,
                    visible: basemap.visible,
                })
                .collect(),
            layers: map.layers.iter().map(client_layer).collect(),
            view: ClientView {
                extent: map
                    .view
                    .extent
                    .map(|rect| [rect.min().x, rect.min().y, rect.max().x, rect.max().y]),
                center: map.view.center.map(|c| [c.x, c.y]),
                zoom: map.view.zoom,
            },
            highlight: map.highlight.clone(),
        }
    }
}

fn client_layer(layer: &VectorLayer) -> ClientLayer {
    let features = layer
        .features
        .iter()
        .map(|feature| {
            // Attributes stay on the server; popups are built there.
            let mut properties = serde_json::Map::new();
            properties.insert(
                "style".to_string(),
                serde_json::to_value(layer.style_for(feature)).unwrap_or_default(),
            );

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(geojson::Value::from(&feature.geometry))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    ClientLayer {
        id: layer.id.clone(),
        title: layer.title.clone(),
        opacity: layer.opacity,
        visible: layer.visible,
        features: FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
    }
}
