//! # agol-webmap-core
//!
//! Converts ArcGIS Online web-map documents into a renderer-neutral map model.
//!
//! The pipeline is a single pass:
//!
//! - **Fetch**: [`portal::PortalClient`] downloads the item data of a web map
//! - **Symbology**: ESRI symbols and renderers become [`style::Style`] values and
//!   per-feature [`style::LayerStyle`] selectors
//! - **Features**: ESRI geometries become [`geo`] geometries with their attributes
//! - **Map**: [`map::build_map`] assembles basemaps, vector layers and the view
//! - **Popups**: [`popup::build_popups`] turns a click into attribute tables
//!
//! ## Example
//!
//! ```
//! use agol_webmap_core::prelude::*;
//!
//! let document: WebMapDocument = serde_json::from_value(serde_json::json!({
//!     "spatialReference": { "wkid": 102100, "latestWkid": 3857 },
//!     "baseMap": { "baseMapLayers": [] },
//!     "operationalLayers": []
//! }))
//! .unwrap();
//!
//! let map = build_map(&document, &MapOptions::default()).unwrap();
//! assert_eq!(map.projection.to_string(), "EPSG:3857");
//! ```

pub mod error;
pub mod esri;
pub mod feature;
pub mod map;
pub mod popup;
pub mod portal;
pub mod style;

pub mod prelude {
    pub use crate::error::{Result, WebMapError};
    pub use crate::esri::{Projection, WebMapDocument};
    pub use crate::feature::{Attributes, MapFeature};
    pub use crate::map::{FeatureHit, MapModel, MapOptions, TileLayer, VectorLayer, View, build_map};
    pub use crate::popup::{PlacedPopup, Popup, build_popups};
    pub use crate::portal::{FileSource, PortalClient, WebMapSource};
    pub use crate::style::{Color, Fill, Image, LayerStyle, Stroke, Style};
}

pub use prelude::*;
