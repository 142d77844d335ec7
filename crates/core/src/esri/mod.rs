//! Serde model of the web-map item data served by the portal.
//!
//! Only the parts the converter reads are modelled; everything else in the
//! document is ignored. Enumerated strings stay as raw `String`s on the wire
//! types and are parsed on demand so an unsupported value can still be named
//! in log output.

mod document;
mod feature_set;
mod renderer;
mod symbol;

pub use document::{
    BaseMap, BaseMapLayer, Envelope, FeatureCollection, FeatureCollectionLayer, Field,
    LayerDefinition, OperationalLayer, PortalError, PortalErrorEnvelope, Projection,
    SpatialReference, WebMapDocument,
};
pub use feature_set::{EsriFeature, EsriGeometry, FeatureSet, GeometryType};
pub use renderer::{
    ClassBreakInfo, ColorStop, DrawingInfo, Renderer, RendererType, UniqueValueInfo,
    VisualVariable, VisualVariableType,
};
pub use symbol::{EsriColor, EsriSymbol, FillStyle, LineStyle, MarkerStyle, SymbolType};

pub(crate) fn default_opacity() -> f64 {
    1.0
}

pub(crate) fn default_visibility() -> bool {
    true
}
