//! Renderer-neutral styles and the conversions from ESRI symbology.

mod renderer;
mod symbol;

use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};

use crate::error::{Result, WebMapError};
use crate::esri::EsriColor;

pub use renderer::{ClassBreaksStyle, LayerStyle, UniqueValueStyle, style_from_drawing_info};
pub use symbol::style_from_symbol;

/// 8-bit RGB with a fractional alpha, serialised as `[r, g, b, a]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0, 0, 0, 1.0);

    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// `[r, g, b, a]` (0-255) => `[r, g, b, a / 255]`
    pub fn from_esri(color: EsriColor) -> Self {
        let [red, green, blue, alpha] = color.0;
        Self::rgba(red, green, blue, f32::from(alpha) / 255.0)
    }

    /// Parses `#rrggbb` or `#rgb` into an opaque colour.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let rgb: palette::Srgb<u8> = hex
            .parse()
            .map_err(|err| WebMapError::InvalidColor(format!("{hex}: {err}")))?;
        Ok(Self::rgba(rgb.red, rgb.green, rgb.blue, 1.0))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(4)?;
        tuple.serialize_element(&self.red)?;
        tuple.serialize_element(&self.green)?;
        tuple.serialize_element(&self.blue)?;
        tuple.serialize_element(&self.alpha)?;
        tuple.end()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_dash: Option<Vec<f64>>,
}

impl Stroke {
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            line_dash: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Fill {
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Image {
    Icon {
        src: String,
        scale: f64,
    },
    Circle {
        radius: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        fill: Option<Fill>,
        #[serde(skip_serializing_if = "Option::is_none")]
        stroke: Option<Stroke>,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Stroke>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
}

impl Style {
    pub const HIGHLIGHT_RADIUS: f64 = 8.0;
    pub const HIGHLIGHT_WIDTH: f64 = 3.0;

    /// Draws nothing.
    pub fn transparent() -> Self {
        Self::default()
    }

    /// Pointer-hover style: a ring for points, a thick stroke for everything else.
    pub fn highlight(color: Color) -> Self {
        let stroke = Stroke::solid(color, Self::HIGHLIGHT_WIDTH);
        Self {
            fill: None,
            stroke: Some(stroke.clone()),
            image: Some(Image::Circle {
                radius: Self::HIGHLIGHT_RADIUS,
                fill: None,
                stroke: Some(stroke),
            }),
        }
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(Fill { color });
        self
    }

    pub fn with_stroke(mut self, stroke: Option<Stroke>) -> Self {
        self.stroke = stroke;
        self
    }

    pub fn with_image(mut self, image: Image) -> Self {
        self.image = Some(image);
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.fill.is_none() && self.stroke.is_none() && self.image.is_none()
    }
}

pub(crate) fn not_implemented(what: &str) {
    tracing::warn!("{what}: not implemented");
}
