use serde::Deserialize;
use strum::{Display, EnumString};

/// A symbol as it appears in a renderer. `kind` is the raw `type` string.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsriSymbol {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub color: Option<EsriColor>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default)]
    pub outline: Option<Box<EsriSymbol>>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub image_data: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl EsriSymbol {
    pub fn symbol_type(&self) -> Option<SymbolType> {
        self.kind.parse().ok()
    }

    /// Style string, or `""` when the symbol carries none.
    pub fn style_name(&self) -> &str {
        self.style.as_deref().unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumString, Display)]
pub enum SymbolType {
    #[strum(serialize = "esriPMS")]
    PictureMarker,
    #[strum(serialize = "esriSLS")]
    SimpleLine,
    #[strum(serialize = "esriSFS")]
    SimpleFill,
    #[strum(serialize = "esriSMS")]
    SimpleMarker,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumString, Display)]
pub enum LineStyle {
    #[strum(serialize = "esriSLSSolid")]
    Solid,
    #[strum(serialize = "esriSLSDash")]
    Dash,
    #[strum(serialize = "esriSLSDot")]
    Dot,
    #[strum(serialize = "esriSLSDashDot")]
    DashDot,
    #[strum(serialize = "esriSLSDashDotDot")]
    DashDotDot,
    #[strum(serialize = "esriSLSNull")]
    Null,
}

impl LineStyle {
    /// Dash pattern in multiples of the stroke width; `None` for continuous lines.
    pub fn dash_pattern(&self) -> Option<&'static [f64]> {
        match self {
            LineStyle::Solid | LineStyle::Null => None,
            LineStyle::Dash => Some(&[4.0, 3.0]),
            LineStyle::Dot => Some(&[1.0, 3.0]),
            LineStyle::DashDot => Some(&[8.0, 3.0, 1.0, 3.0]),
            LineStyle::DashDotDot => Some(&[8.0, 3.0, 1.0, 3.0, 1.0, 3.0]),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumString, Display)]
pub enum FillStyle {
    #[strum(serialize = "esriSFSSolid")]
    Solid,
    #[strum(serialize = "esriSFSNull")]
    Null,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumString, Display)]
pub enum MarkerStyle {
    #[strum(serialize = "esriSMSCircle")]
    Circle,
}

/// `[r, g, b, a]` with every channel in 0-255.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<f64>")]
pub struct EsriColor(pub [u8; 4]);

impl TryFrom<Vec<f64>> for EsriColor {
    type Error = String;

    fn try_from(channels: Vec<f64>) -> Result<Self, Self::Error> {
        let alpha = match channels.len() {
            3 => 255.0,
            4 => channels[3],
            n => return Err(format!("expected 3 or 4 color channels, got {n}")),
        };

        let to_u8 = |v: f64| v.round().clamp(0.0, 255.0) as u8;
        Ok(EsriColor([
            to_u8(channels[0]),
            to_u8(channels[1]),
            to_u8(channels[2]),
            to_u8(alpha),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_symbol_type_parse() {
        assert_eq!("esriPMS".parse::<SymbolType>(), Ok(SymbolType::PictureMarker));
        assert_eq!("esriSFS".parse::<SymbolType>(), Ok(SymbolType::SimpleFill));
        assert!("esriTS".parse::<SymbolType>().is_err());
        assert_eq!(SymbolType::SimpleLine.to_string(), "esriSLS");
    }

    #[test]
    fn test_color_channels() {
        let rgba: EsriColor = serde_json::from_value(json!([255, 0, 0, 128])).unwrap();
        assert_eq!(rgba.0, [255, 0, 0, 128]);

        let rgb: EsriColor = serde_json::from_value(json!([10, 20, 30])).unwrap();
        assert_eq!(rgb.0, [10, 20, 30, 255]);

        assert!(serde_json::from_value::<EsriColor>(json!([1, 2])).is_err());
    }

    #[test]
    fn test_nested_outline() {
        let symbol: EsriSymbol = serde_json::from_value(json!({
            "type": "esriSFS",
            "style": "esriSFSSolid",
            "color": [0, 0, 255, 64],
            "outline": {
                "type": "esriSLS",
                "style": "esriSLSSolid",
                "color": [0, 0, 0, 255],
                "width": 0.75
            }
        }))
        .unwrap();

        assert_eq!(symbol.symbol_type(), Some(SymbolType::SimpleFill));
        let outline = symbol.outline.unwrap();
        assert_eq!(outline.width, Some(0.75));
        assert_eq!(outline.style_name(), "esriSLSSolid");
    }
}
