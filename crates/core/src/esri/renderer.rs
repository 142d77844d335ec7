use serde::Deserialize;
use strum::{Display, EnumString};

use super::{EsriColor, EsriSymbol};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingInfo {
    #[serde(default)]
    pub fixed_symbols: bool,
    #[serde(default)]
    pub renderer: Option<Renderer>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Renderer {
    #[serde(rename = "type", default)]
    pub kind: String,

    // simple
    #[serde(default)]
    pub symbol: Option<EsriSymbol>,

    #[serde(default)]
    pub default_symbol: Option<EsriSymbol>,

    // uniqueValue
    #[serde(default)]
    pub field1: Option<String>,
    #[serde(default)]
    pub unique_value_infos: Vec<UniqueValueInfo>,

    // classBreaks
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub class_break_infos: Vec<ClassBreakInfo>,
    #[serde(default)]
    pub visual_variables: Vec<VisualVariable>,
}

impl Renderer {
    pub fn renderer_type(&self) -> Option<RendererType> {
        self.kind.parse().ok()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(serialize_all = "camelCase")]
pub enum RendererType {
    Simple,
    UniqueValue,
    ClassBreaks,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UniqueValueInfo {
    /// Usually a string even when the field is numeric.
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub symbol: Option<EsriSymbol>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassBreakInfo {
    #[serde(default)]
    pub class_min_value: Option<f64>,
    pub class_max_value: f64,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub symbol: Option<EsriSymbol>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct VisualVariable {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub stops: Vec<ColorStop>,
}

impl VisualVariable {
    pub fn variable_type(&self) -> Option<VisualVariableType> {
        self.kind.parse().ok()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(serialize_all = "camelCase")]
pub enum VisualVariableType {
    ColorInfo,
    SizeInfo,
    TransparencyInfo,
    RotationInfo,
}

/// A stop of a visual variable. Only `colorInfo` stops carry a colour.
#[derive(Clone, Debug, Deserialize)]
pub struct ColorStop {
    pub value: f64,
    #[serde(default)]
    pub color: Option<EsriColor>,
    #[serde(default)]
    pub label: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_renderer_type_parse() {
        assert_eq!("simple".parse::<RendererType>(), Ok(RendererType::Simple));
        assert_eq!("uniqueValue".parse::<RendererType>(), Ok(RendererType::UniqueValue));
        assert_eq!("classBreaks".parse::<RendererType>(), Ok(RendererType::ClassBreaks));
        assert!("heatmap".parse::<RendererType>().is_err());
    }

    #[test]
    fn test_class_breaks_with_visual_variables() {
        let renderer: Renderer = serde_json::from_value(json!({
            "type": "classBreaks",
            "field": "POP",
            "classBreakInfos": [
                { "classMaxValue": 1000, "symbol": { "type": "esriSFS", "style": "esriSFSSolid" } }
            ],
            "visualVariables": [
                { "type": "sizeInfo", "field": "POP", "minSize": 4, "maxSize": 30 },
                {
                    "type": "colorInfo",
                    "field": "POP",
                    "stops": [
                        { "value": 10, "color": [255, 255, 255, 255] },
                        { "value": 100, "color": [255, 0, 0, 255] }
                    ]
                }
            ]
        }))
        .unwrap();

        assert_eq!(renderer.renderer_type(), Some(RendererType::ClassBreaks));
        assert_eq!(renderer.class_break_infos[0].class_min_value, None);
        assert_eq!(
            renderer.visual_variables[0].variable_type(),
            Some(VisualVariableType::SizeInfo)
        );
        let color_info = &renderer.visual_variables[1];
        assert_eq!(color_info.variable_type(), Some(VisualVariableType::ColorInfo));
        assert_eq!(color_info.stops[1].color, Some(EsriColor([255, 0, 0, 255])));
    }
}
