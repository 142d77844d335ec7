use serde_json::Value;
use tracing::debug;

use super::{Color, Stroke, Style, not_implemented, style_from_symbol};
use crate::esri::{
    ClassBreakInfo, DrawingInfo, EsriSymbol, Renderer, RendererType, VisualVariable,
    VisualVariableType,
};
use crate::feature::Attributes;

/// Per-layer style selection, resolved once from the renderer and evaluated
/// per feature.
#[derive(Clone, Debug, PartialEq)]
pub enum LayerStyle {
    Static(Style),
    UniqueValue(UniqueValueStyle),
    ClassBreaks(ClassBreaksStyle),
}

impl LayerStyle {
    pub fn style_for(&self, attributes: &Attributes) -> Option<&Style> {
        match self {
            LayerStyle::Static(style) => Some(style),
            LayerStyle::UniqueValue(unique) => unique.style_for(attributes),
            LayerStyle::ClassBreaks(breaks) => breaks.style_for(attributes),
        }
    }
}

/// Creates a layer style from a layer's drawing info.
pub fn style_from_drawing_info(drawing_info: &DrawingInfo) -> Option<LayerStyle> {
    if !drawing_info.fixed_symbols {
        not_implemented("Non-fixed symbols");
        return None;
    }

    let Some(renderer) = &drawing_info.renderer else {
        not_implemented("Drawing info without a renderer");
        return None;
    };

    match renderer.renderer_type() {
        Some(RendererType::Simple) => {
            style_from_optional_symbol(renderer.symbol.as_ref()).map(LayerStyle::Static)
        }
        Some(RendererType::UniqueValue) => {
            Some(LayerStyle::UniqueValue(UniqueValueStyle::new(renderer)))
        }
        Some(RendererType::ClassBreaks) => {
            Some(LayerStyle::ClassBreaks(ClassBreaksStyle::new(renderer)))
        }
        None => {
            not_implemented(&renderer.kind);
            None
        }
    }
}

fn style_from_optional_symbol(symbol: Option<&EsriSymbol>) -> Option<Style> {
    symbol.and_then(style_from_symbol)
}

#[derive(Clone, Debug, PartialEq)]
pub struct UniqueValueStyle {
    field: Option<String>,
    default: Option<Style>,
    values: Vec<(Value, Option<Style>)>,
}

impl UniqueValueStyle {
    fn new(renderer: &Renderer) -> Self {
        Self {
            field: renderer.field1.clone(),
            default: style_from_optional_symbol(renderer.default_symbol.as_ref()),
            values: renderer
                .unique_value_infos
                .iter()
                .map(|info| {
                    (
                        info.value.clone(),
                        style_from_optional_symbol(info.symbol.as_ref()),
                    )
                })
                .collect(),
        }
    }

    /// First matching value wins; no match falls back to the default symbol.
    pub fn style_for(&self, attributes: &Attributes) -> Option<&Style> {
        let null = Value::Null;
        let value = self
            .field
            .as_deref()
            .and_then(|field| attributes.get(field))
            .unwrap_or(&null);

        match self.values.iter().find(|(expected, _)| loosely_equal(value, expected)) {
            Some((_, style)) => style.as_ref(),
            None => self.default.as_ref(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassBreaksStyle {
    default: Option<Style>,
    color_ramp: Option<ColorRamp>,
    field: Option<String>,
    breaks: Vec<ClassBreak>,
}

/// Styles precomputed for each stop of a `colorInfo` visual variable.
#[derive(Clone, Debug, PartialEq)]
struct ColorRamp {
    field: String,
    stops: Vec<(f64, Style)>,
}

#[derive(Clone, Debug, PartialEq)]
struct ClassBreak {
    min: Option<f64>,
    max: f64,
    style: Option<Style>,
}

impl ClassBreaksStyle {
    fn new(renderer: &Renderer) -> Self {
        let breaks = class_breaks(renderer);

        // Stops only recolour the fill; the outline comes from the first class.
        let break_stroke = breaks
            .first()
            .and_then(|class| class.style.as_ref())
            .and_then(|style| style.stroke.clone());

        let color_ramp = renderer
            .visual_variables
            .iter()
            .find(|vv| vv.variable_type() == Some(VisualVariableType::ColorInfo))
            .and_then(|vv| build_color_ramp(vv, break_stroke.as_ref()));

        for vv in &renderer.visual_variables {
            if vv.variable_type() != Some(VisualVariableType::ColorInfo) {
                debug!("Ignoring {} visual variable", vv.kind);
            }
        }

        Self {
            default: style_from_optional_symbol(renderer.default_symbol.as_ref()),
            color_ramp,
            field: renderer.field.clone(),
            breaks,
        }
    }

    pub fn style_for(&self, attributes: &Attributes) -> Option<&Style> {
        let selected = match &self.color_ramp {
            Some(ramp) => ramp.style_for(attributes),
            None => self.class_style_for(attributes),
        };
        selected.or(self.default.as_ref())
    }

    fn class_style_for(&self, attributes: &Attributes) -> Option<&Style> {
        let value = numeric_attribute(attributes, self.field.as_deref()?)?;
        self.breaks
            .iter()
            .enumerate()
            .find(|(i, class)| {
                let above_min = match class.min {
                    Some(min) if *i == 0 => value >= min,
                    Some(min) => value > min,
                    None => true,
                };
                above_min && value <= class.max
            })
            .and_then(|(_, class)| class.style.as_ref())
    }
}

impl ColorRamp {
    /// Assumes stops are sorted by value. A value below the first stop takes the
    /// first stop's colour, one at or above the last stop's value the last.
    fn style_for(&self, attributes: &Attributes) -> Option<&Style> {
        let value = numeric_attribute(attributes, &self.field)?;
        let last = self.stops.len().checked_sub(1)?;

        (0..=last)
            .find(|&j| {
                (j == 0 || value >= self.stops[j - 1].0) && (j == last || value < self.stops[j].0)
            })
            .map(|j| &self.stops[j].1)
    }
}

fn build_color_ramp(variable: &VisualVariable, stroke: Option<&Stroke>) -> Option<ColorRamp> {
    let Some(field) = variable.field.clone() else {
        not_implemented("colorInfo without a field");
        return None;
    };

    let stops = variable
        .stops
        .iter()
        .map(|stop| {
            let style = match stop.color {
                Some(color) => Style::default().with_fill(Color::from_esri(color)),
                None => Style::default(),
            };
            (stop.value, style.with_stroke(stroke.cloned()))
        })
        .collect();

    Some(ColorRamp { field, stops })
}

/// Lower bounds default to the previous class's maximum, then the renderer's
/// `minValue`.
fn class_breaks(renderer: &Renderer) -> Vec<ClassBreak> {
    let mut previous_max = renderer.min_value;
    renderer
        .class_break_infos
        .iter()
        .map(|info: &ClassBreakInfo| {
            let class = ClassBreak {
                min: info.class_min_value.or(previous_max),
                max: info.class_max_value,
                style: style_from_optional_symbol(info.symbol.as_ref()),
            };
            previous_max = Some(info.class_max_value);
            class
        })
        .collect()
}

fn numeric_attribute(attributes: &Attributes, field: &str) -> Option<f64> {
    attributes.get(field).and_then(as_number)
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Attribute values are compared the way the portal's own clients do: unique
/// values are often stored as strings even for numeric fields.
fn loosely_equal(attribute: &Value, expected: &Value) -> bool {
    match (attribute, expected) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::String(a), Value::String(b)) => a == b,
        _ => match (as_number(attribute), as_number(expected)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn drawing_info(value: Value) -> DrawingInfo {
        serde_json::from_value(value).unwrap()
    }

    fn attributes(value: Value) -> Attributes {
        match value {
            Value::Object(map) => map,
            _ => panic!("Expected object"),
        }
    }

    fn fill_symbol(rgba: [u8; 4]) -> Value {
        json!({
            "type": "esriSFS",
            "style": "esriSFSSolid",
            "color": rgba,
            "outline": { "type": "esriSLS", "style": "esriSLSSolid", "color": [0, 0, 0, 255], "width": 1 }
        })
    }

    fn fill_color(style: Option<&Style>) -> Option<(u8, u8, u8)> {
        style
            .and_then(|s| s.fill.as_ref())
            .map(|f| (f.color.red, f.color.green, f.color.blue))
    }

    #[test]
    fn test_non_fixed_symbols_not_implemented() {
        let info = drawing_info(json!({
            "renderer": { "type": "simple", "symbol": fill_symbol([1, 2, 3, 255]) }
        }));
        assert!(style_from_drawing_info(&info).is_none());
    }

    #[test]
    fn test_simple_renderer() {
        let info = drawing_info(json!({
            "fixedSymbols": true,
            "renderer": { "type": "simple", "symbol": fill_symbol([1, 2, 3, 255]) }
        }));
        let style = style_from_drawing_info(&info).unwrap();

        assert!(matches!(style, LayerStyle::Static(_)));
        assert_eq!(fill_color(style.style_for(&Attributes::new())), Some((1, 2, 3)));
    }

    #[test]
    fn test_unknown_renderer_type() {
        let info = drawing_info(json!({
            "fixedSymbols": true,
            "renderer": { "type": "heatmap" }
        }));
        assert!(style_from_drawing_info(&info).is_none());
    }

    #[test]
    fn test_unique_value_renderer() {
        let info = drawing_info(json!({
            "fixedSymbols": true,
            "renderer": {
                "type": "uniqueValue",
                "field1": "ZONE",
                "defaultSymbol": fill_symbol([9, 9, 9, 255]),
                "uniqueValueInfos": [
                    { "value": "R1", "symbol": fill_symbol([255, 0, 0, 255]) },
                    { "value": "2", "symbol": fill_symbol([0, 255, 0, 255]) },
                    { "value": "C1", "symbol": { "type": "esriTS" } }
                ]
            }
        }));
        let style = style_from_drawing_info(&info).unwrap();

        let zone = |v: Value| attributes(json!({ "ZONE": v }));
        assert_eq!(fill_color(style.style_for(&zone(json!("R1")))), Some((255, 0, 0)));
        // numeric attribute against a string unique value
        assert_eq!(fill_color(style.style_for(&zone(json!(2)))), Some((0, 255, 0)));
        assert_eq!(fill_color(style.style_for(&zone(json!("X")))), Some((9, 9, 9)));
        assert_eq!(fill_color(style.style_for(&Attributes::new())), Some((9, 9, 9)));
        // matched value with an unsupported symbol draws nothing
        assert_eq!(style.style_for(&zone(json!("C1"))), None);
    }

    #[test]
    fn test_class_breaks_color_info() {
        let info = drawing_info(json!({
            "fixedSymbols": true,
            "renderer": {
                "type": "classBreaks",
                "field": "POP",
                "defaultSymbol": fill_symbol([9, 9, 9, 255]),
                "classBreakInfos": [
                    { "classMaxValue": 1000, "symbol": fill_symbol([1, 1, 1, 255]) }
                ],
                "visualVariables": [{
                    "type": "colorInfo",
                    "field": "DENSITY",
                    "stops": [
                        { "value": 10, "color": [255, 255, 255, 255] },
                        { "value": 20, "color": [255, 128, 0, 255] },
                        { "value": 30, "color": [255, 0, 0, 255] }
                    ]
                }]
            }
        }));
        let style = style_from_drawing_info(&info).unwrap();
        let density = |v: Value| attributes(json!({ "DENSITY": v }));

        assert_eq!(fill_color(style.style_for(&density(json!(5)))), Some((255, 255, 255)));
        assert_eq!(fill_color(style.style_for(&density(json!(10)))), Some((255, 128, 0)));
        assert_eq!(fill_color(style.style_for(&density(json!(25)))), Some((255, 0, 0)));
        assert_eq!(fill_color(style.style_for(&density(json!(99)))), Some((255, 0, 0)));
        assert_eq!(fill_color(style.style_for(&density(Value::Null))), Some((9, 9, 9)));

        // stroke is borrowed from the first class break
        let stroke = style.style_for(&density(json!(5))).unwrap().stroke.as_ref().unwrap();
        assert_eq!(stroke.color, Color::BLACK);
    }

    #[test]
    fn test_class_breaks_ranges() {
        let info = drawing_info(json!({
            "fixedSymbols": true,
            "renderer": {
                "type": "classBreaks",
                "field": "POP",
                "minValue": 0,
                "classBreakInfos": [
                    { "classMaxValue": 100, "symbol": fill_symbol([1, 0, 0, 255]) },
                    { "classMaxValue": 500, "symbol": fill_symbol([2, 0, 0, 255]) }
                ]
            }
        }));
        let style = style_from_drawing_info(&info).unwrap();
        let pop = |v: Value| attributes(json!({ "POP": v }));

        assert_eq!(fill_color(style.style_for(&pop(json!(0)))), Some((1, 0, 0)));
        assert_eq!(fill_color(style.style_for(&pop(json!(100)))), Some((1, 0, 0)));
        assert_eq!(fill_color(style.style_for(&pop(json!("100.5")))), Some((2, 0, 0)));
        assert_eq!(style.style_for(&pop(json!(501))), None);
        assert_eq!(style.style_for(&pop(json!(-1))), None);
    }

    #[test]
    fn test_loosely_equal() {
        assert!(loosely_equal(&json!("abc"), &json!("abc")));
        assert!(loosely_equal(&json!(1), &json!("1")));
        assert!(loosely_equal(&json!(1.0), &json!(1)));
        assert!(!loosely_equal(&json!("abc"), &json!("ABC")));
        assert!(!loosely_equal(&Value::Null, &json!("")));
    }
}
