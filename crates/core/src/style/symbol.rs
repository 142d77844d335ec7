use tracing::debug;

use super::{Color, Image, Stroke, Style, not_implemented};
use crate::esri::{EsriSymbol, FillStyle, LineStyle, MarkerStyle, SymbolType};

/// Picture marker images are assumed to be this many pixels square.
const PICTURE_MARKER_SIZE: f64 = 64.0;

const DEFAULT_LINE_WIDTH: f64 = 1.0;
const DEFAULT_MARKER_SIZE: f64 = 8.0;

/// Creates a style from an ESRI symbol, or `None` for unsupported symbols.
pub fn style_from_symbol(symbol: &EsriSymbol) -> Option<Style> {
    match symbol.symbol_type() {
        Some(SymbolType::PictureMarker) => style_from_picture_marker(symbol),
        Some(SymbolType::SimpleLine) => style_from_simple_line(symbol),
        Some(SymbolType::SimpleFill) => style_from_simple_fill(symbol),
        Some(SymbolType::SimpleMarker) => style_from_simple_marker(symbol),
        None => {
            not_implemented(&symbol.kind);
            None
        }
    }
}

fn style_from_picture_marker(symbol: &EsriSymbol) -> Option<Style> {
    let src = match (&symbol.content_type, &symbol.image_data, &symbol.url) {
        (Some(content_type), Some(image_data), _) => {
            format!("data:{content_type};base64,{image_data}")
        }
        (_, _, Some(url)) => url.clone(),
        _ => {
            not_implemented("esriPMS without imageData or url");
            return None;
        }
    };

    // The icon's natural size isn't known until it loads, so scale against the
    // assumed size and average the two axes.
    let width = symbol.width.unwrap_or(PICTURE_MARKER_SIZE);
    let height = symbol.height.unwrap_or(PICTURE_MARKER_SIZE);
    let scale = (width / PICTURE_MARKER_SIZE + height / PICTURE_MARKER_SIZE) / 2.0;

    Some(Style::default().with_image(Image::Icon { src, scale }))
}

fn style_from_simple_line(symbol: &EsriSymbol) -> Option<Style> {
    match symbol.style_name().parse::<LineStyle>() {
        Ok(line_style) => Some(Style::default().with_stroke(line_stroke(symbol, line_style))),
        Err(_) => {
            not_implemented(symbol.style_name());
            None
        }
    }
}

fn style_from_simple_fill(symbol: &EsriSymbol) -> Option<Style> {
    let style = match symbol.style_name().parse::<FillStyle>() {
        Ok(FillStyle::Solid) => match symbol.color {
            Some(color) => Style::default().with_fill(Color::from_esri(color)),
            None => Style::default(),
        },
        Ok(FillStyle::Null) => Style::default(),
        Err(_) => {
            not_implemented(symbol.style_name());
            return None;
        }
    };

    Some(style.with_stroke(outline_stroke(symbol)))
}

fn style_from_simple_marker(symbol: &EsriSymbol) -> Option<Style> {
    match symbol.style_name().parse::<MarkerStyle>() {
        Ok(MarkerStyle::Circle) => {
            let radius = symbol.size.unwrap_or(DEFAULT_MARKER_SIZE) / 2.0;
            Some(Style::default().with_image(Image::Circle {
                radius,
                fill: symbol.color.map(|color| super::Fill {
                    color: Color::from_esri(color),
                }),
                stroke: outline_stroke(symbol),
            }))
        }
        Err(_) => {
            not_implemented(symbol.style_name());
            None
        }
    }
}

/// A line symbol with no colour draws nothing.
fn line_stroke(symbol: &EsriSymbol, line_style: LineStyle) -> Option<Stroke> {
    if line_style == LineStyle::Null {
        return None;
    }

    let color = Color::from_esri(symbol.color?);
    let width = symbol.width.unwrap_or(DEFAULT_LINE_WIDTH);
    let line_dash = line_style
        .dash_pattern()
        .map(|pattern| pattern.iter().map(|step| step * width).collect());

    Some(Stroke {
        color,
        width,
        line_dash,
    })
}

fn outline_stroke(symbol: &EsriSymbol) -> Option<Stroke> {
    let outline = symbol.outline.as_deref()?;
    let line_style = match outline.style_name() {
        "" => LineStyle::Solid,
        name => match name.parse::<LineStyle>() {
            Ok(line_style) => line_style,
            Err(_) => {
                debug!("{name}: drawing outline as solid");
                LineStyle::Solid
            }
        },
    };
    line_stroke(outline, line_style)
}
