//! Attribute popups for clicked features.
//!
//! Each popup is an HTML fragment: a title bar with a close link followed by a
//! key/value table of the feature's attributes. The browser wraps it in a
//! `div.info` positioned at the click.

use std::fmt::Write;

use geo::Coord;
use serde::Serialize;
use serde_json::Value;

use crate::map::{FeatureHit, MapModel};

/// Successive popups for one click are cascaded by this many pixels.
pub const POPUP_OFFSET: f64 = 20.0;

/// Escapes text for use in element content and attribute values.
pub fn encode_html(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => encoded.push_str("&amp;"),
            '<' => encoded.push_str("&lt;"),
            '>' => encoded.push_str("&gt;"),
            '"' => encoded.push_str("&quot;"),
            '\'' => encoded.push_str("&#39;"),
            c => encoded.push(c),
        }
    }
    encoded
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellAlign {
    /// Text fields.
    Left,
    /// Everything else, mostly numbers.
    Right,
}

impl CellAlign {
    pub fn class(&self) -> &'static str {
        match self {
            CellAlign::Left => "left",
            CellAlign::Right => "right",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PopupRow {
    pub key: String,
    pub value: String,
    pub align: CellAlign,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Popup {
    pub id: u32,
    pub title: String,
    pub rows: Vec<PopupRow>,
}

impl Popup {
    pub fn from_hit(id: u32, hit: &FeatureHit<'_>) -> Self {
        let rows = hit
            .feature
            .attributes
            .iter()
            .map(|(key, value)| {
                let field = hit.layer.field(key);
                PopupRow {
                    key: field.map_or(key.as_str(), |f| f.display_name()).to_owned(),
                    value: attribute_text(value),
                    align: match field {
                        Some(f) if f.is_string() => CellAlign::Left,
                        _ => CellAlign::Right,
                    },
                }
            })
            .collect();

        Self {
            id,
            title: hit.layer.title.clone(),
            rows,
        }
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            "<div class=\"titlebar\">{}<a class=\"close\" href=\"#\" title=\"Click to close\" \
             onclick=\"removeElementById({}); return false;\">Close</a></div>\
             <table><tr><th>Key</th><th>Value</th></tr>",
            encode_html(&self.title),
            self.id
        );
        for row in &self.rows {
            let _ = write!(
                html,
                "<tr><th>{}</th><td class=\"{}\">{}</td></tr>",
                encode_html(&row.key),
                row.align.class(),
                encode_html(&row.value)
            );
        }
        html.push_str("</table>");
        html
    }
}

/// A rendered popup and where to put it, in pixels from the page origin.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlacedPopup {
    pub id: u32,
    pub left: f64,
    pub top: f64,
    pub html: String,
}

/// One popup per feature at `coord`, cascading down and right from `pixel`.
/// Ids restart at 1 for every click.
pub fn build_popups(
    map: &MapModel,
    pixel: [f64; 2],
    coord: Coord<f64>,
    tolerance: f64,
) -> Vec<PlacedPopup> {
    map.features_at(coord, tolerance)
        .iter()
        .zip(1u32..)
        .map(|(hit, id)| {
            let offset = f64::from(id - 1) * POPUP_OFFSET;
            PlacedPopup {
                id,
                left: pixel[0] + offset,
                top: pixel[1] + offset,
                html: Popup::from_hit(id, hit).to_html(),
            }
        })
        .collect()
}

fn attribute_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
