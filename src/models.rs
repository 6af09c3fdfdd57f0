use crate::error::{CalplotError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One recorded failure count: `quantity` failures of system `facet` on `date`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub facet: String,
    pub quantity: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, facet: impl Into<String>, quantity: f64) -> Self {
        Self {
            date,
            facet: facet.into(),
            quantity,
        }
    }
}

/// Parse a quantity cell from a text source (CSV). Empty cells are `None`.
pub fn parse_quantity(raw: &str) -> Result<Option<f64>> {
    let t = raw.trim();
    if t.is_empty() {
        return Ok(None);
    }
    t.parse::<f64>()
        .map(Some)
        .map_err(|_| CalplotError::DataConsistency(format!("quantity `{t}` is not a number")))
}

/// Read a quantity from a JSON value: numbers and numeric strings are
/// accepted, `null` means missing, anything else is inconsistent data.
pub fn quantity_from_json(v: &Value) -> Result<Option<f64>> {
    match v {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_f64().map(Some).ok_or_else(|| {
            CalplotError::DataConsistency(format!("quantity {n} is not representable"))
        }),
        Value::String(s) => parse_quantity(s),
        other => Err(CalplotError::DataConsistency(format!(
            "quantity {other} is not a number"
        ))),
    }
}

/// Which observations feed a grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacetFilter {
    /// Every observation (the aggregate panel).
    All,
    /// Facet label equal to the given string.
    Exact(String),
    /// Facet label containing the given fragment. Useful when one record names
    /// several systems, e.g. `"VPS, ESPBI"`.
    Contains(String),
}

impl FacetFilter {
    pub fn matches(&self, label: &str) -> bool {
        match self {
            FacetFilter::All => true,
            FacetFilter::Exact(name) => label == name,
            FacetFilter::Contains(fragment) => label.contains(fragment.as_str()),
        }
    }
}

/// A heatmap panel: one system, or the synthetic aggregate of all systems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    pub name: String,
    pub display_title: String,
    pub row_index: usize,
    pub is_aggregate: bool,
}

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const GREY: Rgba = Rgba::rgb(128, 128, 128);
    pub const LIGHT_STEEL_BLUE: Rgba = Rgba::rgb(176, 196, 222);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

/// Outline styling handed to the renderer along with a shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Rgba,
    pub width: u32,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            color: Rgba::BLACK,
            width: 3,
        }
    }
}

/// Rectangle in grid coordinates (one unit per cell; x = week, y = weekday)
/// framing the current day's cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HighlightBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub stroke: Stroke,
}

impl HighlightBox {
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }
}

/// Tick text replacing the numeric week/weekday ticks of one panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisOverride {
    pub row_index: usize,
    pub x_ticktext: Vec<String>,
    pub y_ticktext: Vec<String>,
}

/// Everything needed to lay the panels out on one canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutPlan {
    pub facet_count: usize,
    pub canvas_height: u32,
    pub canvas_width: u32,
    pub title: String,
    /// Sorted by `row_index`.
    pub facets: Vec<Facet>,
    pub axis_overrides: Vec<AxisOverride>,
}
