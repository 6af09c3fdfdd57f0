//! Run configuration: locale, naming, geometry and styling.
//!
//! Values come from [`PlotConfig::default`], optionally overlaid by a JSON file
//! (explicit path, or `<config dir>/outage-calplot/config.json` when present).
//! Missing keys keep their defaults. The CLI overrides single fields on top.

use crate::error::{CalplotError, Result as CoreResult};
use crate::highlight::Highlighter;
use crate::labels::{AxisLabels, ChronoLocale, LabelProvider};
use crate::layout::{FacetNaming, LayoutPlanner};
use crate::models::{Rgba, Stroke};
use crate::source::LayerFields;
use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// POSIX-style locale tag for month/weekday names, e.g. `lt_LT`.
    pub locale: String,
    /// Canvas title.
    pub title: String,
    pub facets: FacetNaming,
    /// Visual gap between cells, in pixels.
    pub cell_gap: f64,
    /// Shrink the highlight box to compensate for the cell gap.
    pub pad_highlight: bool,
    /// Fixed week count for the gap compensation; `null` uses the week
    /// columns of the grid being drawn.
    pub weeks_in_grid: Option<u32>,
    pub row_height: u32,
    pub canvas_width: u32,
    /// Characters kept of each weekday name; `null` keeps full names.
    pub day_name_width: Option<usize>,
    pub highlight: Stroke,
    pub month_line: Stroke,
    pub background: Rgba,
    /// TrueType font used for titles and tick labels.
    pub font_path: Option<PathBuf>,
    /// Feature layer `query` endpoint to read failures from.
    pub layer_url: Option<String>,
    pub layer_fields: LayerFields,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            locale: "lt_LT".into(),
            title: "nEsveikata - Sistemų gedimai".into(),
            facets: FacetNaming::default(),
            cell_gap: 3.0,
            pad_highlight: true,
            weeks_in_grid: None,
            row_height: 270,
            canvas_width: 1350,
            day_name_width: Some(4),
            highlight: Stroke::default(),
            month_line: Stroke {
                color: Rgba::GREY,
                width: 3,
            },
            background: Rgba::LIGHT_STEEL_BLUE,
            font_path: None,
            layer_url: None,
            layer_fields: LayerFields::default(),
        }
    }
}

impl PlotConfig {
    /// Default location of the config file, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("outage-calplot").join("config.json"))
    }

    /// Load from `path`, or from [`PlotConfig::default_path`] when it exists,
    /// or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let candidate = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path().filter(|p| p.exists()),
        };
        let Some(path) = candidate else {
            debug!("no config file, using defaults");
            return Ok(Self::default());
        };
        let text =
            fs::read_to_string(&path).with_context(|| format!("read config {}", path.display()))?;
        let cfg: PlotConfig = serde_json::from_str(&text)
            .with_context(|| format!("parse config {}", path.display()))?;
        cfg.validate()?;
        debug!("loaded config from {}", path.display());
        Ok(cfg)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.row_height == 0 || self.canvas_width == 0 {
            return Err(CalplotError::Configuration(
                "row_height and canvas_width must be positive".into(),
            ));
        }
        if self.weeks_in_grid == Some(0) {
            return Err(CalplotError::Configuration(
                "weeks_in_grid must be positive".into(),
            ));
        }
        if !self.cell_gap.is_finite() || self.cell_gap < 0.0 {
            return Err(CalplotError::Configuration(format!(
                "cell_gap must be a non-negative number, got {}",
                self.cell_gap
            )));
        }
        if self.facets.aggregate_name.trim().is_empty() {
            return Err(CalplotError::Configuration(
                "aggregate facet name must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn label_provider(&self) -> CoreResult<LabelProvider<ChronoLocale>> {
        Ok(LabelProvider::new(ChronoLocale::new(&self.locale)?))
    }

    pub fn axis_labels(&self) -> CoreResult<AxisLabels> {
        self.label_provider()?.axis_labels(self.day_name_width)
    }

    pub fn planner(&self, axis_labels: AxisLabels) -> LayoutPlanner {
        LayoutPlanner {
            naming: self.facets.clone(),
            title: self.title.clone(),
            row_height: self.row_height,
            canvas_width: self.canvas_width,
            axis_labels,
        }
    }

    pub fn highlighter(&self) -> Highlighter {
        Highlighter::new(self.weeks_in_grid, self.highlight)
    }
}
