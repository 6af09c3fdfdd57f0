//! outage_calplot
//!
//! Yearly calendar heatmaps of failure counts, one panel per system plus an
//! aggregate panel, with today's cell framed. Pairs with the `outage-calplot`
//! CLI.
//!
//! ### Features
//! - Dense week × weekday grids per facet, zero-filled, same-day counts summed
//! - Highlight box for today, compensated for the gap between cells
//! - Month and weekday names from an explicit locale
//! - Facet planning (titles, rows, canvas size) and SVG/PNG rendering
//! - Observations from CSV/JSON files or an ArcGIS feature layer
//!
//! ### Example
//! ```no_run
//! use chrono::NaiveDate;
//! use outage_calplot::{PlotConfig, pipeline, storage, viz};
//!
//! let config = PlotConfig::default();
//! let observations = storage::load_csv("failures.csv")?;
//! let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let figure = pipeline::build_figure(&observations, &config, config.axis_labels()?, Some(today), 2024)?;
//! viz::render(&figure.plan, &figure.grids, figure.highlight.as_ref(), &config, "failures.svg")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod grid;
pub mod highlight;
pub mod labels;
pub mod layout;
pub mod models;
pub mod pipeline;
pub mod source;
pub mod stats;
pub mod storage;
pub mod viz;
pub mod viz_plotters_adapter;

pub use config::PlotConfig;
pub use error::{CalplotError, Result};
pub use grid::{CalendarGrid, build_grid, week_of_year};
pub use highlight::{Highlighter, compute_highlight};
pub use models::{FacetFilter, HighlightBox, LayoutPlan, Observation};
