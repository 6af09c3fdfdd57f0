//! One run: observations in, everything the renderer needs out.

use crate::config::PlotConfig;
use crate::error::Result;
use crate::grid::{CalendarGrid, build_grid};
use crate::labels::AxisLabels;
use crate::layout::facet_labels;
use crate::models::{HighlightBox, LayoutPlan, Observation};
use chrono::NaiveDate;
use log::{debug, info};

/// Planned panels with one grid per facet (same order) and today's box.
#[derive(Debug, Clone)]
pub struct CalendarFigure {
    pub plan: LayoutPlan,
    pub grids: Vec<CalendarGrid>,
    /// `None` when no day was asked to be highlighted.
    pub highlight: Option<HighlightBox>,
}

/// Plan facets, build every grid for `year` and place the highlight on `today`.
///
/// Pass `today = None` to draw without a highlight. A `today` outside `year`
/// is a [`CalplotError::Precondition`](crate::CalplotError::Precondition).
/// Fails on the first error; no partial figure is returned.
pub fn build_figure(
    observations: &[Observation],
    config: &PlotConfig,
    axis_labels: AxisLabels,
    today: Option<NaiveDate>,
    year: i32,
) -> Result<CalendarFigure> {
    config.validate()?;
    let planner = config.planner(axis_labels);
    let plan = planner.plan(&facet_labels(observations))?;

    let grids = plan
        .facets
        .iter()
        .map(|facet| build_grid(observations, &planner.facet_filter(facet), year))
        .collect::<Result<Vec<_>>>()?;

    let highlight = match (today, grids.first()) {
        (Some(today), Some(grid)) => Some(config.highlighter().highlight_on(
            grid,
            today,
            config.cell_gap,
            config.pad_highlight,
        )?),
        _ => {
            debug!("no highlight requested for {year}");
            None
        }
    };

    info!(
        "planned {} facet(s) for {year} from {} observation(s)",
        plan.facet_count,
        observations.len()
    );
    Ok(CalendarFigure {
        plan,
        grids,
        highlight,
    })
}
