//! Overlay rectangle marking today's cell.
//!
//! Cells are drawn with a visual gap on both sides, on both axes. A plain
//! `±0.5` box therefore sits slightly outside the visible cell; with padding
//! compensation each edge moves inward by `cell_gap / (4 * weeks_in_grid)`,
//! where `weeks_in_grid` is the column count of the grid the box is drawn on
//! (`cell_gap / 208` for 52 weeks, `cell_gap / 212` for 53).

use crate::error::{CalplotError, Result};
use crate::grid::{CalendarGrid, grid_position};
use crate::models::{HighlightBox, Stroke};
use chrono::{Datelike, NaiveDate};

/// Week count used when no grid is at hand and none is configured.
pub const DEFAULT_WEEKS_IN_GRID: u32 = 52;

/// Sides per axis times axes: each cell is padded left/right and top/bottom.
const PADDED_EDGES_PER_WEEK: u32 = 2 * 2;

/// Per-edge inward shift for a given gap and week count.
pub fn padding_compensation(cell_gap: f64, weeks_in_grid: u32) -> f64 {
    cell_gap / f64::from(PADDED_EDGES_PER_WEEK * weeks_in_grid.max(1))
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Highlighter {
    /// Fixed week count for the compensation. `None` takes it from the grid
    /// in [`Highlighter::highlight_on`], or [`DEFAULT_WEEKS_IN_GRID`] without one.
    pub weeks_in_grid: Option<u32>,
    pub stroke: Stroke,
}

impl Highlighter {
    pub fn new(weeks_in_grid: Option<u32>, stroke: Stroke) -> Self {
        Self {
            weeks_in_grid,
            stroke,
        }
    }

    /// Rectangle framing `today`'s cell.
    ///
    /// Precondition: `today` lies in the year of the grid it will be drawn
    /// over; otherwise the box lands outside the drawn cells. Use
    /// [`Highlighter::highlight_on`] to have that checked.
    pub fn compute_highlight(
        &self,
        today: NaiveDate,
        cell_gap: f64,
        apply_padding_compensation: bool,
    ) -> Result<HighlightBox> {
        let weeks = self.weeks_in_grid.unwrap_or(DEFAULT_WEEKS_IN_GRID);
        self.boxed(today, cell_gap, apply_padding_compensation, weeks)
    }

    fn boxed(
        &self,
        today: NaiveDate,
        cell_gap: f64,
        apply_padding_compensation: bool,
        weeks_in_grid: u32,
    ) -> Result<HighlightBox> {
        if !cell_gap.is_finite() || cell_gap < 0.0 {
            return Err(CalplotError::Precondition(format!(
                "cell gap must be a finite, non-negative number, got {cell_gap}"
            )));
        }
        let (week, weekday) = grid_position(today);
        let (x, y) = (f64::from(week), f64::from(weekday));
        let pad = if apply_padding_compensation {
            padding_compensation(cell_gap, weeks_in_grid)
        } else {
            0.0
        };
        Ok(HighlightBox {
            x0: x - 0.5 + pad,
            y0: y - 0.5 + pad,
            x1: x + 0.5 - pad,
            y1: y + 0.5 - pad,
            stroke: self.stroke,
        })
    }

    /// Like [`Highlighter::compute_highlight`], rejecting a `today` outside
    /// the grid's year. The compensation is spread over the grid's own week
    /// columns unless a fixed count is set.
    pub fn highlight_on(
        &self,
        grid: &CalendarGrid,
        today: NaiveDate,
        cell_gap: f64,
        apply_padding_compensation: bool,
    ) -> Result<HighlightBox> {
        if today.year() != grid.year() {
            return Err(CalplotError::Precondition(format!(
                "today ({today}) is outside the grid year {}",
                grid.year()
            )));
        }
        let weeks = self.weeks_in_grid.unwrap_or_else(|| grid.week_count());
        self.boxed(today, cell_gap, apply_padding_compensation, weeks)
    }
}

/// [`Highlighter::compute_highlight`] with 52 weeks and the default stroke.
pub fn compute_highlight(
    today: NaiveDate,
    cell_gap: f64,
    apply_padding_compensation: bool,
) -> Result<HighlightBox> {
    Highlighter::default().compute_highlight(today, cell_gap, apply_padding_compensation)
}
