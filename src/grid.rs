//! Dense week × weekday grids built from sparse daily observations.
//!
//! ### Week numbering
//! Every position in this crate comes from [`week_of_year`], which follows the
//! Monday-anchored `strftime("%W")` rule:
//!
//! - weeks start on Monday;
//! - days of January before the first Monday are week `0`;
//! - the first Monday of the year opens week `1`;
//! - the last days of December fall into week `52` or `53`.
//!
//! The same function places today's highlight, so a cell and its highlight can
//! never disagree about a date's column.

use crate::error::{CalplotError, Result};
use crate::models::{FacetFilter, Observation};
use chrono::{Datelike, NaiveDate};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

/// Week column of `date` within its year (`%W` rule, see module docs).
pub fn week_of_year(date: NaiveDate) -> u32 {
    (date.ordinal0() + 7 - weekday_index(date)) / 7
}

/// Weekday row of `date`, Monday = 0 … Sunday = 6.
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_monday()
}

/// `(week, weekday)` cell address of `date`.
pub fn grid_position(date: NaiveDate) -> (u32, u32) {
    (week_of_year(date), weekday_index(date))
}

/// First and last day of `year`.
pub fn year_bounds(year: i32) -> Result<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1);
    let last = NaiveDate::from_ymd_opt(year, 12, 31);
    match (first, last) {
        (Some(first), Some(last)) => Ok((first, last)),
        _ => Err(CalplotError::Precondition(format!(
            "year {year} is outside the supported calendar range"
        ))),
    }
}

/// One day of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridCell {
    pub date: NaiveDate,
    pub week: u32,
    pub weekday: u32,
    pub value: f64,
}

/// Aggregated daily quantities for one facet and one year, one cell per day.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarGrid {
    year: i32,
    cells: BTreeMap<(u32, u32), GridCell>,
}

impl CalendarGrid {
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Number of cells, i.e. days in the year.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn value_at(&self, week: u32, weekday: u32) -> Option<f64> {
        self.cells.get(&(week, weekday)).map(|c| c.value)
    }

    /// Value for `date`, or `None` when the date belongs to another year.
    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        if date.year() != self.year {
            return None;
        }
        self.value_at(week_of_year(date), weekday_index(date))
    }

    /// Cells in calendar order (week-major order is date order within a year).
    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.values()
    }

    pub fn first_week(&self) -> u32 {
        self.cells.keys().next().map(|(w, _)| *w).unwrap_or(0)
    }

    pub fn last_week(&self) -> u32 {
        self.cells.keys().next_back().map(|(w, _)| *w).unwrap_or(0)
    }

    /// Number of week columns the year actually occupies (53 or 54).
    pub fn week_count(&self) -> u32 {
        if self.cells.is_empty() {
            0
        } else {
            self.last_week() - self.first_week() + 1
        }
    }

    pub fn total(&self) -> f64 {
        self.cells.values().map(|c| c.value).sum()
    }

    pub fn max_value(&self) -> f64 {
        self.cells.values().map(|c| c.value).fold(0.0, f64::max)
    }
}

/// Build the grid of `year` from the observations matching `filter`.
///
/// Quantities recorded on the same date are summed. Every day of the year
/// without an observation gets a zero cell, so the result always holds 365 or
/// 366 cells. Matching observations dated in other years are skipped.
///
/// ### Errors
/// - [`CalplotError::Precondition`] for a negative or non-finite quantity, or a
///   year chrono cannot represent.
/// - [`CalplotError::DataConsistency`] when a daily sum stops being finite.
pub fn build_grid<'a, I>(observations: I, filter: &FacetFilter, year: i32) -> Result<CalendarGrid>
where
    I: IntoIterator<Item = &'a Observation>,
{
    let (first, last) = year_bounds(year)?;

    let mut per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut skipped = 0usize;
    for obs in observations {
        if !filter.matches(&obs.facet) {
            continue;
        }
        if !obs.quantity.is_finite() || obs.quantity < 0.0 {
            return Err(CalplotError::Precondition(format!(
                "quantity {} for `{}` on {} must be a finite, non-negative number",
                obs.quantity, obs.facet, obs.date
            )));
        }
        if obs.date.year() != year {
            skipped += 1;
            continue;
        }
        *per_day.entry(obs.date).or_insert(0.0) += obs.quantity;
    }
    if skipped > 0 {
        debug!("{skipped} observation(s) outside {year} ignored for {filter:?}");
    }

    if let Some((date, sum)) = per_day.iter().find(|(_, v)| !v.is_finite()) {
        return Err(CalplotError::DataConsistency(format!(
            "daily total on {date} is not a finite number ({sum})"
        )));
    }

    let cells = first
        .iter_days()
        .take_while(|d| *d <= last)
        .map(|date| {
            let (week, weekday) = grid_position(date);
            let value = per_day.get(&date).copied().unwrap_or(0.0);
            (
                (week, weekday),
                GridCell {
                    date,
                    week,
                    weekday,
                    value,
                },
            )
        })
        .collect();

    Ok(CalendarGrid { year, cells })
}

/// Polylines (grid coordinates) separating each month from the previous one.
///
/// A month starting mid-week produces a step: the line runs down the right edge
/// of the opening week for the rows still belonging to the previous month, then
/// across, then down the left edge for the remaining rows.
pub fn month_boundaries(year: i32) -> Result<Vec<Vec<(f64, f64)>>> {
    year_bounds(year)?;
    let mut lines = Vec::with_capacity(11);
    for month in 2..=12 {
        let Some(start) = NaiveDate::from_ymd_opt(year, month, 1) else {
            continue;
        };
        let (week, weekday) = grid_position(start);
        let (w, k) = (week as f64, weekday as f64);
        let line = if weekday == 0 {
            vec![(w - 0.5, -0.5), (w - 0.5, 6.5)]
        } else {
            vec![
                (w + 0.5, -0.5),
                (w + 0.5, k - 0.5),
                (w - 0.5, k - 0.5),
                (w - 0.5, 6.5),
            ]
        };
        lines.push(line);
    }
    Ok(lines)
}

/// X position for each month's tick label: the mean week column of its days.
pub fn month_tick_positions(year: i32) -> Result<Vec<f64>> {
    let (first, last) = year_bounds(year)?;
    let mut sums = [(0.0f64, 0u32); 12];
    for date in first.iter_days().take_while(|d| *d <= last) {
        let slot = &mut sums[date.month0() as usize];
        slot.0 += week_of_year(date) as f64;
        slot.1 += 1;
    }
    Ok(sums.iter().map(|(s, n)| s / f64::from(*n)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn week_rule_matches_strftime_w() {
        for date in [
            d(2022, 1, 1),
            d(2023, 1, 1),
            d(2023, 1, 2),
            d(2023, 12, 31),
            d(2024, 1, 1),
            d(2024, 12, 31),
            d(2026, 10, 18),
        ] {
            let expected: u32 = date.format("%W").to_string().parse().unwrap();
            assert_eq!(week_of_year(date), expected, "{date}");
        }
        // Sunday 1 Jan lands in week 0, Monday 1 Jan opens week 1.
        assert_eq!(week_of_year(d(2023, 1, 1)), 0);
        assert_eq!(week_of_year(d(2024, 1, 1)), 1);
        assert_eq!(week_of_year(d(2024, 12, 31)), 53);
    }

    #[test]
    fn same_date_is_summed_per_facet() {
        let obs = vec![
            Observation::new(d(2024, 3, 1), "A", 5.0),
            Observation::new(d(2024, 3, 1), "A", 3.0),
            Observation::new(d(2024, 3, 2), "B", 2.0),
        ];
        let grid = build_grid(&obs, &FacetFilter::Exact("A".into()), 2024).unwrap();
        assert_eq!(grid.value_on(d(2024, 3, 1)), Some(8.0));
        assert_eq!(grid.value_on(d(2024, 3, 2)), Some(0.0));
        assert_eq!(grid.len(), 366);

        let all = build_grid(&obs, &FacetFilter::All, 2024).unwrap();
        assert_eq!(all.value_on(d(2024, 3, 2)), Some(2.0));
        assert_eq!(all.total(), 10.0);
    }

    #[test]
    fn contains_filter_matches_multi_system_labels() {
        let obs = vec![
            Observation::new(d(2024, 5, 6), "VPS, ESPBI", 1.0),
            Observation::new(d(2024, 5, 6), "ESPBI", 2.0),
        ];
        let grid = build_grid(&obs, &FacetFilter::Contains("VPS".into()), 2024).unwrap();
        assert_eq!(grid.value_on(d(2024, 5, 6)), Some(1.0));
    }

    #[test]
    fn other_years_are_ignored() {
        let obs = vec![
            Observation::new(d(2023, 12, 31), "A", 4.0),
            Observation::new(d(2024, 1, 1), "A", 1.0),
        ];
        let grid = build_grid(&obs, &FacetFilter::All, 2024).unwrap();
        assert_eq!(grid.total(), 1.0);
        assert_eq!(grid.value_on(d(2023, 12, 31)), None);
    }

    #[test]
    fn negative_or_nan_quantity_is_precondition_error() {
        let neg = vec![Observation::new(d(2024, 1, 2), "A", -1.0)];
        let e = build_grid(&neg, &FacetFilter::All, 2024).unwrap_err();
        assert!(matches!(e, CalplotError::Precondition(_)));

        let nan = vec![Observation::new(d(2024, 1, 2), "A", f64::NAN)];
        let e = build_grid(&nan, &FacetFilter::All, 2024).unwrap_err();
        assert!(matches!(e, CalplotError::Precondition(_)));

        // Non-matching bad rows do not poison other facets.
        let grid = build_grid(&neg, &FacetFilter::Exact("B".into()), 2024).unwrap();
        assert_eq!(grid.total(), 0.0);
    }

    #[test]
    fn overflowing_daily_sum_is_consistency_error() {
        let obs = vec![
            Observation::new(d(2024, 1, 2), "A", f64::MAX),
            Observation::new(d(2024, 1, 2), "A", f64::MAX),
        ];
        let e = build_grid(&obs, &FacetFilter::All, 2024).unwrap_err();
        assert!(matches!(e, CalplotError::DataConsistency(_)));
    }

    #[test]
    fn week_span_of_leap_year_starting_monday() {
        let none: Vec<Observation> = Vec::new();
        let grid = build_grid(&none, &FacetFilter::All, 2024).unwrap();
        assert_eq!(grid.first_week(), 1);
        assert_eq!(grid.last_week(), 53);
        assert_eq!(grid.week_count(), 53);

        let grid = build_grid(&none, &FacetFilter::All, 2023).unwrap();
        assert_eq!(grid.first_week(), 0);
        assert_eq!(grid.last_week(), 52);
    }

    #[test]
    fn month_lines_step_at_first_of_month() {
        let lines = month_boundaries(2024).unwrap();
        assert_eq!(lines.len(), 11);
        // 1 March 2024 is a Friday in week 9.
        let march = &lines[1];
        assert_eq!(march[0], (9.5, -0.5));
        assert_eq!(march[1], (9.5, 3.5));
        assert_eq!(march[2], (8.5, 3.5));
        assert_eq!(march[3], (8.5, 6.5));
        // 1 July 2024 is a Monday: a straight line.
        let july = &lines[5];
        assert_eq!(july, &vec![(26.5, -0.5), (26.5, 6.5)]); // week 27
    }

    #[test]
    fn month_ticks_increase() {
        let ticks = month_tick_positions(2025).unwrap();
        assert_eq!(ticks.len(), 12);
        assert!(ticks.windows(2).all(|w| w[0] < w[1]));
    }
}
