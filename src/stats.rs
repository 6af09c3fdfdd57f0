use crate::grid::CalendarGrid;
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};

/// Summary statistics for one facet's year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FacetSummary {
    pub facet: String,
    pub year: i32,
    pub total: f64,
    /// Days with at least one failure.
    pub failure_days: usize,
    pub mean_per_day: f64,
    /// Worst day and its count; earliest date wins ties. `None` for a quiet year.
    pub busiest: Option<(NaiveDate, f64)>,
}

pub fn facet_summary(facet: &str, grid: &CalendarGrid) -> FacetSummary {
    let total = grid.total();
    let failure_days = grid.cells().filter(|c| c.value > 0.0).count();
    let mut busiest: Option<(NaiveDate, f64)> = None;
    for cell in grid.cells().filter(|c| c.value > 0.0) {
        if busiest.is_none_or(|(_, v)| cell.value > v) {
            busiest = Some((cell.date, cell.value));
        }
    }
    let days = grid.len().max(1) as f64;
    FacetSummary {
        facet: facet.to_string(),
        year: grid.year(),
        total,
        failure_days,
        mean_per_day: total / days,
        busiest,
    }
}

/// Map a locale tag (`lt_LT`, `de`, `en_US`, …) to a `num_format::Locale`.
/// Unknown tags format with English separators.
pub fn number_locale(tag: &str) -> &'static Locale {
    match tag.to_lowercase().split(['_', '-', '.']).next().unwrap_or_default() {
        "lt" => &Locale::lt,
        "de" => &Locale::de,
        "fr" => &Locale::fr,
        "es" => &Locale::es,
        "it" => &Locale::it,
        "pt" => &Locale::pt,
        "nl" => &Locale::nl,
        _ => &Locale::en,
    }
}

/// Whole-number rendering of a (non-negative) count with locale separators.
pub fn format_count(v: f64, locale: &Locale) -> String {
    let n = v.round() as i64;
    n.to_formatted_string(locale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::build_grid;
    use crate::models::{FacetFilter, Observation};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn summary_counts_days_and_busiest() {
        let obs = vec![
            Observation::new(d(2025, 2, 3), "A", 4.0),
            Observation::new(d(2025, 2, 3), "A", 1.0),
            Observation::new(d(2025, 6, 9), "A", 5.0),
            Observation::new(d(2025, 7, 1), "A", 2.0),
        ];
        let grid = build_grid(&obs, &FacetFilter::All, 2025).unwrap();
        let s = facet_summary("A", &grid);
        assert_eq!(s.total, 12.0);
        assert_eq!(s.failure_days, 3);
        assert_eq!(s.busiest, Some((d(2025, 2, 3), 5.0)));
        assert!((s.mean_per_day - 12.0 / 365.0).abs() < 1e-12);
    }

    #[test]
    fn quiet_year_has_no_busiest_day() {
        let none: Vec<Observation> = Vec::new();
        let grid = build_grid(&none, &FacetFilter::All, 2025).unwrap();
        assert_eq!(facet_summary("A", &grid).busiest, None);
    }

    #[test]
    fn counts_use_locale_separators() {
        assert_eq!(format_count(12345.0, number_locale("en_US")), "12,345");
        assert_eq!(format_count(12345.0, number_locale("de_DE")), "12.345");
    }
}
