//! Localized month and weekday names for axis ticks.
//!
//! The locale is an explicit value handed to [`LabelProvider`]; nothing here
//! touches process-wide locale state. A missing or unknown locale is reported as
//! [`CalplotError::Configuration`]; choosing a fallback is up to the caller.

use crate::error::{CalplotError, Result};
use chrono::{Locale, NaiveDate, NaiveTime};
use log::debug;

/// Raw month (January first) and weekday (Monday first) names of one locale.
pub trait LocaleSource {
    fn raw_month_names(&self) -> Result<Vec<String>>;
    fn raw_day_names(&self) -> Result<Vec<String>>;
}

/// Names from chrono's built-in locale tables, selected by a POSIX-style tag
/// such as `lt_LT` or `en_US`. A trailing codeset (`lt_LT.UTF-8`) is ignored.
#[derive(Debug, Clone, Copy)]
pub struct ChronoLocale {
    locale: Locale,
}

impl ChronoLocale {
    pub fn new(tag: &str) -> Result<Self> {
        let name = tag.split('.').next().unwrap_or_default().trim();
        if name.is_empty() {
            return Err(CalplotError::Configuration("no locale configured".into()));
        }
        let locale = Locale::try_from(name)
            .map_err(|_| CalplotError::Configuration(format!("unknown locale `{tag}`")))?;
        debug!("using locale {locale:?}");
        Ok(Self { locale })
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    fn format_each<I>(&self, dates: I, fmt: &str) -> Vec<String>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        dates
            .into_iter()
            .map(|d| {
                d.and_time(NaiveTime::MIN)
                    .and_utc()
                    .format_localized(fmt, self.locale)
                    .to_string()
            })
            .collect()
    }
}

impl LocaleSource for ChronoLocale {
    fn raw_month_names(&self) -> Result<Vec<String>> {
        let firsts = (1..=12).filter_map(|m| NaiveDate::from_ymd_opt(2001, m, 1));
        Ok(self.format_each(firsts, "%B"))
    }

    fn raw_day_names(&self) -> Result<Vec<String>> {
        // 1 January 2001 was a Monday.
        let week = (1..=7).filter_map(|d| NaiveDate::from_ymd_opt(2001, 1, d));
        Ok(self.format_each(week, "%A"))
    }
}

/// Caller-supplied name lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticLocale {
    pub months: Vec<String>,
    pub days: Vec<String>,
}

impl LocaleSource for StaticLocale {
    fn raw_month_names(&self) -> Result<Vec<String>> {
        Ok(self.months.clone())
    }

    fn raw_day_names(&self) -> Result<Vec<String>> {
        Ok(self.days.clone())
    }
}

/// Tick text for every panel: month names on x, weekday names on y.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisLabels {
    pub months: Vec<String>,
    pub days: Vec<String>,
}

pub struct LabelProvider<S> {
    source: S,
}

impl<S: LocaleSource> LabelProvider<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Twelve month names, January first, each with an upper-case initial.
    pub fn month_names(&self) -> Result<Vec<String>> {
        let raw = self.source.raw_month_names()?;
        expect_count(&raw, 12, "month")?;
        Ok(raw.iter().map(|m| capitalize(m)).collect())
    }

    /// Seven weekday names, Monday first, cut to `truncate_to` characters.
    pub fn day_names(&self, truncate_to: Option<usize>) -> Result<Vec<String>> {
        let raw = self.source.raw_day_names()?;
        expect_count(&raw, 7, "weekday")?;
        Ok(raw
            .into_iter()
            .map(|day| match truncate_to {
                Some(n) => day.chars().take(n).collect(),
                None => day,
            })
            .collect())
    }

    pub fn axis_labels(&self, day_truncate: Option<usize>) -> Result<AxisLabels> {
        Ok(AxisLabels {
            months: self.month_names()?,
            days: self.day_names(day_truncate)?,
        })
    }
}

fn expect_count(names: &[String], want: usize, what: &str) -> Result<()> {
    if names.len() != want || names.iter().any(|n| n.trim().is_empty()) {
        return Err(CalplotError::Configuration(format!(
            "locale provided {} {what} names, expected {want} non-empty names",
            names.len()
        )));
    }
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
