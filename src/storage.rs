//! Local files: observations in, grids out.
//!
//! Observation files carry `date,facet,quantity` (CSV with header, or a JSON
//! array of objects with those keys). Rows with an empty quantity are skipped;
//! a quantity that is not a number is a data-consistency error.

use crate::error::CalplotError;
use crate::grid::CalendarGrid;
use crate::models::{Observation, parse_quantity, quantity_from_json};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawRow {
    date: String,
    facet: String,
    quantity: String,
}

#[derive(Debug, Deserialize)]
struct RawJsonRow {
    date: String,
    facet: String,
    #[serde(default)]
    quantity: Value,
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part.
fn parse_date(raw: &str) -> Result<NaiveDate, CalplotError> {
    let t = raw.trim();
    let day = t.get(..10).unwrap_or(t);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|_| CalplotError::DataConsistency(format!("`{t}` is not a YYYY-MM-DD date")))
}

fn to_observation(
    date: &str,
    facet: &str,
    quantity: Option<f64>,
) -> Result<Option<Observation>, CalplotError> {
    let date = parse_date(date)?;
    Ok(quantity.map(|q| Observation::new(date, facet.trim(), q)))
}

/// Load observations from a CSV file with a `date,facet,quantity` header.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Observation>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;
    let mut out = Vec::new();
    for (i, row) in rdr.deserialize::<RawRow>().enumerate() {
        let row = row.with_context(|| format!("{} row {}", path.display(), i + 1))?;
        let quantity = parse_quantity(&row.quantity)
            .with_context(|| format!("{} row {}", path.display(), i + 1))?;
        if let Some(obs) = to_observation(&row.date, &row.facet, quantity)
            .with_context(|| format!("{} row {}", path.display(), i + 1))?
        {
            out.push(obs);
        }
    }
    Ok(out)
}

/// Load observations from a JSON array.
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Vec<Observation>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let rows: Vec<RawJsonRow> =
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?;
    let mut out = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let quantity = quantity_from_json(&row.quantity)
            .with_context(|| format!("{} entry {}", path.display(), i))?;
        if let Some(obs) = to_observation(&row.date, &row.facet, quantity)
            .with_context(|| format!("{} entry {}", path.display(), i))?
        {
            out.push(obs);
        }
    }
    Ok(out)
}

/// Load by extension: `.json` as JSON, everything else as CSV.
pub fn load_observations<P: AsRef<Path>>(path: P) -> Result<Vec<Observation>> {
    let path = path.as_ref();
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_csv(path),
    }
}

/// Export a grid as CSV: `date,week,weekday,value`, one row per day.
pub fn save_grid_csv<P: AsRef<Path>>(grid: &CalendarGrid, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    wtr.write_record(["date", "week", "weekday", "value"])?;
    for cell in grid.cells() {
        wtr.serialize((cell.date.to_string(), cell.week, cell.weekday, cell.value))?;
    }
    wtr.flush()?;
    Ok(())
}
