//! Synchronous reader for an **ArcGIS feature layer** holding failure records.
//!
//! The layer's `query` endpoint is called with `where=1=1&outFields=*&f=json`
//! and paged with `resultOffset` while the server reports
//! `exceededTransferLimit`. Each feature's attributes are mapped to an
//! [`Observation`] through [`LayerFields`].
//!
//! ### Notes
//! - Date attributes are epoch milliseconds (esri date fields), read as UTC.
//! - Features with a missing date, system or quantity are skipped.
//! - A quantity that is neither a number nor a numeric string fails the whole
//!   read with a data-consistency error.
//! - Requests are not retried.
//!
//! Typical usage:
//! ```no_run
//! # use outage_calplot::source::{Client, LayerFields};
//! let client = Client::new("https://services.arcgis.com/x/arcgis/rest/services/gedimai/FeatureServer/0")?;
//! let rows = client.fetch(&LayerFields::default())?;
//! # Ok::<(), anyhow::Error>(())
//! ```
use crate::error::CalplotError;
use crate::models::{Observation, quantity_from_json};
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use log::{debug, info};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Attribute names of the date, system and quantity columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerFields {
    pub date: String,
    pub facet: String,
    pub quantity: String,
}

impl Default for LayerFields {
    fn default() -> Self {
        Self {
            date: "data".into(),
            facet: "neveikia_sistema".into(),
            quantity: "kiekis".into(),
        }
    }
}

// Allow -, _, . unescaped in query values
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

fn enc(s: &str) -> String {
    percent_encoding::utf8_percent_encode(s, SAFE).to_string()
}

/// Records requested per page; servers may cap it lower.
const PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone)]
pub struct Client {
    /// Layer URL, e.g. `.../FeatureServer/0` (without `/query`).
    pub layer_url: String,
    http: HttpClient,
}

impl Client {
    pub fn new(layer_url: impl Into<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(5))
            .user_agent(concat!("outage-calplot/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build http client")?;
        Ok(Self {
            layer_url: layer_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn query_url(&self, offset: usize) -> String {
        format!(
            "{}/query?where={}&outFields={}&f=json&resultOffset={}&resultRecordCount={}",
            self.layer_url,
            enc("1=1"),
            enc("*"),
            offset,
            PAGE_SIZE
        )
    }

    /// Fetch every feature of the layer as observations.
    pub fn fetch(&self, fields: &LayerFields) -> Result<Vec<Observation>> {
        // Safety cap to avoid pathological jobs
        let max_pages = 1000usize;

        let mut out: Vec<Observation> = Vec::new();
        let mut offset = 0usize;
        for page in 1..=max_pages {
            let url = self.query_url(offset);
            let resp = self
                .http
                .get(&url)
                .send()
                .with_context(|| format!("GET {url}"))?;
            if !resp.status().is_success() {
                bail!("request failed with HTTP {}", resp.status());
            }
            let v: Value = resp.json().context("decode json")?;
            let parsed = parse_page(&v, fields)?;
            debug!(
                "page {page}: {} features, {} usable",
                parsed.feature_count,
                parsed.observations.len()
            );
            out.extend(parsed.observations);

            if !parsed.exceeded_transfer_limit || parsed.feature_count == 0 {
                info!("fetched {} observations from {}", out.len(), self.layer_url);
                return Ok(out);
            }
            offset += parsed.feature_count;
        }
        bail!("page limit exceeded ({max_pages})");
    }
}

/// One decoded `query` response.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub observations: Vec<Observation>,
    pub feature_count: usize,
    pub exceeded_transfer_limit: bool,
}

/// Decode a feature-layer `query` response body.
pub fn parse_page(v: &Value, fields: &LayerFields) -> Result<Page> {
    let obj = v
        .as_object()
        .ok_or_else(|| anyhow::anyhow!("unexpected response shape: not a JSON object"))?;

    // Errors come back with HTTP 200 and an "error" object.
    if let Some(err) = obj.get("error") {
        bail!("feature layer error: {}", err);
    }

    let features = obj
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow::anyhow!("unexpected response: no `features` array"))?;
    let exceeded_transfer_limit = obj
        .get("exceededTransferLimit")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let mut observations = Vec::with_capacity(features.len());
    for (i, feature) in features.iter().enumerate() {
        let Some(attrs) = feature.get("attributes") else {
            continue;
        };
        let date = attrs
            .get(&fields.date)
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.date_naive());
        let facet = attrs.get(&fields.facet).and_then(Value::as_str);
        let quantity = match attrs.get(&fields.quantity) {
            Some(q) => quantity_from_json(q).with_context(|| format!("feature #{i}"))?,
            None => None,
        };
        match (date, facet, quantity) {
            (Some(date), Some(facet), Some(quantity)) => {
                observations.push(Observation::new(date, facet.trim(), quantity));
            }
            _ => debug!("feature #{i} lacks date, system or quantity; skipped"),
        }
    }

    Ok(Page {
        observations,
        feature_count: features.len(),
        exceeded_transfer_limit,
    })
}

/// True when `err` was caused by inconsistent record data.
pub fn is_data_consistency(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<CalplotError>(),
        Some(CalplotError::DataConsistency(_))
    )
}
