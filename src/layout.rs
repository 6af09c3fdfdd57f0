//! Facet planning: which panels exist, their titles, their rows and the canvas
//! size.
//!
//! Rows follow the byte-wise (case-sensitive) order of facet names, the same
//! order `BTreeSet<String>` iterates in. The synthetic aggregate facet is
//! sorted by its name like any other facet.

use crate::error::{CalplotError, Result};
use crate::labels::AxisLabels;
use crate::models::{AxisOverride, Facet, FacetFilter, LayoutPlan, Observation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Distinct facet labels of an observation set.
pub fn facet_labels<'a, I>(observations: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a Observation>,
{
    observations.into_iter().map(|o| o.facet.clone()).collect()
}

/// Panel naming: the aggregate facet and the title pattern of the others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacetNaming {
    /// Name of the synthetic facet covering every observation.
    pub aggregate_name: String,
    pub aggregate_title: String,
    /// Title of a per-system panel; `{}` is replaced by the facet name.
    pub facet_title_template: String,
    /// Match records whose label merely contains the facet name, so a record
    /// for `"VPS, ESPBI"` also counts on the `VPS` panel. The published
    /// nEsveikata dashboard fills its panels this way; off by default, where
    /// each record counts only on the panel of its exact label.
    pub substring_match: bool,
}

impl Default for FacetNaming {
    fn default() -> Self {
        Self {
            aggregate_name: "Bendra".into(),
            aggregate_title: "Bendras sistemų gedimas".into(),
            facet_title_template: "Sistemos {} gedimai".into(),
            substring_match: false,
        }
    }
}

impl FacetNaming {
    pub fn is_aggregate(&self, label: &str) -> bool {
        label.to_lowercase() == self.aggregate_name.to_lowercase()
    }
}

#[derive(Debug, Clone)]
pub struct LayoutPlanner {
    pub naming: FacetNaming,
    pub title: String,
    pub row_height: u32,
    pub canvas_width: u32,
    pub axis_labels: AxisLabels,
}

impl LayoutPlanner {
    pub fn title_for(&self, facet_label: &str) -> String {
        if self.naming.is_aggregate(facet_label) {
            self.naming.aggregate_title.clone()
        } else {
            self.naming.facet_title_template.replace("{}", facet_label)
        }
    }

    /// `(height, width)` of a canvas holding `facet_count` rows.
    pub fn canvas_size(&self, facet_count: usize) -> Result<(u32, u32)> {
        if facet_count == 0 {
            return Err(CalplotError::Precondition(
                "a canvas needs at least one facet".into(),
            ));
        }
        let height = u32::try_from(facet_count)
            .ok()
            .and_then(|n| n.checked_mul(self.row_height))
            .ok_or_else(|| {
                CalplotError::Precondition(format!("{facet_count} facets do not fit on a canvas"))
            })?;
        Ok((height, self.canvas_width))
    }

    /// Plan the panels for the given raw facet labels plus the aggregate.
    pub fn plan(&self, facet_labels: &BTreeSet<String>) -> Result<LayoutPlan> {
        if facet_labels.is_empty() {
            return Err(CalplotError::Precondition(
                "no facets: the observation set is empty".into(),
            ));
        }

        let mut names: BTreeSet<&str> = facet_labels
            .iter()
            .map(String::as_str)
            .filter(|l| !self.naming.is_aggregate(l))
            .collect();
        names.insert(self.naming.aggregate_name.as_str());

        let facets: Vec<Facet> = names
            .into_iter()
            .enumerate()
            .map(|(row_index, name)| Facet {
                name: name.to_string(),
                display_title: self.title_for(name),
                row_index,
                is_aggregate: self.naming.is_aggregate(name),
            })
            .collect();

        let (canvas_height, canvas_width) = self.canvas_size(facets.len())?;
        let axis_overrides = facets
            .iter()
            .map(|f| AxisOverride {
                row_index: f.row_index,
                x_ticktext: self.axis_labels.months.clone(),
                y_ticktext: self.axis_labels.days.clone(),
            })
            .collect();

        Ok(LayoutPlan {
            facet_count: facets.len(),
            canvas_height,
            canvas_width,
            title: self.title.clone(),
            facets,
            axis_overrides,
        })
    }

    /// Observations feeding a facet's grid.
    pub fn facet_filter(&self, facet: &Facet) -> FacetFilter {
        if facet.is_aggregate {
            FacetFilter::All
        } else if self.naming.substring_match {
            FacetFilter::Contains(facet.name.clone())
        } else {
            FacetFilter::Exact(facet.name.clone())
        }
    }
}
