//! Filtering, sorting and paging over a loaded prediction table.
//!
//! Filters on different columns combine with AND; a filter with an empty value set
//! is inactive, matching how column filters behave when nothing is selected.

use crate::core::models::record::PredictionRecord;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;
use thiserror::Error;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Number of segments in the probability gauge.
pub const PROBABILITY_STEPS: usize = 10;

/// Colour ramp for probabilities, from red (low) to green (high).
pub const PROBABILITY_COLORS: [&str; 8] = [
    "#FF0000", "#FF4000", "#FF8000", "#FFBF00", "#FFD230", "#D4FF00", "#AAFF00", "#55FF00",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("Unknown column '{0}'. Expected one of: structure-id, residues, probability, secondary")]
    UnknownColumn(String),
    #[error("Unknown sort order '{0}'. Expected 'asc' or 'desc'")]
    UnknownOrder(String),
    #[error("Page numbers start at 1")]
    ZeroPage,
    #[error("Page size must be at least 1")]
    ZeroPageSize,
}

/// A sortable column of the prediction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    StructureId,
    Residues,
    Probability,
    Secondary,
}

impl FromStr for Column {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "structure-id" | "structure" | "id" => Ok(Self::StructureId),
            "residues" | "ligand-residue-type" => Ok(Self::Residues),
            "probability" | "prob" => Ok(Self::Probability),
            "secondary" | "catalytic" => Ok(Self::Secondary),
            _ => Err(TableError::UnknownColumn(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortOrder {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascend" | "ascending" => Ok(Self::Ascending),
            "desc" | "descend" | "descending" => Ok(Self::Descending),
            _ => Err(TableError::UnknownOrder(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: Column,
    pub order: SortOrder,
}

impl SortSpec {
    fn compare(&self, a: &PredictionRecord, b: &PredictionRecord) -> Ordering {
        let ordering = match self.column {
            Column::StructureId => compare_text(&a.structure_id, &b.structure_id),
            Column::Residues => compare_text(&a.ligand_residue_type, &b.ligand_residue_type),
            Column::Probability => a.predicted_probability.total_cmp(&b.predicted_probability),
            Column::Secondary => a.secondary_prediction.cmp(&b.secondary_prediction),
        };
        match self.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

/// Case-insensitive comparison with a case-sensitive tie-break, close to a locale compare.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn new(number: usize, size: usize) -> Result<Self, TableError> {
        if number == 0 {
            return Err(TableError::ZeroPage);
        }
        if size == 0 {
            return Err(TableError::ZeroPageSize);
        }
        Ok(Self { number, size })
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            number: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Column filters, sort order and page of a table view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableQuery {
    /// Exact structure identifier, compared case-insensitively after trimming.
    pub structure_id: Option<String>,
    /// Accepted residue signatures; empty means no restriction.
    pub residue_types: BTreeSet<String>,
    /// Inclusive lower bound on the primary probability.
    pub min_probability: Option<f64>,
    /// Accepted secondary predictions; empty means no restriction.
    pub secondary: BTreeSet<bool>,
    pub sort: Option<SortSpec>,
    /// `None` returns every matching row on a single page.
    pub page: Option<PageRequest>,
}

impl TableQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_structure_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        // A blank search clears the filter.
        self.structure_id = if id.trim().is_empty() { None } else { Some(id) };
        self
    }

    pub fn with_residue_type(mut self, signature: impl Into<String>) -> Self {
        self.residue_types.insert(signature.into());
        self
    }

    pub fn with_min_probability(mut self, threshold: f64) -> Self {
        self.min_probability = Some(threshold);
        self
    }

    pub fn with_secondary(mut self, catalytic: bool) -> Self {
        self.secondary.insert(catalytic);
        self
    }

    pub fn sorted_by(mut self, column: Column, order: SortOrder) -> Self {
        self.sort = Some(SortSpec { column, order });
        self
    }

    pub fn paged(mut self, page: PageRequest) -> Self {
        self.page = Some(page);
        self
    }

    /// Whether a record passes every active column filter.
    pub fn matches(&self, record: &PredictionRecord) -> bool {
        if let Some(id) = &self.structure_id {
            if record.structure_id.to_lowercase() != id.trim().to_lowercase() {
                return false;
            }
        }
        if !self.residue_types.is_empty() && !self.residue_types.contains(&record.ligand_residue_type)
        {
            return false;
        }
        if let Some(threshold) = self.min_probability {
            if record.predicted_probability < threshold {
                return false;
            }
        }
        if !self.secondary.is_empty() && !self.secondary.contains(&record.secondary_prediction) {
            return false;
        }
        true
    }

    /// Filters, sorts and pages `records`. Sorting is stable, so ties keep source order.
    pub fn apply<'a>(&self, records: &'a [PredictionRecord]) -> TablePage<'a> {
        let mut rows: Vec<&PredictionRecord> = records.iter().filter(|r| self.matches(r)).collect();
        if let Some(sort) = &self.sort {
            rows.sort_by(|a, b| sort.compare(a, b));
        }

        let total = rows.len();
        let Some(page) = self.page else {
            return TablePage {
                rows,
                total,
                page: 1,
                page_count: 1,
            };
        };

        let page_count = total.div_ceil(page.size).max(1);
        let start = (page.number - 1).saturating_mul(page.size).min(total);
        let end = start.saturating_add(page.size).min(total);
        TablePage {
            rows: rows[start..end].to_vec(),
            total,
            page: page.number,
            page_count,
        }
    }
}

/// One page of filtered, sorted rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage<'a> {
    pub rows: Vec<&'a PredictionRecord>,
    /// Number of rows matching the filters across all pages.
    pub total: usize,
    pub page: usize,
    pub page_count: usize,
}

/// Sorted, de-duplicated residue signatures present in `records`, used as filter options.
pub fn distinct_residue_types(records: &[PredictionRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.ligand_residue_type.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Colour of a probability in the red-to-green ramp.
pub fn probability_color(probability: f64) -> &'static str {
    let bucket = (probability / 10.0).round().clamp(0.0, 7.0) as usize;
    PROBABILITY_COLORS[bucket]
}

/// Number of filled gauge segments out of `steps` for a percentage.
pub fn probability_steps(probability: f64, steps: usize) -> usize {
    let filled = (steps as f64 * probability.clamp(0.0, 100.0) / 100.0).round();
    filled as usize
}
