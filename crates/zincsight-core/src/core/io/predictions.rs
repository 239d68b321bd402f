//! Reader for the zinc-binding prediction table.
//!
//! Headers are normalized to camelCase before any field rule is looked up, so the
//! rules below are keyed on names such as `predZnCoord` regardless of how the source
//! spells its columns. A single malformed row fails the whole read.

use crate::core::models::record::{CATALYTIC_LABEL, PredictionRecord};
use crate::core::utils::identifiers::{
    residue_signature, structure_id_from_accession, to_camel_case,
};
use nalgebra::Point3;
use phf::phf_map;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// How a normalized column is turned into a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// `AF-P12345-F1` becomes `P12345`.
    Accession,
    /// `"x,y,z"` becomes a 3D point.
    IonCoordinate,
    /// Primary probability, parsed as float.
    Probability,
    /// Secondary probability, parsed as float; a blank cell means absent.
    SecondaryProbability,
    /// `true` when the value equals the catalytic class label.
    SecondaryLabel,
    /// Non-word characters stripped, remaining characters sorted.
    ResidueSignature,
    /// Site residue sequence, kept verbatim.
    SiteResidueSequence,
}

static FIELD_RULES: phf::Map<&'static str, FieldRule> = phf_map! {
    "structureId" => FieldRule::Accession,
    "predZnCoord" => FieldRule::IonCoordinate,
    "zincsightProb" => FieldRule::Probability,
    "mahomes2ProbCatalytic" => FieldRule::SecondaryProbability,
    "mahomes2Prediction" => FieldRule::SecondaryLabel,
    "ligandResiType" => FieldRule::ResidueSignature,
    "pdbZnResseq" => FieldRule::SiteResidueSequence,
};

/// Normalized headers every prediction table must provide.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "structureId",
    "pdbZnResseq",
    "ligandResiType",
    "zincsightProb",
    "predZnCoord",
    "mahomes2Prediction",
];

/// Looks up the transform rule of a camelCase header.
pub fn field_rule(header: &str) -> Option<FieldRule> {
    FIELD_RULES.get(header).copied()
}

/// What to do when two rows produce the same record key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateKeyPolicy {
    /// Fail the load.
    #[default]
    Reject,
    /// Keep every row and log a warning.
    Warn,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReaderOptions {
    pub duplicate_keys: DuplicateKeyPolicy,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Prediction table could not be read: {0}")]
    Unavailable(String),
    #[error("Missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("Parse error on line {line}: {kind}")]
    Row { line: u64, kind: RowErrorKind },
    #[error("Duplicate record key '{key}' on line {line} (first seen on line {first_line})")]
    DuplicateKey {
        key: String,
        line: u64,
        first_line: u64,
    },
}

#[derive(Debug, Error)]
pub enum RowErrorKind {
    #[error("Expected {expected} fields but found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("Accession '{value}' has no structure identifier segment")]
    MissingAccessionSegment { value: String },
    #[error("Invalid float in column '{column}' (value: '{value}')")]
    InvalidFloat { column: String, value: String },
    #[error("Coordinate '{value}' must have exactly 3 comma-separated components")]
    InvalidCoordinate { value: String },
    #[error("Required field '{0}' is missing")]
    MissingField(&'static str),
}

/// Column layout resolved once from the header row.
struct Columns {
    names: Vec<String>,
    rules: Vec<Option<FieldRule>>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, LoadError> {
        let names: Vec<String> = headers.iter().map(to_camel_case).collect();
        debug!("Normalized headers: {:?}", names);

        for required in REQUIRED_COLUMNS {
            if !names.iter().any(|n| n == required) {
                return Err(LoadError::MissingColumn(required));
            }
        }
        let rules = names.iter().map(|n| field_rule(n)).collect();
        Ok(Self { names, rules })
    }
}

#[derive(Default)]
struct RowBuilder {
    structure_id: Option<String>,
    site_residue_sequence: Option<String>,
    ligand_residue_type: Option<String>,
    predicted_probability: Option<f64>,
    predicted_ion_coordinate: Option<Point3<f64>>,
    secondary_prediction: Option<bool>,
    secondary_probability: Option<f64>,
    extra: BTreeMap<String, String>,
}

impl RowBuilder {
    fn apply(
        &mut self,
        column: &str,
        rule: Option<FieldRule>,
        value: &str,
    ) -> Result<(), RowErrorKind> {
        match rule {
            Some(FieldRule::Accession) => {
                let id = structure_id_from_accession(value).ok_or_else(|| {
                    RowErrorKind::MissingAccessionSegment {
                        value: value.to_string(),
                    }
                })?;
                self.structure_id = Some(id.to_string());
            }
            Some(FieldRule::IonCoordinate) => {
                self.predicted_ion_coordinate = Some(parse_coordinate(column, value)?);
            }
            Some(FieldRule::Probability) => {
                self.predicted_probability = Some(parse_float(column, value)?);
            }
            Some(FieldRule::SecondaryProbability) => {
                // Older rows leave the secondary score blank.
                self.secondary_probability = if value.trim().is_empty() {
                    None
                } else {
                    Some(parse_float(column, value)?)
                };
            }
            Some(FieldRule::SecondaryLabel) => {
                self.secondary_prediction = Some(value == CATALYTIC_LABEL);
            }
            Some(FieldRule::ResidueSignature) => {
                self.ligand_residue_type = Some(residue_signature(value));
            }
            Some(FieldRule::SiteResidueSequence) => {
                self.site_residue_sequence = Some(value.to_string());
            }
            None => {
                self.extra.insert(column.to_string(), value.to_string());
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<PredictionRecord, RowErrorKind> {
        use RowErrorKind::MissingField;
        Ok(PredictionRecord::new(
            self.structure_id.ok_or(MissingField("structureId"))?,
            self.site_residue_sequence.ok_or(MissingField("pdbZnResseq"))?,
            self.ligand_residue_type.ok_or(MissingField("ligandResiType"))?,
            self.predicted_probability.ok_or(MissingField("zincsightProb"))?,
            self.predicted_ion_coordinate.ok_or(MissingField("predZnCoord"))?,
            self.secondary_prediction.ok_or(MissingField("mahomes2Prediction"))?,
            self.secondary_probability,
            self.extra,
        ))
    }
}

fn parse_float(column: &str, value: &str) -> Result<f64, RowErrorKind> {
    value.trim().parse().map_err(|_| RowErrorKind::InvalidFloat {
        column: column.to_string(),
        value: value.to_string(),
    })
}

fn parse_coordinate(column: &str, value: &str) -> Result<Point3<f64>, RowErrorKind> {
    let components = value
        .split(',')
        .map(|part| parse_float(column, part))
        .collect::<Result<Vec<f64>, _>>()?;
    match components.as_slice() {
        [x, y, z] => Ok(Point3::new(*x, *y, *z)),
        _ => Err(RowErrorKind::InvalidCoordinate {
            value: value.to_string(),
        }),
    }
}

pub struct PredictionCsv;

impl PredictionCsv {
    /// Reads and normalizes every row of a prediction table.
    ///
    /// # Errors
    ///
    /// Returns the first row-level problem as a [`LoadError`]; no partial result is
    /// ever produced.
    pub fn read_from(
        reader: impl Read,
        options: &ReaderOptions,
    ) -> Result<Vec<PredictionRecord>, LoadError> {
        Self::read_with_progress(reader, options, || {})
    }

    /// Like [`PredictionCsv::read_from`], calling `on_row` after each accepted row.
    pub fn read_with_progress(
        reader: impl Read,
        options: &ReaderOptions,
        mut on_row: impl FnMut(),
    ) -> Result<Vec<PredictionRecord>, LoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns = Columns::from_headers(csv_reader.headers()?)?;
        let mut records = Vec::new();
        let mut first_seen: HashMap<String, u64> = HashMap::new();

        for result in csv_reader.records() {
            let row = result?;
            let line = row.position().map_or(0, |p| p.line());

            if row.len() != columns.names.len() {
                return Err(LoadError::Row {
                    line,
                    kind: RowErrorKind::FieldCount {
                        expected: columns.names.len(),
                        found: row.len(),
                    },
                });
            }

            let mut builder = RowBuilder::default();
            for ((name, rule), value) in columns.names.iter().zip(&columns.rules).zip(row.iter()) {
                builder
                    .apply(name, *rule, value)
                    .map_err(|kind| LoadError::Row { line, kind })?;
            }
            let record = builder
                .finish()
                .map_err(|kind| LoadError::Row { line, kind })?;

            if let Some(&first_line) = first_seen.get(&record.key) {
                match options.duplicate_keys {
                    DuplicateKeyPolicy::Reject => {
                        return Err(LoadError::DuplicateKey {
                            key: record.key,
                            line,
                            first_line,
                        });
                    }
                    DuplicateKeyPolicy::Warn => warn!(
                        "Duplicate record key '{}' on line {} (first seen on line {})",
                        record.key, line, first_line
                    ),
                }
            } else {
                first_seen.insert(record.key.clone(), line);
            }

            records.push(record);
            on_row();
        }

        debug!("Parsed {} prediction records", records.len());
        Ok(records)
    }

    pub fn read_from_str(
        content: &str,
        options: &ReaderOptions,
    ) -> Result<Vec<PredictionRecord>, LoadError> {
        Self::read_from(content.as_bytes(), options)
    }

    pub fn read_from_path<P: AsRef<Path>>(
        path: P,
        options: &ReaderOptions,
    ) -> Result<Vec<PredictionRecord>, LoadError> {
        let file = File::open(path)?;
        Self::read_from(io::BufReader::new(file), options)
    }
}
