use crate::core::utils::identifiers::record_key;
use nalgebra::Point3;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Deref;
use std::sync::Arc;

/// Class label that marks a site as catalytic in the secondary prediction column.
pub const CATALYTIC_LABEL: &str = "Catalytic";

/// One predicted zinc-binding site, parsed from a row of the prediction table.
///
/// Records are created once by the prediction reader and never mutated afterwards;
/// a reload replaces the whole [`RecordSet`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    /// Row identity, `{structure_id}.{site_residue_sequence}`.
    pub key: String,
    /// Structure identifier derived from the raw accession (e.g. `P12345`).
    pub structure_id: String,
    /// Residue sequence number of the binding site, as written in the source.
    pub site_residue_sequence: String,
    /// Order-independent signature of the coordinating residues.
    pub ligand_residue_type: String,
    /// Primary prediction probability in percent (0-100).
    pub predicted_probability: f64,
    /// Predicted position of the zinc ion in Angstroms.
    pub predicted_ion_coordinate: Point3<f64>,
    /// Whether the secondary predictor classified the site as catalytic.
    pub secondary_prediction: bool,
    /// Secondary prediction probability in percent, when the source carries it.
    pub secondary_probability: Option<f64>,
    /// Every column without a dedicated field, keyed by its camelCase header.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl PredictionRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        structure_id: impl Into<String>,
        site_residue_sequence: impl Into<String>,
        ligand_residue_type: impl Into<String>,
        predicted_probability: f64,
        predicted_ion_coordinate: Point3<f64>,
        secondary_prediction: bool,
        secondary_probability: Option<f64>,
        extra: BTreeMap<String, String>,
    ) -> Self {
        let structure_id = structure_id.into();
        let site_residue_sequence = site_residue_sequence.into();
        Self {
            key: record_key(&structure_id, &site_residue_sequence),
            structure_id,
            site_residue_sequence,
            ligand_residue_type: ligand_residue_type.into(),
            predicted_probability,
            predicted_ion_coordinate,
            secondary_prediction,
            secondary_probability,
            extra,
        }
    }

    /// The predicted ion position as an `(x, y, z)` tuple.
    pub fn ion_xyz(&self) -> (f64, f64, f64) {
        let p = &self.predicted_ion_coordinate;
        (p.x, p.y, p.z)
    }

    /// Label of the secondary prediction as shown to users.
    pub fn secondary_label(&self) -> &'static str {
        if self.secondary_prediction {
            CATALYTIC_LABEL
        } else {
            "Not Catalytic"
        }
    }
}

/// An immutable, cheaply clonable list of loaded prediction records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    records: Arc<[PredictionRecord]>,
}

impl RecordSet {
    pub fn new(records: Vec<PredictionRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn find_by_key(&self, key: &str) -> Option<&PredictionRecord> {
        self.records.iter().find(|r| r.key == key)
    }

    pub fn as_slice(&self) -> &[PredictionRecord] {
        &self.records
    }
}

impl Deref for RecordSet {
    type Target = [PredictionRecord];

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}

impl From<Vec<PredictionRecord>> for RecordSet {
    fn from(records: Vec<PredictionRecord>) -> Self {
        Self::new(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(structure_id: &str, resseq: &str) -> PredictionRecord {
        PredictionRecord::new(
            structure_id,
            resseq,
            "CHH",
            50.0,
            Point3::new(1.0, 2.0, 3.0),
            false,
            None,
            BTreeMap::new(),
        )
    }

    #[test]
    fn new_derives_key_from_structure_id_and_resseq() {
        let r = record("P12345", "101");
        assert_eq!(r.key, "P12345.101");
    }

    #[test]
    fn ion_xyz_destructures_coordinate() {
        assert_eq!(record("A", "1").ion_xyz(), (1.0, 2.0, 3.0));
    }

    #[test]
    fn secondary_label_reflects_prediction() {
        let mut r = record("A", "1");
        assert_eq!(r.secondary_label(), "Not Catalytic");
        r.secondary_prediction = true;
        assert_eq!(r.secondary_label(), "Catalytic");
    }

    #[test]
    fn record_set_finds_records_by_key() {
        let set = RecordSet::new(vec![record("A", "1"), record("B", "2")]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.find_by_key("B.2").map(|r| r.structure_id.as_str()), Some("B"));
        assert!(set.find_by_key("C.3").is_none());
    }

    #[test]
    fn record_set_clones_share_storage() {
        let set = RecordSet::new(vec![record("A", "1")]);
        let clone = set.clone();
        assert!(std::ptr::eq(set.as_slice(), clone.as_slice()));
    }
}
