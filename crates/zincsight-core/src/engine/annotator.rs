use super::error::ViewerError;
use super::source::StructureSource;
use crate::core::io::pdb::{self, InsertionPoint};
use crate::core::models::record::PredictionRecord;
use crate::core::models::structure::Atom;
use nalgebra::Point3;
use tracing::{debug, warn};

/// A fetched structure with the predicted zinc ion written into it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedStructure {
    pub structure_id: String,
    /// Label under which the text is handed to a rendering engine.
    pub label: String,
    pub ion: Point3<f64>,
    pub ion_line: String,
    pub insertion: InsertionPoint,
    pub text: String,
}

/// Fetches structures and injects the predicted ion of a record.
pub struct StructureAnnotator<'a, S: StructureSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: StructureSource + ?Sized> StructureAnnotator<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    pub async fn annotate(
        &self,
        record: &PredictionRecord,
    ) -> Result<AnnotatedStructure, ViewerError> {
        let (x, y, z) = record.ion_xyz();
        let ion = Point3::new(x, y, z);
        let ion_line = pdb::format_atom_line(&Atom::zinc_ion(ion));

        let original =
            self.source
                .fetch(&record.structure_id)
                .await
                .map_err(|source| ViewerError::Fetch {
                    structure_id: record.structure_id.clone(),
                    source,
                })?;

        let (text, insertion) = pdb::insert_after_first_terminator(&original, &ion_line);
        match insertion {
            InsertionPoint::AfterTerminator { terminator_line } => debug!(
                "Inserted zinc ion for '{}' after terminator on line {}",
                record.key,
                terminator_line + 1
            ),
            InsertionPoint::Prepended => warn!(
                "Structure '{}' has no {} record; zinc ion prepended",
                record.structure_id,
                pdb::TERMINATOR_RECORD
            ),
        }

        Ok(AnnotatedStructure {
            structure_id: record.structure_id.clone(),
            label: record.structure_id.clone(),
            ion,
            ion_line,
            insertion,
            text,
        })
    }
}
