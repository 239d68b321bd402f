use crate::core::models::record::RecordSet;
use crate::engine::progress::ProgressReporter;
use crate::engine::render::EngineFactory;
use crate::engine::session::{ViewerSession, ViewerState};
use crate::engine::source::StructureSource;
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("No prediction record with key '{0}'")]
pub struct RecordNotFound(pub String);

/// Opens the record identified by `key` in `session`.
///
/// Fetch, parse and focus failures are reported through the returned
/// [`ViewerState`]; only an unknown key is an error here.
#[instrument(skip_all, name = "view_workflow", fields(key = key))]
pub async fn run<'s, F: EngineFactory, S: StructureSource>(
    session: &'s mut ViewerSession<F, S>,
    records: &RecordSet,
    key: &str,
    reporter: &ProgressReporter<'_>,
) -> Result<&'s ViewerState, RecordNotFound> {
    let record = records
        .find_by_key(key.trim())
        .ok_or_else(|| RecordNotFound(key.to_string()))?;
    info!(
        "Opening structure '{}' at site {}",
        record.structure_id, record.site_residue_sequence
    );
    Ok(session.open(record, reporter).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::record::PredictionRecord;
    use crate::engine::config::ViewerConfig;
    use crate::engine::headless::HeadlessEngineFactory;
    use crate::engine::source::DirectoryStructureSource;
    use nalgebra::Point3;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn records() -> RecordSet {
        RecordSet::new(vec![PredictionRecord::new(
            "P12345",
            "301",
            "CHHIISSSY",
            87.2,
            Point3::new(1.0, 2.0, 3.0),
            true,
            None,
            BTreeMap::new(),
        )])
    }

    #[tokio::test]
    async fn known_key_opens_structure_from_directory() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("P12345.pdb"),
            "ATOM      1  SG  CYS A   5       1.000   2.000   3.000  1.00 90.00           S\nTER\nEND\n",
        )
        .unwrap();
        let mut session = ViewerSession::new(
            HeadlessEngineFactory,
            DirectoryStructureSource::new(dir.path()),
            ViewerConfig::default(),
        );

        let state = run(&mut session, &records(), " P12345.301 ", &ProgressReporter::new())
            .await
            .unwrap();
        assert!(matches!(state, ViewerState::Ready(_)));
    }

    #[tokio::test]
    async fn unknown_key_is_rejected_before_any_fetch() {
        let dir = tempdir().unwrap();
        let mut session = ViewerSession::new(
            HeadlessEngineFactory,
            DirectoryStructureSource::new(dir.path()),
            ViewerConfig::default(),
        );

        let err = run(&mut session, &records(), "P12345.999", &ProgressReporter::new())
            .await
            .unwrap_err();
        assert_eq!(err, RecordNotFound("P12345.999".to_string()));
        assert!(matches!(session.state(), ViewerState::Idle));
    }
}
