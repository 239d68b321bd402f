use crate::core::io::predictions::{LoadError, PredictionCsv, ReaderOptions};
use crate::engine::loader::LoadState;
use crate::engine::progress::{Progress, ProgressReporter};
use std::path::Path;
use tracing::{error, info, instrument};

/// Number of data rows a table text is expected to hold, used to size progress bars.
fn estimated_rows(content: &str) -> u64 {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .count()
        .saturating_sub(1) as u64
}

/// Parses a prediction table held in memory.
#[instrument(skip_all, name = "load_workflow")]
pub fn run(content: &str, options: &ReaderOptions, reporter: &ProgressReporter) -> LoadState {
    reporter.report(Progress::PhaseStart {
        name: "Load Predictions",
    });
    reporter.report(Progress::TaskStart {
        total_steps: estimated_rows(content),
    });

    let result = PredictionCsv::read_with_progress(content.as_bytes(), options, || {
        reporter.report(Progress::TaskIncrement)
    });
    reporter.report(Progress::TaskFinish);

    let state = LoadState::from(result);
    match &state {
        LoadState::Ready(records) => info!("Loaded {} prediction records.", records.len()),
        LoadState::Failed(err) => error!("Failed to load prediction table: {}", err),
        LoadState::Loading => {}
    }
    reporter.report(Progress::PhaseFinish);
    state
}

/// Reads a prediction table from disk and parses it.
pub fn run_from_path(
    path: impl AsRef<Path>,
    options: &ReaderOptions,
    reporter: &ProgressReporter,
) -> LoadState {
    let path = path.as_ref();
    info!("Reading prediction table from {:?}", path);
    match std::fs::read_to_string(path) {
        Ok(content) => run(&content, options, reporter),
        Err(e) => {
            error!("Failed to read {:?}: {}", path, e);
            LoadState::from(Err(LoadError::Io(e)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::tempdir;

    const TABLE: &str = "\
structure_id,pdb_zn_resseq,ligand_resi_type,zincsight_prob,pred_zn_coord,mahomes2_prediction
AF-P12345-F1,301,HIS/HIS#CYS,87.2,\"1.0,2.0,3.0\",Catalytic

AF-Q67890-F1,12,CYS#CYS,40.5,\"4.0,5.0,6.0\",Not Catalytic
";

    #[test]
    fn row_estimate_ignores_header_and_blank_lines() {
        assert_eq!(estimated_rows(TABLE), 2);
        assert_eq!(estimated_rows(""), 0);
    }

    #[test]
    fn successful_load_reports_one_increment_per_row() {
        let increments = Mutex::new(0u64);
        let total = Mutex::new(None);
        let reporter = ProgressReporter::with_callback(Box::new(|event| match event {
            Progress::TaskIncrement => *increments.lock().unwrap() += 1,
            Progress::TaskStart { total_steps } => *total.lock().unwrap() = Some(total_steps),
            _ => {}
        }));

        let state = run(TABLE, &ReaderOptions::default(), &reporter);
        drop(reporter);

        let records = state.records().expect("table should load");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key, "P12345.301");
        assert_eq!(increments.into_inner().unwrap(), 2);
        assert_eq!(total.into_inner().unwrap(), Some(2));
    }

    #[test]
    fn malformed_table_settles_into_failed() {
        let table = "structure_id,pdb_zn_resseq\nAF-P1-F1,1\n";
        let state = run(table, &ReaderOptions::default(), &ProgressReporter::new());
        assert!(matches!(state.error(), Some(LoadError::MissingColumn(_))));
    }

    #[test]
    fn missing_file_settles_into_io_failure() {
        let dir = tempdir().unwrap();
        let state = run_from_path(
            dir.path().join("data.csv"),
            &ReaderOptions::default(),
            &ProgressReporter::new(),
        );
        assert!(matches!(state.error(), Some(LoadError::Io(_))));
    }

    #[test]
    fn file_on_disk_loads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, TABLE).unwrap();

        let state = run_from_path(&path, &ReaderOptions::default(), &ProgressReporter::new());
        assert_eq!(state.records().map(|r| r.len()), Some(2));
    }
}
