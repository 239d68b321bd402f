use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Structure '{0}' was not found")]
    NotFound(String),
    #[error("Invalid structure identifier '{0}'")]
    InvalidId(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

/// Supplies the text of a structure file for a structure identifier.
#[async_trait]
pub trait StructureSource: Send + Sync {
    async fn fetch(&self, structure_id: &str) -> Result<String, SourceError>;
}

/// Reads `{structure_id}.pdb` files from a local directory.
#[derive(Debug, Clone)]
pub struct DirectoryStructureSource {
    root: PathBuf,
}

impl DirectoryStructureSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the structure file for `structure_id`.
    ///
    /// Identifiers must name a file directly inside the directory: separators,
    /// `..` and leading dots are rejected.
    pub fn path_for(&self, structure_id: &str) -> Result<PathBuf, SourceError> {
        let invalid = structure_id.is_empty()
            || structure_id.starts_with('.')
            || structure_id.contains(['/', '\\'])
            || structure_id.contains("..");
        if invalid {
            return Err(SourceError::InvalidId(structure_id.to_string()));
        }
        Ok(self.root.join(format!("{}.pdb", structure_id)))
    }
}

#[async_trait]
impl StructureSource for DirectoryStructureSource {
    async fn fetch(&self, structure_id: &str) -> Result<String, SourceError> {
        let path = self.path_for(structure_id)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(SourceError::NotFound(structure_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn directory_source_reads_named_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("P12345.pdb"), "TER\nEND\n").unwrap();

        let source = DirectoryStructureSource::new(dir.path());
        assert_eq!(source.fetch("P12345").await.unwrap(), "TER\nEND\n");
    }

    #[tokio::test]
    async fn directory_source_reports_missing_structure() {
        let dir = tempdir().unwrap();
        let source = DirectoryStructureSource::new(dir.path());
        assert!(matches!(
            source.fetch("Q99999").await,
            Err(SourceError::NotFound(id)) if id == "Q99999"
        ));
    }

    #[tokio::test]
    async fn identifiers_cannot_leave_the_directory() {
        let parent = tempdir().unwrap();
        let root = parent.path().join("structures");
        fs::create_dir(&root).unwrap();
        fs::write(parent.path().join("x.pdb"), "TER\nEND\n").unwrap();

        let source = DirectoryStructureSource::new(&root);
        for id in ["../x", "..", "a/b", "a\\b", ".hidden", ""] {
            let result = source.fetch(id).await;
            assert!(
                matches!(&result, Err(SourceError::InvalidId(got)) if got == id),
                "{:?} gave {:?}",
                id,
                result
            );
        }
        assert_eq!(
            source.path_for("AF-P12345-F1").unwrap(),
            root.join("AF-P12345-F1.pdb")
        );
    }
}
