use thiserror::Error;

use super::selection::QueryError;
use super::source::SourceError;
use crate::core::io::pdb::PdbError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("Unknown raw data handle")]
    UnknownData,

    #[error("Unknown trajectory handle")]
    UnknownTrajectory,

    #[error("Unknown structure handle")]
    UnknownStructure,

    #[error("Failed to parse structure data: {source}")]
    Parse {
        #[from]
        source: PdbError,
    },

    #[error("Invalid selection: {source}")]
    Query {
        #[from]
        source: QueryError,
    },

    #[error("Rendering engine has already been disposed")]
    Disposed,
}

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Failed to fetch structure '{structure_id}': {source}")]
    Fetch {
        structure_id: String,
        #[source]
        source: SourceError,
    },

    #[error("No zinc ion could be selected in structure '{0}'")]
    IonNotFound(String),
}
