//! Lifecycle of the prediction table load.
//!
//! A load starts in [`LoadState::Loading`] and settles exactly once into
//! [`LoadState::Ready`] or [`LoadState::Failed`]. Terminal states never change; a reload
//! starts over from a new `Loading` value.

use crate::core::io::predictions::LoadError;
use crate::core::models::record::{PredictionRecord, RecordSet};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Load state is already {0} and cannot change")]
pub struct TransitionError(pub &'static str);

#[derive(Debug, Clone, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready(RecordSet),
    Failed(Arc<LoadError>),
}

impl LoadState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Ready(_) => "ready",
            Self::Failed(_) => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Loading)
    }

    pub fn records(&self) -> Option<&RecordSet> {
        match self {
            Self::Ready(records) => Some(records),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Settles a `Loading` state with the outcome of the read.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] if the state is already terminal; the state is left
    /// untouched in that case.
    pub fn finish(
        &mut self,
        result: Result<Vec<PredictionRecord>, LoadError>,
    ) -> Result<(), TransitionError> {
        if self.is_terminal() {
            return Err(TransitionError(self.name()));
        }
        *self = Self::from(result);
        Ok(())
    }
}

impl From<Result<Vec<PredictionRecord>, LoadError>> for LoadState {
    fn from(result: Result<Vec<PredictionRecord>, LoadError>) -> Self {
        match result {
            Ok(records) => Self::Ready(RecordSet::new(records)),
            Err(err) => Self::Failed(Arc::new(err)),
        }
    }
}
