use super::annotator::{AnnotatedStructure, StructureAnnotator};
use super::config::ViewerConfig;
use super::error::{EngineError, ViewerError};
use super::progress::{Progress, ProgressReporter};
use super::render::{
    CameraState, EngineFactory, EngineGuard, HierarchyPreset, RenderEngine, TrajectoryFormat,
};
use super::selection::{Loci, SelectionQuery};
use super::source::StructureSource;
use crate::core::models::ids::StructureRef;
use crate::core::models::record::PredictionRecord;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Element symbol the viewer selects and focuses after annotation.
pub const ZINC_SELECTOR: &str = "ZN";

/// Everything the viewer knows about a successfully opened record.
#[derive(Debug, Clone)]
pub struct ViewerFocus {
    pub key: String,
    pub annotated: AnnotatedStructure,
    pub structure: StructureRef,
    pub loci: Loci,
    pub camera: CameraState,
}

#[derive(Debug, Clone, Default)]
pub enum ViewerState {
    #[default]
    Idle,
    Fetching {
        key: String,
    },
    Ready(Box<ViewerFocus>),
    Failed {
        key: String,
        error: Arc<ViewerError>,
    },
}

impl ViewerState {
    /// Key of the record the state refers to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Fetching { key } | Self::Failed { key, .. } => Some(key),
            Self::Ready(focus) => Some(&focus.key),
        }
    }
}

/// Shows one prediction record at a time in a 3D viewer.
///
/// Opening a record acquires a fresh engine, fetches and annotates the structure, loads it
/// and focuses the camera on the injected zinc ion. Only one engine is ever live: the
/// previous one is disposed before the next is acquired. If an `open` future is dropped
/// before it completes, the engine it acquired is released with it and the session stays
/// in [`ViewerState::Fetching`] until the next `open` or `close`.
pub struct ViewerSession<F: EngineFactory, S: StructureSource> {
    factory: F,
    source: S,
    config: ViewerConfig,
    guard: Option<EngineGuard<F::Engine>>,
    state: ViewerState,
}

impl<F: EngineFactory, S: StructureSource> ViewerSession<F, S> {
    pub fn new(factory: F, source: S, config: ViewerConfig) -> Self {
        Self {
            factory,
            source,
            config,
            guard: None,
            state: ViewerState::Idle,
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    /// The engine of the currently open record.
    pub fn engine(&self) -> Option<&F::Engine> {
        self.guard.as_ref().and_then(|g| g.engine().ok())
    }

    #[instrument(skip_all, name = "viewer_open", fields(key = %record.key))]
    pub async fn open(
        &mut self,
        record: &PredictionRecord,
        reporter: &ProgressReporter<'_>,
    ) -> &ViewerState {
        self.close();
        self.state = ViewerState::Fetching {
            key: record.key.clone(),
        };

        match self.load(record, reporter).await {
            Ok((guard, focus)) => {
                info!(
                    "Focused {} zinc atom(s) in structure '{}'",
                    focus.loci.len(),
                    record.structure_id
                );
                self.guard = Some(guard);
                self.state = ViewerState::Ready(Box::new(focus));
            }
            Err(err) => {
                warn!("Failed to open '{}': {}", record.key, err);
                self.state = ViewerState::Failed {
                    key: record.key.clone(),
                    error: Arc::new(err),
                };
            }
        }
        &self.state
    }

    /// Disposes the current engine, if any, and returns to [`ViewerState::Idle`].
    ///
    /// Returns `true` if an engine was disposed by this call.
    pub fn close(&mut self) -> bool {
        let disposed = self.guard.take().is_some_and(|mut guard| guard.dispose());
        self.state = ViewerState::Idle;
        disposed
    }

    async fn load(
        &self,
        record: &PredictionRecord,
        reporter: &ProgressReporter<'_>,
    ) -> Result<(EngineGuard<F::Engine>, ViewerFocus), ViewerError> {
        reporter.report(Progress::PhaseStart {
            name: "Acquire Engine",
        });
        let mut guard = EngineGuard::new(self.factory.create(&self.config.viewport).await?);
        reporter.report(Progress::PhaseFinish);

        reporter.report(Progress::PhaseStart {
            name: "Fetch Structure",
        });
        let annotated = StructureAnnotator::new(&self.source)
            .annotate(record)
            .await?;
        reporter.report(Progress::PhaseFinish);

        reporter.report(Progress::PhaseStart { name: "Focus Ion" });
        let engine = guard.engine_mut()?;
        let data = engine
            .raw_data(annotated.text.clone(), &annotated.label)
            .await?;
        let trajectory = engine.parse_trajectory(data, TrajectoryFormat::Pdb).await?;
        let structure = engine
            .apply_preset(trajectory, HierarchyPreset::Default)
            .await?;

        let query = SelectionQuery::compile_id_list(&[ZINC_SELECTOR])
            .map_err(EngineError::from)?;
        let loci = engine.loci_from_query(structure, &query)?;
        if loci.is_empty() {
            return Err(ViewerError::IonNotFound(record.structure_id.clone()));
        }
        engine.set_focus(&loci)?;
        let camera = engine.focus_camera(&loci)?;
        reporter.report(Progress::PhaseFinish);

        let focus = ViewerFocus {
            key: record.key.clone(),
            annotated,
            structure,
            loci,
            camera,
        };
        Ok((guard, focus))
    }
}
