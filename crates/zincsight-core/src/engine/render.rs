//! The boundary between a viewer session and the engine that draws structures.
//!
//! A session never talks to a concrete engine. It asks an [`EngineFactory`] for a fresh
//! [`RenderEngine`], wraps it in an [`EngineGuard`] and drives it through the load,
//! select and focus sequence. The guard releases the engine exactly once, whether the
//! session closes normally, is superseded, or is dropped halfway through an open.

use super::config::Viewport;
use super::error::EngineError;
use super::selection::{Loci, SelectionQuery};
use crate::core::models::ids::{DataRef, StructureRef, TrajectoryRef};
use async_trait::async_trait;
use nalgebra::Point3;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrajectoryFormat {
    Pdb,
}

impl TrajectoryFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdb => "pdb",
        }
    }
}

/// How a parsed trajectory is turned into a displayable structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierarchyPreset {
    /// First model of the trajectory with the engine's standard representations.
    Default,
}

/// Where the camera looks and how far out it frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub target: Point3<f64>,
    pub radius: f64,
}

#[async_trait]
pub trait RenderEngine: Send {
    /// Registers raw structure text under `label`.
    async fn raw_data(&mut self, data: String, label: &str) -> Result<DataRef, EngineError>;

    async fn parse_trajectory(
        &mut self,
        data: DataRef,
        format: TrajectoryFormat,
    ) -> Result<TrajectoryRef, EngineError>;

    async fn apply_preset(
        &mut self,
        trajectory: TrajectoryRef,
        preset: HierarchyPreset,
    ) -> Result<StructureRef, EngineError>;

    fn loci_from_query(
        &self,
        structure: StructureRef,
        query: &SelectionQuery,
    ) -> Result<Loci, EngineError>;

    /// Makes `loci` the current focus of the structure-focus manager.
    fn set_focus(&mut self, loci: &Loci) -> Result<(), EngineError>;

    /// Points the camera at `loci` and returns the resulting camera state.
    fn focus_camera(&mut self, loci: &Loci) -> Result<CameraState, EngineError>;

    fn camera(&self) -> Option<CameraState>;

    /// Releases every resource held by the engine. Called at most once by [`EngineGuard`].
    fn dispose(&mut self);
}

#[async_trait]
pub trait EngineFactory: Send + Sync {
    type Engine: RenderEngine;

    /// Creates an engine bound to a dedicated viewport of the given size.
    async fn create(&self, viewport: &Viewport) -> Result<Self::Engine, EngineError>;
}

/// Exclusive owner of one engine instance.
pub struct EngineGuard<E: RenderEngine> {
    engine: Option<E>,
}

impl<E: RenderEngine> EngineGuard<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine: Some(engine),
        }
    }

    pub fn engine(&self) -> Result<&E, EngineError> {
        self.engine.as_ref().ok_or(EngineError::Disposed)
    }

    pub fn engine_mut(&mut self) -> Result<&mut E, EngineError> {
        self.engine.as_mut().ok_or(EngineError::Disposed)
    }

    pub fn is_disposed(&self) -> bool {
        self.engine.is_none()
    }

    /// Disposes the engine. Returns `false` if it was already disposed.
    pub fn dispose(&mut self) -> bool {
        match self.engine.take() {
            Some(mut engine) => {
                engine.dispose();
                debug!("Rendering engine disposed");
                true
            }
            None => false,
        }
    }
}

impl<E: RenderEngine> Drop for EngineGuard<E> {
    fn drop(&mut self) {
        self.dispose();
    }
}
