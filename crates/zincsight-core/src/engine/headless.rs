use super::config::Viewport;
use super::error::EngineError;
use super::render::{CameraState, EngineFactory, HierarchyPreset, RenderEngine, TrajectoryFormat};
use super::selection::{Loci, SelectionQuery};
use crate::core::io::pdb;
use crate::core::models::ids::{DataRef, StructureRef, TrajectoryRef};
use crate::core::models::structure::{Atom, Structure};
use async_trait::async_trait;
use slotmap::SlotMap;
use tracing::{debug, trace};

struct RawData {
    label: String,
    text: String,
}

struct Trajectory {
    label: String,
    models: Vec<Vec<Atom>>,
}

/// A rendering engine without a display.
///
/// It keeps the full data/trajectory/structure hierarchy in memory and tracks focus and
/// camera state exactly as a drawing engine would, which makes the viewer sequence usable
/// from a terminal and observable in tests.
pub struct HeadlessEngine {
    viewport: Viewport,
    data: SlotMap<DataRef, RawData>,
    trajectories: SlotMap<TrajectoryRef, Trajectory>,
    structures: SlotMap<StructureRef, Structure>,
    focus: Option<Loci>,
    camera: Option<CameraState>,
    disposed: bool,
}

impl HeadlessEngine {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            data: SlotMap::with_key(),
            trajectories: SlotMap::with_key(),
            structures: SlotMap::with_key(),
            focus: None,
            camera: None,
            disposed: false,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn structure(&self, handle: StructureRef) -> Option<&Structure> {
        self.structures.get(handle)
    }

    pub fn focus(&self) -> Option<&Loci> {
        self.focus.as_ref()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn ensure_live(&self) -> Result<(), EngineError> {
        if self.disposed {
            Err(EngineError::Disposed)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RenderEngine for HeadlessEngine {
    async fn raw_data(&mut self, data: String, label: &str) -> Result<DataRef, EngineError> {
        self.ensure_live()?;
        trace!(label, bytes = data.len(), "Registering raw data");
        Ok(self.data.insert(RawData {
            label: label.to_string(),
            text: data,
        }))
    }

    async fn parse_trajectory(
        &mut self,
        data: DataRef,
        format: TrajectoryFormat,
    ) -> Result<TrajectoryRef, EngineError> {
        self.ensure_live()?;
        let raw = self.data.get(data).ok_or(EngineError::UnknownData)?;
        let models = match format {
            TrajectoryFormat::Pdb => pdb::read_models(&raw.text)?,
        };
        debug!(
            "Parsed '{}' as {} trajectory with {} model(s)",
            raw.label,
            format.as_str(),
            models.len()
        );
        let label = raw.label.clone();
        Ok(self.trajectories.insert(Trajectory { label, models }))
    }

    async fn apply_preset(
        &mut self,
        trajectory: TrajectoryRef,
        preset: HierarchyPreset,
    ) -> Result<StructureRef, EngineError> {
        self.ensure_live()?;
        let trajectory = self
            .trajectories
            .get(trajectory)
            .ok_or(EngineError::UnknownTrajectory)?;
        let structure = match preset {
            HierarchyPreset::Default => {
                let atoms = trajectory.models.first().cloned().unwrap_or_default();
                Structure::from_atoms(trajectory.label.clone(), atoms)
            }
        };
        debug!(
            "Built structure '{}' with {} atoms",
            structure.label(),
            structure.atom_count()
        );
        Ok(self.structures.insert(structure))
    }

    fn loci_from_query(
        &self,
        structure: StructureRef,
        query: &SelectionQuery,
    ) -> Result<Loci, EngineError> {
        self.ensure_live()?;
        let target = self
            .structures
            .get(structure)
            .ok_or(EngineError::UnknownStructure)?;
        Ok(query.resolve(structure, target))
    }

    fn set_focus(&mut self, loci: &Loci) -> Result<(), EngineError> {
        self.ensure_live()?;
        if !self.structures.contains_key(loci.structure) {
            return Err(EngineError::UnknownStructure);
        }
        self.focus = Some(loci.clone());
        Ok(())
    }

    fn focus_camera(&mut self, loci: &Loci) -> Result<CameraState, EngineError> {
        self.ensure_live()?;
        if !self.structures.contains_key(loci.structure) {
            return Err(EngineError::UnknownStructure);
        }
        // An empty loci leaves the camera where it was.
        if let Some(sphere) = loci.sphere {
            self.camera = Some(CameraState {
                target: sphere.center,
                radius: sphere.radius,
            });
        }
        self.camera
            .ok_or_else(|| EngineError::Initialization("camera has no target".to_string()))
    }

    fn camera(&self) -> Option<CameraState> {
        self.camera
    }

    fn dispose(&mut self) {
        self.data.clear();
        self.trajectories.clear();
        self.structures.clear();
        self.focus = None;
        self.camera = None;
        self.disposed = true;
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessEngineFactory;

#[async_trait]
impl EngineFactory for HeadlessEngineFactory {
    type Engine = HeadlessEngine;

    async fn create(&self, viewport: &Viewport) -> Result<HeadlessEngine, EngineError> {
        Ok(HeadlessEngine::new(*viewport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::render::EngineGuard;
    use nalgebra::Point3;

    const MODEL: &str = "\
ATOM      1  SG  CYS A   5       1.000   2.000   3.000  1.00 90.00           S
TER       2      CYS A   5
HETATM 9999  ZN  ZN  Z   1       4.000   5.000   6.000  1.00  1.00          Zn
END
";

    async fn load(engine: &mut HeadlessEngine) -> StructureRef {
        let data = engine.raw_data(MODEL.to_string(), "P12345").await.unwrap();
        let trajectory = engine
            .parse_trajectory(data, TrajectoryFormat::Pdb)
            .await
            .unwrap();
        engine
            .apply_preset(trajectory, HierarchyPreset::Default)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn factory_binds_engine_to_requested_viewport() {
        let viewport = Viewport::new(640, 480).unwrap();
        let engine = HeadlessEngineFactory.create(&viewport).await.unwrap();
        assert_eq!(engine.viewport(), viewport);
        assert!(engine.focus().is_none());
        assert!(engine.camera().is_none());
    }

    #[tokio::test]
    async fn full_sequence_focuses_camera_on_zinc() {
        let mut engine = HeadlessEngineFactory
            .create(&Viewport::default())
            .await
            .unwrap();
        let structure = load(&mut engine).await;
        assert_eq!(engine.structure(structure).unwrap().label(), "P12345");
        assert_eq!(engine.structure(structure).unwrap().atom_count(), 2);

        let query = SelectionQuery::compile_id_list(&["ZN"]).unwrap();
        let loci = engine.loci_from_query(structure, &query).unwrap();
        assert_eq!(loci.len(), 1);

        engine.set_focus(&loci).unwrap();
        let camera = engine.focus_camera(&loci).unwrap();
        assert_eq!(camera.target, Point3::new(4.0, 5.0, 6.0));
        assert_eq!(engine.camera(), Some(camera));
        assert_eq!(engine.focus(), Some(&loci));
    }

    #[tokio::test]
    async fn malformed_structure_text_is_a_parse_error() {
        let mut engine = HeadlessEngine::new(Viewport::default());
        let data = engine
            .raw_data("ATOM      1  SG  CYS A   5       x.000   2.000   3.000".into(), "bad")
            .await
            .unwrap();
        let err = engine
            .parse_trajectory(data, TrajectoryFormat::Pdb)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Parse { .. }));
    }

    #[tokio::test]
    async fn disposed_engine_rejects_calls() {
        let mut engine = HeadlessEngine::new(Viewport::default());
        engine.dispose();
        assert!(matches!(
            engine.raw_data(String::new(), "x").await,
            Err(EngineError::Disposed)
        ));
    }

    #[test]
    fn guard_disposes_exactly_once() {
        let mut guard = EngineGuard::new(HeadlessEngine::new(Viewport::default()));
        assert!(!guard.is_disposed());
        assert!(guard.dispose());
        assert!(!guard.dispose());
        assert!(guard.is_disposed());
        assert!(matches!(guard.engine(), Err(EngineError::Disposed)));
    }
}
