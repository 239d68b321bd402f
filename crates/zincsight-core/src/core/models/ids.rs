use slotmap::new_key_type;

new_key_type! {
    pub struct AtomId;
    pub struct DataRef;
    pub struct TrajectoryRef;
    pub struct StructureRef;
}
