pub mod ids;
pub mod record;
pub mod structure;
