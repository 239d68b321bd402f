//! Provides input/output functionality for the prediction table and structure files.
//!
//! The prediction reader turns the raw CSV into typed records; the PDB module formats
//! and parses fixed-width atom records and places synthetic atoms into fetched files.

pub mod pdb;
pub mod predictions;
