//! # Core Module
//!
//! Fundamental building blocks for working with zinc-binding site predictions.
//!
//! ## Architecture
//!
//! - **Data Representation** ([`models`]) - Prediction records, atoms and parsed structures
//! - **File I/O** ([`io`]) - The prediction CSV reader and the PDB atom-record codec
//! - **Table Queries** ([`table`]) - Filtering, sorting and paging over loaded records
//! - **Preferences** ([`theme`]) - The persisted light/dark theme preference
//! - **Utilities** ([`utils`]) - Header normalization and residue signature helpers

pub mod io;
pub mod models;
pub mod table;
pub mod theme;
pub mod utils;
