//! # ZincSight Core Library
//!
//! Typed loading, tabulation and 3D annotation of predicted zinc-binding sites.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout so that the parsing rules, the stateful
//! viewer lifecycle and the user-facing entry points stay independently testable.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`PredictionRecord`, `Structure`),
//!   the CSV prediction reader, the PDB atom-record codec, table queries and the theme
//!   preference model.
//!
//! - **[`engine`]: The Logic Core.** The stateful layer: the record load state machine,
//!   the rendering-engine seam with its headless implementation, selection queries, the
//!   structure annotator and the viewer session that owns one engine instance at a time.
//!
//! - **[`workflows`]: The Public API.** High-level procedures tying `core` and `engine`
//!   together, such as loading a prediction table or opening the 3D view of one record.

pub mod core;
pub mod engine;
pub mod workflows;
