//! # Engine Module
//!
//! Stateful machinery on top of the core data model: the load lifecycle of the
//! prediction table and the 3D viewer session that annotates a structure with a
//! predicted zinc ion and focuses on it.
//!
//! ## Architecture
//!
//! - **Load lifecycle** ([`loader`]) - `Loading → Ready | Failed`, settled exactly once
//! - **Rendering boundary** ([`render`]) - the [`render::RenderEngine`] trait, its factory
//!   and the guard that disposes an engine exactly once
//! - **Headless engine** ([`headless`]) - an in-memory engine used by the CLI and tests
//! - **Selections** ([`selection`]) - compiled id-list queries and loci with bounds
//! - **Structure sources** ([`source`]) - where structure files come from
//! - **Annotation** ([`annotator`]) - fetch a structure and write the ion into it
//! - **Viewer session** ([`session`]) - one record at a time, surfaced as [`session::ViewerState`]
//! - **Configuration** ([`config`]), **Progress** ([`progress`]) and **Errors** ([`error`])

pub mod annotator;
pub mod config;
pub mod error;
pub mod headless;
pub mod loader;
pub mod progress;
pub mod render;
pub mod selection;
pub mod session;
pub mod source;
