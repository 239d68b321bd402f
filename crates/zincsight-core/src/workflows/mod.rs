//! # Workflows Module
//!
//! High-level entry points that tie the core model and the engine together.
//!
//! - **Load Workflow** ([`load`]) - read a prediction table into a settled
//!   [`LoadState`](crate::engine::loader::LoadState), reporting progress per row.
//! - **View Workflow** ([`view`]) - look a record up by key and open it in a
//!   [`ViewerSession`](crate::engine::session::ViewerSession).

pub mod load;
pub mod view;
