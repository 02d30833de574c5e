//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod backend;
pub mod build_tool;

pub use backend::{Backend, BackendError, BackendFactory, StoredLocation};
pub use build_tool::{BuildError, BuildFlags, BuildTool};
