//! Domain Entities
//!
//! Core domain objects of a packing run.

mod artifact;
mod pack_request;
mod unpack_request;
mod workspace;

pub use artifact::BuiltArtifact;
pub use pack_request::{BackendConfig, PackRequest, WORKSPACE_SUFFIX};
pub use unpack_request::{StubSource, UnpackRequest};
pub use workspace::{TempWorkspace, WorkspaceError};
