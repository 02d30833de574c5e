//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O against storage backends and the toolchain.
//!
//! ## Structure
//!
//! - `backend/` - Storage backends (filesystem, GCS, S3, unsupported) and their factory
//! - `build/` - The cargo build tool

pub mod backend;
pub mod build;

pub use backend::{
    AwsBackend, DefaultBackendFactory, FilesystemBackend, GcpBackend, ObjectStoreBackend,
    UnsupportedBackend,
};
pub use build::CargoBuildTool;
