//! Stubpack - packs a file or directory into a self-contained executable stub
//!
//! A pack run renders a small Rust program around the asset, embeds the
//! asset bytes into it, compiles it with cargo and hands the binary to a
//! storage backend. Running `<stub> generate --path <dir>` later recreates
//! the asset byte for byte.

pub mod application;
pub mod config;
pub mod domain;
pub mod embedder;
pub mod error;
pub mod generator;
pub mod infrastructure;
pub mod logging;

// Re-exports for convenience
pub use application::{PackOutcome, PackUseCase, UnpackError, UnpackReport, UnpackUseCase};
pub use config::{ConfigResolver, Environment, PackSettings, ResolvedConfig};
pub use domain::entities::{BackendConfig, PackRequest, StubSource, UnpackRequest};
pub use error::{ErrorKind, StubpackError, StubpackResult};
pub use infrastructure::{CargoBuildTool, DefaultBackendFactory};
