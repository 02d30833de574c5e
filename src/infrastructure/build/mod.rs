//! Build tool implementations

mod cargo;

pub use cargo::{stub_manifest, CargoBuildTool};
