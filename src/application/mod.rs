//! Application Layer
//!
//! Use cases that orchestrate the packing flow.
//! This layer:
//! - Depends on Domain layer (entities, ports)
//! - Coordinates the generator, the embedder and the infrastructure ports
//!
//! ## Use Cases
//!
//! - `PackUseCase` - Workspace, generate, embed, build, store, cleanup
//! - `UnpackUseCase` - Resolve or fetch a stub and run its `generate` command

pub mod pack;
pub mod unpack;

pub use pack::{Cleanup, PackOutcome, PackState, PackStateMachine, PackUseCase};
pub use unpack::{UnpackError, UnpackReport, UnpackUseCase};
