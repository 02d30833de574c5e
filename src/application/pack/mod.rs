//! Pack Module
//!
//! ## Structure
//!
//! - `state` - The pack state machine (`PackState`, `PackStateMachine`)
//! - `result` - Result types (`PackOutcome`, `Cleanup`)
//! - `use_case` - Core use case logic (`PackUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use stubpack::application::pack::PackUseCase;
//!
//! let use_case = PackUseCase::new(CargoBuildTool::default(), DefaultBackendFactory);
//! let outcome = use_case.execute(&request);
//! ```

mod result;
mod state;
mod use_case;

pub use result::{Cleanup, PackOutcome};
pub use state::{PackState, PackStateMachine};
pub use use_case::PackUseCase;
