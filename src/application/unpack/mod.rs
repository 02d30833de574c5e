//! Unpack Module
//!
//! Runs a packed stub's `generate` contract:
//! `<stub> generate --path <target> [--name <name>] --silent`.

mod use_case;

pub use use_case::{UnpackError, UnpackReport, UnpackUseCase};
