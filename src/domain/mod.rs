//! Domain Layer
//!
//! Types and interfaces of the packing pipeline.
//!
//! ## Structure
//!
//! - `entities/` - Pack/unpack requests, built artifacts, the temp workspace
//! - `value_objects/` - Names, backend variants, ignore patterns
//! - `ports/` - Interfaces for storage backends and the build tool

pub mod entities;
pub mod ports;
pub mod value_objects;
