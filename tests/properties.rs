//! Property tests for stubpack.
//!
//! Properties use randomized input generation to protect the naming,
//! bucket and ignore-pattern invariants the pipeline relies on.
//!
//! Run with: `cargo test --test properties`

#[path = "properties/naming.rs"]
mod naming;

#[path = "properties/buckets.rs"]
mod buckets;

#[path = "properties/ignore_patterns.rs"]
mod ignore_patterns;
