//! Domain Value Objects
//!
//! Immutable types with no identity: names, variants, patterns.

pub mod artifact_name;
pub mod ignore_patterns;
pub mod variant;

pub use artifact_name::{
    is_valid_asset_name, is_valid_asset_version, module_ident, name_for_temp, object_key,
    RESERVED_NAMES,
};
pub use ignore_patterns::{relative_slash_path, IgnoreError, IgnorePatterns};
pub use variant::{CredentialMode, Variant, SUPPORTED_CLOUDS};
