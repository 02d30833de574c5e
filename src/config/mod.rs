//! Configuration module for stubpack
//!
//! A pack request is resolved from four layers, highest priority first:
//! 1. Explicit settings (CLI flags)
//! 2. Environment variables (STUBPACK_*)
//! 3. Config file (`.stubpack-config.{yaml,yml,json}` or a named file)
//! 4. Built-in defaults

mod env_validator;
mod environment;
mod error;
mod loader;
mod resolver;
mod types;

pub use env_validator::{levenshtein, parse_bool};
pub use environment::{
    Environment, ENV_ASSET_PATH, ENV_ASSET_VERSION, ENV_CLEAN_LOCALCACHE, ENV_CONFIG,
    ENV_CONFIG_PATH, ENV_ENVIRONMENT, ENV_LOG,
};
pub use error::{ConfigError, ConfigResult};
pub use loader::{load_with_warnings, locate, ConfigLocation, ConfigWarning};
pub use resolver::{ConfigResolver, ResolvedConfig};
pub use types::{BackendSettings, PackSettings};

/// Basename probed in the working directory.
pub const CONFIG_BASENAME: &str = ".stubpack-config";

/// Supported config file extensions, in probe order.
pub const CONFIG_EXTENSIONS: [&str; 3] = [".yaml", ".yml", ".json"];

pub const DEFAULT_VERSION: &str = "1.0";
pub const DEFAULT_ENVIRONMENT: &str = "development";
/// Name used when none is configured and the asset basename is unusable.
pub const DEFAULT_NAME: &str = "asset";
