//! Environment variable layer
//!
//! The process environment is captured once into an [`Environment`] and
//! handed to the resolver, so nothing below the CLI reads `std::env`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::env_validator::{parse_bool, EnvVarValidator, BOOL_VALUES};
use super::types::PackSettings;

/// Locates the config file.
pub const ENV_CONFIG: &str = "STUBPACK_CONFIG";
pub const ENV_ASSET_PATH: &str = "STUBPACK_ASSET_PATH";
pub const ENV_ENVIRONMENT: &str = "STUBPACK_ENVIRONMENT";
pub const ENV_ASSET_VERSION: &str = "STUBPACK_ASSET_VERSION";
/// Overrides the recorded config path (and with it the implicit exclusion).
pub const ENV_CONFIG_PATH: &str = "STUBPACK_CONFIG_PATH";
pub const ENV_CLEAN_LOCALCACHE: &str = "STUBPACK_CLEAN_LOCALCACHE";
/// `tracing` filter directive for diagnostics.
pub const ENV_LOG: &str = "STUBPACK_LOG";

/// Snapshot of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Capture the current process environment.
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    /// Environment made of the given pairs only.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value of `key`, treating empty values as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Config file named by `STUBPACK_CONFIG`.
    pub fn config_override(&self) -> Option<PathBuf> {
        self.get(ENV_CONFIG).map(PathBuf::from)
    }

    /// Settings layer built from the per-field overrides.
    pub fn settings(&self) -> PackSettings {
        PackSettings {
            asset_path: self.get(ENV_ASSET_PATH).map(PathBuf::from),
            environment: self.get(ENV_ENVIRONMENT).map(str::to_string),
            version: self.get(ENV_ASSET_VERSION).map(str::to_string),
            config_path: self.get(ENV_CONFIG_PATH).map(PathBuf::from),
            clean_cache: self.get(ENV_CLEAN_LOCALCACHE).and_then(|value| {
                EnvVarValidator::new(ENV_CLEAN_LOCALCACHE, BOOL_VALUES).parse(value, parse_bool)
            }),
            ..PackSettings::default()
        }
    }
}
