//! Layered resolution of a [`PackRequest`]
//!
//! defaults -> config file -> environment -> explicit settings

use std::path::{Component, Path, PathBuf};

use tracing::{info, warn};

use crate::domain::entities::{BackendConfig, PackRequest};
use crate::domain::value_objects::{
    is_valid_asset_name, is_valid_asset_version, CredentialMode, IgnorePatterns, Variant,
};

use super::environment::Environment;
use super::error::{ConfigError, ConfigResult};
use super::loader::{self, ConfigLocation, ConfigWarning};
use super::types::{BackendSettings, PackSettings};
use super::{DEFAULT_ENVIRONMENT, DEFAULT_NAME, DEFAULT_VERSION};

/// Outcome of a successful resolution.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub request: PackRequest,
    pub location: ConfigLocation,
    pub warnings: Vec<ConfigWarning>,
}

/// Resolves pack settings against a captured environment and working directory.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    env: Environment,
    cwd: PathBuf,
}

impl ConfigResolver {
    pub fn new(env: Environment, cwd: impl Into<PathBuf>) -> Self {
        Self {
            env,
            cwd: cwd.into(),
        }
    }

    /// Built-in defaults layer.
    pub fn defaults() -> PackSettings {
        PackSettings {
            version: Some(DEFAULT_VERSION.to_string()),
            environment: Some(DEFAULT_ENVIRONMENT.to_string()),
            asset_path: Some(PathBuf::from(".")),
            output_path: Some(PathBuf::from(".")),
            clean_cache: Some(true),
            ..PackSettings::default()
        }
    }

    /// Resolve a request.
    ///
    /// `config_file` is the explicitly requested config file, if any.
    pub fn resolve(
        &self,
        explicit: PackSettings,
        config_file: Option<&Path>,
    ) -> ConfigResult<ResolvedConfig> {
        let env_config = self.env.config_override();
        let location = loader::locate(config_file, env_config.as_deref(), &self.cwd)?;

        let mut settings = Self::defaults();
        let mut warnings = Vec::new();

        if let Some(path) = location.path() {
            let (file_settings, file_warnings) = loader::load_with_warnings(path)?;
            for warning in &file_warnings {
                warn!("{}", warning);
            }
            warnings = file_warnings;
            settings.merge(file_settings);
            settings.config_path = Some(path.to_path_buf());
        }

        settings.merge(self.env.settings());
        settings.merge(explicit);

        let request = self.build_request(settings)?;
        info!(
            name = %request.name,
            version = %request.version,
            backend = %request.backend.variant,
            "Resolved pack configuration"
        );

        Ok(ResolvedConfig {
            request,
            location,
            warnings,
        })
    }

    fn build_request(&self, settings: PackSettings) -> ConfigResult<PackRequest> {
        let asset_path = self.absolutize(settings.asset_path.as_deref().unwrap_or(Path::new(".")));
        let output_path =
            self.absolutize(settings.output_path.as_deref().unwrap_or(Path::new(".")));

        let name = match settings.name {
            Some(name) if !is_valid_asset_name(&name) => {
                return Err(ConfigError::InvalidName { name })
            }
            Some(name) => name,
            None => default_name(&asset_path),
        };

        let version = settings
            .version
            .unwrap_or_else(|| DEFAULT_VERSION.to_string());
        if !is_valid_asset_version(&version) {
            return Err(ConfigError::InvalidVersion { version });
        }

        IgnorePatterns::compile(&settings.ignore)?;

        let backend = self.backend_config(settings.backend)?;

        Ok(PackRequest {
            name,
            version,
            asset_path,
            output_path,
            environment: settings
                .environment
                .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            ignore: settings.ignore,
            metadata: settings.metadata,
            backend,
            config_path: settings.config_path.map(|path| self.absolutize(&path)),
            clean_cache: settings.clean_cache.unwrap_or(true),
        })
    }

    /// Turn a backend section into a descriptor: parse the variant and the
    /// credential mode, normalize the bucket and absolutize the credentials path.
    pub fn backend_config(&self, settings: BackendSettings) -> ConfigResult<BackendConfig> {
        let variant: Variant = settings.cloud.as_deref().unwrap_or("").parse()?;
        let credentials_mode: CredentialMode = settings
            .credentials_mode
            .as_deref()
            .unwrap_or("")
            .parse()
            .map_err(|message| ConfigError::InvalidBackend { message })?;

        Ok(BackendConfig {
            variant,
            bucket: settings
                .bucket
                .map(|bucket| variant.normalize_bucket(&bucket)),
            folder: settings.folder,
            object_name: settings.object_name,
            credentials_path: settings
                .credentials_path
                .map(|path| self.absolutize(&path)),
            credentials_mode,
            region: settings.region,
            skip_remote_check: settings.skip_remote_check.unwrap_or(false),
        })
    }

    /// Join `path` onto the working directory and fold `.`/`..` lexically.
    pub fn absolutize(&self, path: &Path) -> PathBuf {
        let mut out = PathBuf::new();
        for component in self.cwd.join(path).components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    out.pop();
                }
                other => out.push(other.as_os_str()),
            }
        }
        out
    }
}

/// Asset name derived from the asset path, or a fixed fallback when the
/// basename is not a valid name.
fn default_name(asset_path: &Path) -> String {
    asset_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| is_valid_asset_name(stem))
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_NAME.to_string())
}
