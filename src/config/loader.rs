//! Configuration file discovery and decoding

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::env_validator::closest;
use super::error::{ConfigError, ConfigResult};
use super::types::PackSettings;
use super::{CONFIG_BASENAME, CONFIG_EXTENSIONS};

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// The unknown key
    pub key: String,
    /// The file where the warning occurred
    pub file: PathBuf,
    /// The line number (1-indexed) if available
    pub line: Option<usize>,
    /// A suggested correction if available
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// How the config file was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLocation {
    /// Named by the caller.
    Explicit(PathBuf),
    /// Named by `STUBPACK_CONFIG`.
    Environment(PathBuf),
    /// Found by probing the working directory.
    Probed(PathBuf),
    /// Nothing found; defaults apply.
    Missing,
}

impl ConfigLocation {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigLocation::Explicit(p)
            | ConfigLocation::Environment(p)
            | ConfigLocation::Probed(p) => Some(p),
            ConfigLocation::Missing => None,
        }
    }
}

/// Find the config file.
///
/// An explicit path wins over the environment override, which wins over
/// probing `<cwd>/.stubpack-config.{yaml,yml,json}`. A named file must exist
/// and carry a supported extension; a probe that finds nothing is not an
/// error.
pub fn locate(
    explicit: Option<&Path>,
    env_override: Option<&Path>,
    cwd: &Path,
) -> ConfigResult<ConfigLocation> {
    if let Some(path) = explicit {
        return validate_named(cwd.join(path)).map(ConfigLocation::Explicit);
    }
    if let Some(path) = env_override {
        return validate_named(cwd.join(path)).map(ConfigLocation::Environment);
    }

    let base = cwd.join(CONFIG_BASENAME);
    for ext in CONFIG_EXTENSIONS {
        let mut candidate = base.clone().into_os_string();
        candidate.push(ext);
        let candidate = PathBuf::from(candidate);
        if candidate.is_file() {
            debug!("Found config file {}", candidate.display());
            return Ok(ConfigLocation::Probed(candidate));
        }
    }

    warn!(
        "No {}{{{}}} found in {}, using defaults",
        CONFIG_BASENAME,
        CONFIG_EXTENSIONS.join(","),
        cwd.display()
    );
    Ok(ConfigLocation::Missing)
}

fn validate_named(path: PathBuf) -> ConfigResult<PathBuf> {
    if !has_supported_extension(&path) {
        return Err(ConfigError::UnsupportedExtension { path });
    }
    if !path.is_file() {
        return Err(ConfigError::FileNotFound { path });
    }
    Ok(path)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| CONFIG_EXTENSIONS.contains(&format!(".{}", ext).as_str()))
}

/// Decode a config file and collect unknown-key warnings.
pub fn load_with_warnings(path: &Path) -> ConfigResult<(PackSettings, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let decoded = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => {
            if content.trim().is_empty() {
                Ok(PackSettings::default())
            } else {
                let deserializer = serde_yaml_ng::Deserializer::from_str(&content);
                serde_ignored::deserialize(deserializer, |p| unknown_paths.push(p.to_string()))
                    .map_err(|e| e.to_string())
            }
        }
        Some("json") => {
            let mut deserializer = serde_json::Deserializer::from_str(&content);
            serde_ignored::deserialize(&mut deserializer, |p| {
                unknown_paths.push(p.to_string())
            })
            .map_err(|e| e.to_string())
        }
        _ => {
            return Err(ConfigError::UnsupportedExtension {
                path: path.to_path_buf(),
            })
        }
    };

    let settings = decoded.map_err(|message| ConfigError::Decode {
        path: path.to_path_buf(),
        message,
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
                file: path.to_path_buf(),
                key,
            }
        })
        .collect();

    Ok((settings, warnings))
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "name",
        "version",
        "asset_path",
        "output_path",
        "environment",
        "ignore",
        "metadata",
        "backend",
        "clean_cache",
        "cloud",
        "bucket",
        "folder",
        "object_name",
        "credentials_path",
        "credentials_mode",
        "region",
        "skip_remote_check",
    ];

    closest(unknown, CANDIDATES).map(|(candidate, _)| candidate.to_string())
}
