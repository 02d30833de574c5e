//! Cargo build tool
//!
//! Turns a generated stub into a release executable with the toolchain
//! already on the machine. Dependencies are vendored first so the compile
//! step runs with `--offline`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::{debug, info};

use crate::domain::ports::{BuildError, BuildFlags, BuildTool};

/// Build tool driving `cargo`.
#[derive(Debug, Clone)]
pub struct CargoBuildTool {
    program: PathBuf,
}

impl Default for CargoBuildTool {
    fn default() -> Self {
        Self::new("cargo")
    }
}

impl CargoBuildTool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Use the cargo named by `CARGO` when set, plain `cargo` otherwise.
    pub fn from_env_value(cargo: Option<&str>) -> Self {
        match cargo.filter(|value| !value.is_empty()) {
            Some(program) => Self::new(program),
            None => Self::default(),
        }
    }

    /// Check if the toolchain can be started.
    pub fn check_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn run(&self, step: &str, command: &mut Command) -> Result<Output, BuildError> {
        debug!("Running {:?}", command);
        let output = command.output().map_err(|source| BuildError::ToolMissing {
            tool: self.program.display().to_string(),
            source,
        })?;
        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(BuildError::StepFailed {
                step: step.to_string(),
                status: output.status.to_string(),
                output: combined.trim_end().to_string(),
            });
        }
        Ok(output)
    }
}

/// Manifest of a generated stub: one binary, no dependencies, its own
/// workspace root so an enclosing workspace never captures it.
pub fn stub_manifest(package: &str) -> String {
    let mut package_table = toml::Table::new();
    package_table.insert("name".into(), format!("stub-{}", package).into());
    package_table.insert("version".into(), "0.1.0".into());
    package_table.insert("edition".into(), "2021".into());
    package_table.insert("publish".into(), false.into());

    let mut bin = toml::Table::new();
    bin.insert("name".into(), package.into());
    bin.insert("path".into(), "src/main.rs".into());

    let mut manifest = toml::Table::new();
    manifest.insert("package".into(), package_table.into());
    manifest.insert(
        "bin".into(),
        toml::Value::Array(vec![toml::Value::Table(bin)]),
    );
    manifest.insert("dependencies".into(), toml::Table::new().into());
    manifest.insert("workspace".into(), toml::Table::new().into());

    manifest.to_string()
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| BuildError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, contents).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl BuildTool for CargoBuildTool {
    fn init_module(&self, work_dir: &Path, package: &str) -> Result<(), BuildError> {
        let manifest = work_dir.join("Cargo.toml");
        write_file(&manifest, stub_manifest(package).as_bytes())?;
        debug!("Wrote {}", manifest.display());
        Ok(())
    }

    fn vendor_dependencies(&self, work_dir: &Path) -> Result<(), BuildError> {
        let output = self.run(
            "cargo vendor",
            Command::new(&self.program)
                .arg("vendor")
                .arg("--quiet")
                .arg("vendor")
                .current_dir(work_dir),
        )?;

        // `cargo vendor` prints the source replacement to stdout.
        write_file(&work_dir.join(".cargo").join("config.toml"), &output.stdout)?;

        let vendor = work_dir.join("vendor");
        fs::create_dir_all(&vendor).map_err(|source| BuildError::Io {
            path: vendor.clone(),
            source,
        })?;
        Ok(())
    }

    fn compile(
        &self,
        work_dir: &Path,
        output: &Path,
        flags: &BuildFlags,
    ) -> Result<PathBuf, BuildError> {
        let target_dir = work_dir.join("target");

        let mut command = Command::new(&self.program);
        command
            .arg("build")
            .arg("--release")
            .arg("--quiet")
            .arg("--bin")
            .arg(&flags.bin_name)
            .arg("--target-dir")
            .arg(&target_dir)
            .current_dir(work_dir);
        if flags.offline {
            command.arg("--offline");
        }
        if flags.strip_symbols {
            command.env("CARGO_PROFILE_RELEASE_STRIP", "symbols");
        }
        self.run("cargo build", &mut command)?;

        let built = target_dir.join("release").join(format!(
            "{}{}",
            flags.bin_name,
            std::env::consts::EXE_SUFFIX
        ));
        if !built.is_file() {
            return Err(BuildError::ExecutableMissing { path: built });
        }

        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(|source| BuildError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::copy(&built, output).map_err(|source| BuildError::Io {
            path: output.to_path_buf(),
            source,
        })?;

        info!("Built {}", output.display());
        Ok(output.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn manifest_declares_single_binary_and_own_workspace() {
        let manifest: toml::Table = stub_manifest("demo").parse().unwrap();

        assert_eq!(manifest["package"]["name"].as_str(), Some("stub-demo"));
        assert_eq!(manifest["bin"][0]["name"].as_str(), Some("demo"));
        assert!(manifest["workspace"].as_table().unwrap().is_empty());
        assert!(manifest["dependencies"].as_table().unwrap().is_empty());
    }

    #[test]
    fn init_module_writes_manifest() {
        let dir = tempdir().unwrap();
        CargoBuildTool::default()
            .init_module(dir.path(), "demo")
            .unwrap();
        assert!(dir.path().join("Cargo.toml").is_file());
    }

    #[test]
    fn missing_toolchain_is_reported() {
        let dir = tempdir().unwrap();
        let tool = CargoBuildTool::new(dir.path().join("no-such-cargo"));

        let err = tool.vendor_dependencies(dir.path()).unwrap_err();

        assert!(matches!(err, BuildError::ToolMissing { .. }));
        assert!(!tool.check_available());
    }

    #[test]
    fn cargo_env_value_selects_program() {
        assert_eq!(
            CargoBuildTool::from_env_value(Some("/opt/cargo")).program,
            PathBuf::from("/opt/cargo")
        );
        assert_eq!(
            CargoBuildTool::from_env_value(Some("")).program,
            PathBuf::from("cargo")
        );
    }
}
