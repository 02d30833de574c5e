//! Stub code generator
//!
//! Renders the five stub templates into a fresh source tree under the
//! workspace:
//!
//! ```text
//! <workspace>/<name>/
//!   src/main.rs              root template
//!   src/<name>_stub/cli.rs   cli template
//!   src/<name>_stub/...      meta, flags, commands
//! ```
//!
//! Rendered values are escaped for use inside Rust string literals.

mod templates;

use std::fs;
use std::path::{Path, PathBuf};

use handlebars::{handlebars_helper, Handlebars};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::entities::PackRequest;
use crate::domain::value_objects::module_ident;

pub use templates::{StubTemplates, TemplateKind};

/// Header placed at the top of every generated file.
pub const AUTO_GEN_MESSAGE: &str = "// Code generated by stubpack. DO NOT EDIT.";

#[derive(Error, Debug)]
pub enum GenerateError {
    /// The stub directory is already there; nothing was rendered.
    #[error("stub directory {path} already exists")]
    StubExists { path: PathBuf },

    #[error("template not found for {file}")]
    TemplateNotFound { file: String },

    #[error("failed to render {file}: {message}")]
    Render { file: String, message: String },

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A rendered stub source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedStub {
    /// Stub identifier; also the binary and directory name.
    pub id: String,
    /// Stub root, holding the manifest and `src/`.
    pub root: PathBuf,
    /// Inner package directory receiving the generated modules and the payload.
    pub package_dir: PathBuf,
    /// Files written, in render order.
    pub files: Vec<PathBuf>,
}

impl GeneratedStub {
    /// Where the embedded payload module goes.
    pub fn payload_path(&self) -> PathBuf {
        self.package_dir.join("payload.rs")
    }
}

#[derive(Serialize)]
struct TemplateContext<'a> {
    package: &'a str,
    environment: &'a str,
    asset_version: &'a str,
    auto_gen_message: &'a str,
}

handlebars_helper!(upper: |s: str| s.to_uppercase());
handlebars_helper!(ident: |s: str| module_ident(s));

/// Renders stub templates.
pub struct CodeGenerator {
    templates: StubTemplates,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(StubTemplates::default())
    }
}

impl CodeGenerator {
    pub fn new(templates: StubTemplates) -> Self {
        Self { templates }
    }

    /// Render the stub for `request` under `workspace` and return it.
    ///
    /// Fails before writing anything if the stub directory exists. Any error
    /// leaves a partial tree behind; the caller discards the workspace.
    pub fn generate(
        &self,
        request: &PackRequest,
        workspace: &Path,
    ) -> Result<GeneratedStub, GenerateError> {
        let id = request.name.clone();
        let root = workspace.join(&id);
        if root.exists() {
            return Err(GenerateError::StubExists { path: root });
        }

        let registry = self.registry()?;

        let src_dir = root.join("src");
        let package_dir = src_dir.join(module_ident(&request.name));
        create_dir(&package_dir)?;

        let context = TemplateContext {
            package: &request.name,
            environment: &request.environment,
            asset_version: &request.version,
            auto_gen_message: AUTO_GEN_MESSAGE,
        };

        let mut files = Vec::with_capacity(TemplateKind::ALL.len());
        for kind in TemplateKind::ALL {
            let rendered = registry
                .render(kind.name(), &context)
                .map_err(|e| GenerateError::Render {
                    file: kind.file_name().to_string(),
                    message: e.to_string(),
                })?;

            let path = match kind {
                TemplateKind::Root => src_dir.join(kind.file_name()),
                _ => package_dir.join(kind.file_name()),
            };
            fs::write(&path, rendered).map_err(|source| GenerateError::Io {
                path: path.clone(),
                source,
            })?;
            debug!("Rendered {} -> {}", kind, path.display());
            files.push(path);
        }

        info!("Generated stub {} at {}", id, root.display());
        Ok(GeneratedStub {
            id,
            root,
            package_dir,
            files,
        })
    }

    fn registry(&self) -> Result<Handlebars<'static>, GenerateError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(|value| value.escape_default().to_string());
        registry.register_helper("upper", Box::new(upper));
        registry.register_helper("ident", Box::new(ident));

        for kind in TemplateKind::ALL {
            let body = self.templates.get(kind);
            if body.trim().is_empty() {
                return Err(GenerateError::TemplateNotFound {
                    file: kind.file_name().to_string(),
                });
            }
            registry
                .register_template_string(kind.name(), body)
                .map_err(|e| GenerateError::Render {
                    file: kind.file_name().to_string(),
                    message: e.to_string(),
                })?;
        }
        Ok(registry)
    }
}

fn create_dir(path: &Path) -> Result<(), GenerateError> {
    fs::create_dir_all(path).map_err(|source| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    })
}
