//! Temporary build workspace
//!
//! A workspace exists for the duration of one pack. Finding one already on
//! disk means a previous run died mid-way; it is never reused.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error(
        "workspace {path} already exists; a previous run probably exited abruptly, \
         remove it before packing again"
    )]
    AlreadyExists { path: PathBuf },

    #[error("failed to create workspace {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Handle on a freshly created workspace directory.
///
/// Dropping the handle leaves the directory in place; removal is an explicit
/// cleanup decision.
#[derive(Debug)]
pub struct TempWorkspace {
    path: PathBuf,
}

impl TempWorkspace {
    /// Create the workspace at `path`, refusing to reuse an existing one.
    pub fn prepare(path: &Path) -> Result<Self, WorkspaceError> {
        if path.exists() {
            return Err(WorkspaceError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }
        std::fs::create_dir_all(path).map_err(|source| WorkspaceError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the workspace and everything in it.
    pub fn remove(&self) -> Result<(), WorkspaceError> {
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(WorkspaceError::Remove {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
