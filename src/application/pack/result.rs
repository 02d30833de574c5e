//! Pack Result
//!
//! Outcome of a pack run: the decided result plus what cleanup did.

use std::path::PathBuf;

use crate::domain::entities::BuiltArtifact;
use crate::domain::ports::StoredLocation;
use crate::error::StubpackError;

use super::state::PackState;

/// What happened during cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cleanup {
    /// Everything the run created was removed.
    Done { removed: Vec<PathBuf> },
    /// Cleanup was disabled; the workspace was left on disk.
    Skipped { left: Vec<PathBuf> },
    /// Some paths could not be removed.
    Failed {
        removed: Vec<PathBuf>,
        errors: Vec<String>,
    },
}

impl Cleanup {
    /// Whether an operator has to look at leftovers.
    pub fn requires_attention(&self) -> bool {
        !matches!(self, Cleanup::Done { .. })
    }

    pub fn describe(&self) -> String {
        match self {
            Cleanup::Done { removed } => format!("removed {} path(s)", removed.len()),
            Cleanup::Skipped { left } => format!(
                "cleanup disabled, left behind: {}",
                join_paths(left)
            ),
            Cleanup::Failed { errors, .. } => errors.join("; "),
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "nothing".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result of a pack operation
#[derive(Debug)]
pub struct PackOutcome {
    /// Final state: `CleanedUp`, `Stored` when cleanup was skipped, or `Failed`.
    pub state: PackState,
    /// Every state visited, in order.
    pub history: Vec<PackState>,
    /// State the run was in when it failed.
    pub failed_at: Option<PackState>,
    /// The original stage error, never replaced by cleanup errors.
    pub error: Option<StubpackError>,
    pub artifact: Option<BuiltArtifact>,
    pub location: Option<StoredLocation>,
    /// `sha256:` digest of the embedded payload module.
    pub fingerprint: Option<String>,
    pub cleanup: Cleanup,
}

impl PackOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// The run must exit non-zero even if it succeeded.
    pub fn requires_attention(&self) -> bool {
        self.cleanup.requires_attention()
    }

    /// Succeeded and left nothing behind.
    pub fn is_clean(&self) -> bool {
        self.is_success() && !self.requires_attention()
    }

    /// Collapse into a result: the stage error if there was one, otherwise a
    /// cleanup error when cleanup needs attention.
    pub fn into_result(self) -> Result<(BuiltArtifact, StoredLocation), StubpackError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if self.cleanup.requires_attention() {
            return Err(StubpackError::Cleanup {
                message: self.cleanup.describe(),
            });
        }
        match (self.artifact, self.location) {
            (Some(artifact), Some(location)) => Ok((artifact, location)),
            _ => Err(StubpackError::Cleanup {
                message: format!("run ended in state {} without an artifact", self.state),
            }),
        }
    }
}
