//! Pack Use Case
//!
//! Orchestrates one packing run:
//! 1. Check the asset and initialize the backend
//! 2. Prepare the temp workspace (refusing an existing one)
//! 3. Render the stub sources
//! 4. Embed the asset as the stub payload
//! 5. Vendor and compile the stub
//! 6. Store the artifact in the backend
//! 7. Clean up, whatever happened before
//!
//! Stage errors abort immediately. Cleanup always runs afterwards and never
//! replaces the original error.

use std::fs;

use tracing::{error, info, warn};

use crate::domain::entities::{BuiltArtifact, PackRequest, TempWorkspace};
use crate::domain::ports::{Backend, BackendFactory, BuildFlags, BuildTool, StoredLocation};
use crate::domain::value_objects::IgnorePatterns;
use crate::embedder;
use crate::error::{StubpackError, StubpackResult};
use crate::generator::{CodeGenerator, StubTemplates};

use super::result::{Cleanup, PackOutcome};
use super::state::{PackState, PackStateMachine};

/// Pack use case, parameterized by its ports.
pub struct PackUseCase<T, F>
where
    T: BuildTool,
    F: BackendFactory,
{
    build_tool: T,
    backends: F,
    generator: CodeGenerator,
}

/// What a run produced so far; consulted by cleanup.
#[derive(Default)]
struct Progress {
    workspace: Option<TempWorkspace>,
    artifact: Option<BuiltArtifact>,
    location: Option<StoredLocation>,
    fingerprint: Option<String>,
}

impl<T, F> PackUseCase<T, F>
where
    T: BuildTool,
    F: BackendFactory,
{
    pub fn new(build_tool: T, backends: F) -> Self {
        Self {
            build_tool,
            backends,
            generator: CodeGenerator::default(),
        }
    }

    /// Replace the default stub templates.
    pub fn with_templates(mut self, templates: StubTemplates) -> Self {
        self.generator = CodeGenerator::new(templates);
        self
    }

    /// Execute the pack use case
    pub fn execute(&self, request: &PackRequest) -> PackOutcome {
        let mut machine = PackStateMachine::new();
        let mut progress = Progress::default();

        let result = self.run_stages(request, &mut machine, &mut progress);
        let failed_at = match &result {
            Ok(()) => None,
            Err(e) => {
                let at = machine.fail();
                error!("Pack failed in state {} ({}): {}", at, e.kind(), e);
                Some(at)
            }
        };

        let cleanup = self.cleanup(request, &progress);
        match &cleanup {
            Cleanup::Done { .. } => {}
            Cleanup::Skipped { .. } => warn!("Cleanup skipped: {}", cleanup.describe()),
            Cleanup::Failed { .. } => error!("Cleanup failed: {}", cleanup.describe()),
        }
        if result.is_ok() && !matches!(cleanup, Cleanup::Skipped { .. }) {
            machine.advance(PackState::CleanedUp);
        }

        PackOutcome {
            state: machine.current(),
            history: machine.history().to_vec(),
            failed_at,
            error: result.err(),
            artifact: progress.artifact,
            location: progress.location,
            fingerprint: progress.fingerprint,
            cleanup,
        }
    }

    fn run_stages(
        &self,
        request: &PackRequest,
        machine: &mut PackStateMachine,
        progress: &mut Progress,
    ) -> StubpackResult<()> {
        machine.advance(PackState::ConfigResolved);

        if !request.asset_path.exists() {
            return Err(StubpackError::AssetNotFound {
                path: request.asset_path.clone(),
            });
        }
        let backend: Box<dyn Backend> = self.backends.initialize(&request.backend)?;

        let workspace = TempWorkspace::prepare(&request.workspace_path())?;
        info!("Prepared workspace {}", workspace.path().display());
        let workspace_path = workspace.path().to_path_buf();
        progress.workspace = Some(workspace);
        machine.advance(PackState::WorkspacePrepared);

        let stub = self.generator.generate(request, &workspace_path)?;
        machine.advance(PackState::Generated);

        let patterns = ignore_patterns(request)?;
        let payload = embedder::embed(&request.asset_path, &patterns)?;
        payload.write_to(&stub.payload_path())?;
        let fingerprint = payload.fingerprint();
        info!(
            files = payload.len(),
            bytes = payload.size(),
            fingerprint = %fingerprint,
            "Embedded {}",
            request.asset_path.display()
        );
        progress.fingerprint = Some(fingerprint);
        machine.advance(PackState::Embedded);

        self.build_tool.init_module(&stub.root, &request.name)?;
        self.build_tool.vendor_dependencies(&stub.root)?;
        let output = request.artifact_path();
        if output.exists() {
            warn!("Overwriting existing {}", output.display());
        }
        let built = self.build_tool.compile(
            &stub.root,
            &output,
            &BuildFlags::release(request.name.as_str()),
        )?;
        let artifact = BuiltArtifact::for_request(request, built);
        progress.artifact = Some(artifact.clone());
        machine.advance(PackState::Built);

        let location = backend.store(&artifact, &request.metadata)?;
        info!("Stored {} at {}", request.name, location);
        progress.location = Some(location);
        machine.advance(PackState::Stored);

        Ok(())
    }

    /// Remove what the run created: the workspace, and for remote backends
    /// the local copy of the artifact.
    ///
    /// A workspace that existed before the run is never touched.
    fn cleanup(&self, request: &PackRequest, progress: &Progress) -> Cleanup {
        let mut targets = Vec::new();
        if let Some(workspace) = &progress.workspace {
            targets.push(workspace.path().to_path_buf());
        }
        let local_artifact = progress
            .artifact
            .as_ref()
            .filter(|_| request.backend.variant.is_remote())
            .map(|artifact| artifact.path.clone());
        if let Some(path) = &local_artifact {
            targets.push(path.clone());
        }

        if !request.clean_cache {
            return Cleanup::Skipped { left: targets };
        }

        let mut removed = Vec::new();
        let mut errors = Vec::new();
        if let Some(workspace) = &progress.workspace {
            match workspace.remove() {
                Ok(()) => removed.push(workspace.path().to_path_buf()),
                Err(e) => errors.push(e.to_string()),
            }
        }
        if let Some(path) = local_artifact {
            match fs::remove_file(&path) {
                Ok(()) => removed.push(path),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => errors.push(format!("failed to remove {}: {}", path.display(), e)),
            }
        }

        if errors.is_empty() {
            Cleanup::Done { removed }
        } else {
            Cleanup::Failed { removed, errors }
        }
    }
}

/// Configured patterns plus the implicit exclusions: the config file, the
/// workspace and the artifact, whenever they lie inside the asset tree.
fn ignore_patterns(request: &PackRequest) -> StubpackResult<IgnorePatterns> {
    let root = &request.asset_path;
    let mut patterns = IgnorePatterns::compile(&request.ignore)?;
    if let Some(config) = &request.config_path {
        patterns = patterns.excluding_path(root, config)?;
    }
    patterns = patterns
        .excluding_path(root, &request.workspace_path())?
        .excluding_path(root, &request.artifact_path())?;
    Ok(patterns)
}
