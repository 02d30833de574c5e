//! End-to-end packing with the real cargo toolchain.
//!
//! Packs a small directory, then runs the produced stub through the
//! `generate`/`version` contract and compares the restored bytes.

mod common;

use std::fs;
use std::path::Path;

use stubpack::domain::entities::{BackendConfig, StubSource, UnpackRequest};
use stubpack::domain::value_objects::Variant;
use stubpack::{
    CargoBuildTool, DefaultBackendFactory, PackUseCase, UnpackError, UnpackUseCase,
};
use tempfile::tempdir;

fn cargo() -> Option<CargoBuildTool> {
    let tool = CargoBuildTool::from_env_value(option_env!("CARGO"));
    tool.check_available().then_some(tool)
}

fn assert_same_tree(expected: &Path, actual: &Path) {
    for entry in fs::read_dir(expected).unwrap() {
        let entry = entry.unwrap();
        let restored = actual.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            assert_same_tree(&entry.path(), &restored);
        } else {
            assert_eq!(
                fs::read(entry.path()).unwrap(),
                fs::read(&restored).unwrap(),
                "{} differs",
                restored.display()
            );
        }
    }
}

#[test]
fn packed_stub_restores_asset_byte_for_byte() {
    let Some(tool) = cargo() else {
        eprintln!("cargo not available, skipping");
        return;
    };
    let dir = tempdir().unwrap();
    let request = common::request(dir.path());

    let outcome = PackUseCase::new(tool, DefaultBackendFactory).execute(&request);
    assert!(outcome.is_clean(), "pack failed: {:?}", outcome.error);

    let stub = request.artifact_path();
    assert!(stub.is_file());
    assert!(!request.workspace_path().exists());

    let unpack = UnpackUseCase::new(DefaultBackendFactory);
    let dest = dir.path().join("dest");
    unpack
        .execute(&UnpackRequest::local(&stub, &dest))
        .unwrap();
    assert_same_tree(&request.asset_path, &dest);

    // A second run must not overwrite what the first one wrote
    fs::write(dest.join("hello.txt"), "edited\n").unwrap();
    let err = unpack
        .execute(&UnpackRequest::local(&stub, &dest))
        .unwrap_err();
    assert!(matches!(err, UnpackError::StubFailed { .. }));
    assert!(err.to_string().contains("already exists"));
    assert_eq!(fs::read_to_string(dest.join("hello.txt")).unwrap(), "edited\n");

    assert_eq!(unpack.stub_version(&stub).unwrap(), "1.0");

    // Through the filesystem backend, into a named subdirectory
    let mut named = UnpackRequest {
        target: dir.path().join("named"),
        source: StubSource::Backend {
            config: BackendConfig {
                variant: Variant::Fs,
                bucket: Some(Variant::Fs.normalize_bucket(&request.output_path.to_string_lossy())),
                ..BackendConfig::default()
            },
            object: stub.file_name().unwrap().to_string_lossy().into_owned(),
            staging_dir: dir.path().to_path_buf(),
        },
        name: Some("copy".to_string()),
        clean_stub: false,
    };
    let report = unpack.execute(&named).unwrap();
    assert_eq!(report.target, dir.path().join("named/copy"));
    assert_same_tree(&request.asset_path, &report.target);

    named.clean_stub = true;
    named.name = Some("again".to_string());
    let report = unpack.execute(&named).unwrap();
    assert!(report.stub_removed);
    assert!(!stub.exists());
}
