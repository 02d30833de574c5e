//! Asset embedder
//!
//! Snapshots the asset tree into a Rust module (`payload.rs`) that is
//! compiled into the stub. The module exposes the files as a read-only
//! virtual filesystem addressed by forward-slash relative paths.
//!
//! Output is a pure function of the asset contents and the ignore set:
//! entries are sorted by path and nothing time dependent is recorded.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

use crate::domain::value_objects::{relative_slash_path, IgnorePatterns};
use crate::generator::AUTO_GEN_MESSAGE;

#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("unable to find asset under specified path: {path}")]
    SourceMissing { path: PathBuf },

    #[error("failed to walk {path}: {message}")]
    Walk { path: PathBuf, message: String },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write payload {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One embedded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadEntry {
    /// Forward-slash path relative to the asset root.
    pub path: String,
    /// Unix permission bits.
    pub mode: u32,
    pub data: Vec<u8>,
}

/// Filtered snapshot of an asset tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbeddedPayload {
    entries: Vec<PayloadEntry>,
}

impl EmbeddedPayload {
    /// Entries sorted by path.
    pub fn entries(&self) -> &[PayloadEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.path.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total embedded bytes.
    pub fn size(&self) -> usize {
        self.entries.iter().map(|entry| entry.data.len()).sum()
    }

    /// Render the payload module source.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(AUTO_GEN_MESSAGE);
        out.push_str("\n#![allow(dead_code)]\n\n");
        out.push_str(RUNTIME);
        out.push_str("\npub static ENTRIES: &[Entry] = &[\n");
        for entry in &self.entries {
            out.push_str("    Entry {\n");
            let _ = writeln!(out, "        path: \"{}\",", entry.path.escape_default());
            let _ = writeln!(out, "        mode: 0o{:o},", entry.mode);
            out.push_str("        data: b\"");
            for byte in &entry.data {
                for escaped in std::ascii::escape_default(*byte) {
                    out.push(char::from(escaped));
                }
            }
            out.push_str("\",\n    },\n");
        }
        out.push_str("];\n");
        out
    }

    /// `sha256:` digest of the rendered module.
    pub fn fingerprint(&self) -> String {
        format!("sha256:{:x}", Sha256::digest(self.render().as_bytes()))
    }

    /// Write the rendered module to `path`.
    pub fn write_to(&self, path: &Path) -> Result<(), EmbedError> {
        fs::write(path, self.render()).map_err(|source| EmbedError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Lookup and restore functions shared by every payload module.
const RUNTIME: &str = r#"use std::io;
use std::path::Path;

pub struct Entry {
    pub path: &'static str,
    pub mode: u32,
    pub data: &'static [u8],
}

/// Paths of every embedded file, sorted.
pub fn names() -> impl Iterator<Item = &'static str> {
    ENTRIES.iter().map(|entry| entry.path)
}

/// Contents of the file at `path`.
pub fn open(path: &str) -> Option<&'static [u8]> {
    ENTRIES
        .binary_search_by(|entry| entry.path.cmp(path))
        .ok()
        .map(|index| ENTRIES[index].data)
}

/// Write every embedded file below `root`.
pub fn restore(root: &Path) -> io::Result<()> {
    for entry in ENTRIES {
        let dest = root.join(entry.path);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&dest, entry.data)?;
        set_mode(&dest, entry.mode)?;
    }
    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
"#;

/// Snapshot `source`, leaving out everything `patterns` ignores.
///
/// A directory is walked recursively without following symlinks; only
/// excluded paths prune whole directories, every other file is matched on its
/// own path. A single file is embedded under its basename.
pub fn embed(source: &Path, patterns: &IgnorePatterns) -> Result<EmbeddedPayload, EmbedError> {
    let metadata = fs::metadata(source).map_err(|_| EmbedError::SourceMissing {
        path: source.to_path_buf(),
    })?;

    let mut entries = Vec::new();
    if metadata.is_file() {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !patterns.is_ignored(&name, false) {
            entries.push(read_entry(source, name)?);
        }
    } else {
        let root = source.to_path_buf();
        let filter = patterns.clone();
        let walker = WalkBuilder::new(source)
            .standard_filters(false)
            .follow_links(false)
            .filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                match relative_slash_path(&root, entry.path()) {
                    Some(rel) => !filter.is_ignored(&rel, is_dir),
                    None => true,
                }
            })
            .build();

        for result in walker {
            let entry = result.map_err(|e| EmbedError::Walk {
                path: source.to_path_buf(),
                message: e.to_string(),
            })?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                if entry.depth() > 0 && !entry.file_type().is_some_and(|t| t.is_dir()) {
                    debug!("Skipping non-regular file {}", entry.path().display());
                }
                continue;
            }
            let Some(rel) = relative_slash_path(source, entry.path()) else {
                continue;
            };
            entries.push(read_entry(entry.path(), rel)?);
        }
    }

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    debug!("Embedded {} file(s) from {}", entries.len(), source.display());
    Ok(EmbeddedPayload { entries })
}

fn read_entry(path: &Path, rel: String) -> Result<PayloadEntry, EmbedError> {
    let data = fs::read(path).map_err(|source| EmbedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = fs::metadata(path)
        .map(|m| file_mode(&m))
        .map_err(|source| EmbedError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(PayloadEntry {
        path: rel,
        mode,
        data,
    })
}

#[cfg(unix)]
fn file_mode(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn file_mode(metadata: &fs::Metadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn tree(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        for (path, content) in files {
            let full = dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        dir
    }

    #[test]
    fn ignore_pattern_excludes_directory_contents() {
        let dir = tree(&[("a.txt", "a"), ("secrets/key.pem", "k")]);
        let patterns = IgnorePatterns::compile(&["secrets/.*"]).unwrap();

        let payload = embed(dir.path(), &patterns).unwrap();

        assert_eq!(payload.names().collect::<Vec<_>>(), vec!["a.txt"]);
    }

    #[test]
    fn directory_only_pattern_keeps_its_files() {
        let dir = tree(&[("a.txt", "a"), ("secrets/key.pem", "k")]);
        let patterns = IgnorePatterns::compile(&["^secrets/$"]).unwrap();

        let payload = embed(dir.path(), &patterns).unwrap();

        assert_eq!(
            payload.names().collect::<Vec<_>>(),
            vec!["a.txt", "secrets/key.pem"]
        );
    }

    #[test]
    fn entries_are_sorted_by_full_path() {
        let dir = tree(&[("a/b", "1"), ("a-c", "2"), ("A", "3")]);

        let payload = embed(dir.path(), &IgnorePatterns::empty()).unwrap();

        assert_eq!(
            payload.names().collect::<Vec<_>>(),
            vec!["A", "a-c", "a/b"]
        );
    }

    #[test]
    fn hidden_and_gitignored_files_are_kept() {
        let dir = tree(&[(".hidden", "h"), (".gitignore", "*.txt\n"), ("keep.txt", "k")]);

        let payload = embed(dir.path(), &IgnorePatterns::empty()).unwrap();

        assert_eq!(payload.len(), 3);
    }

    #[test]
    fn render_is_deterministic() {
        let dir = tree(&[("x/y.bin", "\u{0}\u{1}\"'\\"), ("z.txt", "zz\n")]);
        let patterns = IgnorePatterns::empty();

        let first = embed(dir.path(), &patterns).unwrap();
        let second = embed(dir.path(), &patterns).unwrap();

        assert_eq!(first.render(), second.render());
        assert_eq!(first.fingerprint(), second.fingerprint());
        assert!(first.fingerprint().starts_with("sha256:"));
    }

    #[test]
    fn render_escapes_bytes() {
        let dir = tree(&[("q.txt", "say \"hi\"\n")]);

        let rendered = embed(dir.path(), &IgnorePatterns::empty())
            .unwrap()
            .render();

        assert!(rendered.contains(r#"path: "q.txt","#));
        assert!(rendered.contains(r#"data: b"say \"hi\"\n","#));
        assert!(rendered.starts_with(AUTO_GEN_MESSAGE));
    }

    #[test]
    fn single_file_is_embedded_under_basename() {
        let dir = tree(&[("hello.txt", "hello\n")]);

        let payload = embed(&dir.path().join("hello.txt"), &IgnorePatterns::empty()).unwrap();

        assert_eq!(payload.names().collect::<Vec<_>>(), vec!["hello.txt"]);
        assert_eq!(payload.size(), 6);
    }

    #[test]
    fn implicit_exclusions_apply() {
        let dir = tree(&[
            ("a.txt", "a"),
            (".stubpack-config.yaml", "name: a\n"),
            ("demo_1_0_temp/demo/src/main.rs", "fn main() {}"),
        ]);
        let patterns = IgnorePatterns::empty()
            .excluding_path(dir.path(), &dir.path().join(".stubpack-config.yaml"))
            .unwrap()
            .excluding_path(dir.path(), &dir.path().join("demo_1_0_temp"))
            .unwrap();

        let payload = embed(dir.path(), &patterns).unwrap();

        assert_eq!(payload.names().collect::<Vec<_>>(), vec!["a.txt"]);
    }

    #[test]
    fn missing_source_is_an_error() {
        let dir = tempdir().unwrap();
        let err = embed(&dir.path().join("nope"), &IgnorePatterns::empty()).unwrap_err();
        assert!(matches!(err, EmbedError::SourceMissing { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn keeps_unix_mode() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tree(&[("run.sh", "#!/bin/sh\n")]);
        fs::set_permissions(dir.path().join("run.sh"), fs::Permissions::from_mode(0o755)).unwrap();

        let payload = embed(dir.path(), &IgnorePatterns::empty()).unwrap();

        assert_eq!(payload.entries()[0].mode, 0o755);
        assert!(payload.render().contains("mode: 0o755,"));
    }
}
