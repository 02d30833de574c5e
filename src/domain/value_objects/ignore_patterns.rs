//! Ignore patterns value object
//!
//! Compiles the configured ignore expressions (regular expressions matched
//! against forward-slash relative paths) and decides which asset entries are
//! left out of the payload.
//!
//! Configured expressions apply to file paths only. Directories are pruned
//! only by literal path exclusions, which cover their whole subtree.

use std::fmt;
use std::path::{Component, Path};

use regex::RegexSet;

/// Maximum number of patterns allowed
const MAX_PATTERNS: usize = 1000;

/// Compiled ignore expressions.
#[derive(Clone)]
pub struct IgnorePatterns {
    set: RegexSet,
    sources: Vec<String>,
    /// Literal subtree exclusions added by [`IgnorePatterns::excluding_path`].
    subtrees: RegexSet,
    subtree_sources: Vec<String>,
}

impl Default for IgnorePatterns {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for IgnorePatterns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IgnorePatterns")
            .field("sources", &self.sources)
            .field("subtrees", &self.subtree_sources)
            .finish()
    }
}

impl IgnorePatterns {
    /// Create an empty pattern set (matches nothing).
    pub fn empty() -> Self {
        Self {
            set: RegexSet::empty(),
            sources: Vec::new(),
            subtrees: RegexSet::empty(),
            subtree_sources: Vec::new(),
        }
    }

    /// Compile user supplied patterns.
    ///
    /// Blank entries are skipped. An invalid expression is reported with its
    /// position in the list.
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self, IgnoreError> {
        let sources: Vec<String> = patterns
            .iter()
            .map(|p| p.as_ref().trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        if sources.len() > MAX_PATTERNS {
            return Err(IgnoreError::TooManyPatterns {
                count: sources.len(),
                limit: MAX_PATTERNS,
            });
        }

        for (index, pattern) in sources.iter().enumerate() {
            if let Err(e) = regex::Regex::new(pattern) {
                return Err(IgnoreError::InvalidPattern {
                    index,
                    pattern: pattern.clone(),
                    message: e.to_string(),
                });
            }
        }

        let set = RegexSet::new(&sources).map_err(|e| IgnoreError::BuildFailed(e.to_string()))?;
        Ok(Self {
            set,
            sources,
            ..Self::empty()
        })
    }

    /// Add an implicit exclusion for `path` when it lies inside `root`.
    ///
    /// The path is excluded literally (it and everything below it). Paths
    /// outside `root`, or equal to it, add nothing.
    pub fn excluding_path(self, root: &Path, path: &Path) -> Result<Self, IgnoreError> {
        let Some(rel) = relative_slash_path(root, path) else {
            return Ok(self);
        };
        if rel.is_empty() {
            return Ok(self);
        }
        let mut subtree_sources = self.subtree_sources;
        subtree_sources.push(format!("^{}(/|$)", regex::escape(&rel)));
        let subtrees = RegexSet::new(&subtree_sources)
            .map_err(|e| IgnoreError::BuildFailed(e.to_string()))?;
        Ok(Self {
            subtrees,
            subtree_sources,
            ..self
        })
    }

    /// Check if a relative path should be ignored.
    ///
    /// A file is ignored when its path matches any configured expression or
    /// lies under an excluded path. A directory is ignored (and pruned) only
    /// when it lies under an excluded path; configured expressions never
    /// prune, so `^secrets/$` leaves `secrets/key.pem` in the payload.
    pub fn is_ignored(&self, rel_path: &str, is_dir: bool) -> bool {
        if self.subtrees.is_match(rel_path) {
            return true;
        }
        !is_dir && self.set.is_match(rel_path)
    }

    /// Patterns in the order they were compiled.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Get the number of patterns loaded, exclusions included.
    pub fn pattern_count(&self) -> usize {
        self.sources.len() + self.subtree_sources.len()
    }

    /// Check if this is an empty pattern set.
    pub fn is_empty(&self) -> bool {
        self.pattern_count() == 0
    }
}

/// Render `path` relative to `root` with `/` separators.
///
/// Returns `None` when `path` is not inside `root`.
pub fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    Some(parts.join("/"))
}

/// Errors that can occur when compiling ignore patterns.
#[derive(Debug)]
pub enum IgnoreError {
    /// More patterns than allowed.
    TooManyPatterns { count: usize, limit: usize },
    /// A pattern is not a valid regular expression.
    InvalidPattern {
        index: usize,
        pattern: String,
        message: String,
    },
    /// The combined matcher failed to build.
    BuildFailed(String),
}

impl fmt::Display for IgnoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreError::TooManyPatterns { count, limit } => {
                write!(f, "too many ignore patterns ({} > {})", count, limit)
            }
            IgnoreError::InvalidPattern {
                index,
                pattern,
                message,
            } => write!(
                f,
                "invalid ignore pattern #{} '{}': {}",
                index + 1,
                pattern,
                message
            ),
            IgnoreError::BuildFailed(msg) => write!(f, "failed to build ignore matcher: {}", msg),
        }
    }
}

impl std::error::Error for IgnoreError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn empty_matches_nothing() {
        let patterns = IgnorePatterns::empty();
        assert!(patterns.is_empty());
        assert!(!patterns.is_ignored("a.txt", false));
    }

    #[test]
    fn matches_relative_paths() {
        let patterns = IgnorePatterns::compile(&["secrets/.*"]).unwrap();
        assert!(patterns.is_ignored("secrets/key.pem", false));
        assert!(!patterns.is_ignored("a.txt", false));
    }

    #[test]
    fn configured_patterns_never_prune_directories() {
        let patterns = IgnorePatterns::compile(&["^secrets/$", "secrets"]).unwrap();
        assert!(!patterns.is_ignored("secrets", true));
        // the file still matches the unanchored `secrets` on its own
        assert!(patterns.is_ignored("secrets/key.pem", false));

        let anchored = IgnorePatterns::compile(&["^secrets/$"]).unwrap();
        assert!(!anchored.is_ignored("secrets", true));
        assert!(!anchored.is_ignored("secrets/key.pem", false));
    }

    #[test]
    fn patterns_are_unanchored() {
        let patterns = IgnorePatterns::compile(&[r"\.log$"]).unwrap();
        assert!(patterns.is_ignored("logs/today.log", false));
        assert!(!patterns.is_ignored("logs/today.txt", false));
    }

    #[test]
    fn blank_patterns_are_skipped() {
        let patterns = IgnorePatterns::compile(&["", "  ", "tmp"]).unwrap();
        assert_eq!(patterns.pattern_count(), 1);
    }

    #[test]
    fn invalid_pattern_reports_position() {
        let err = IgnorePatterns::compile(&["ok", "(unclosed"]).unwrap_err();
        match err {
            IgnoreError::InvalidPattern { index, pattern, .. } => {
                assert_eq!(index, 1);
                assert_eq!(pattern, "(unclosed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn too_many_patterns() {
        let patterns: Vec<String> = (0..=MAX_PATTERNS).map(|i| format!("p{i}")).collect();
        assert!(matches!(
            IgnorePatterns::compile(&patterns),
            Err(IgnoreError::TooManyPatterns { .. })
        ));
    }

    #[test]
    fn excluding_path_inside_root() {
        let root = PathBuf::from("/work/asset");
        let patterns = IgnorePatterns::empty()
            .excluding_path(&root, &root.join("out/demo_1_0_temp"))
            .unwrap();
        assert!(patterns.is_ignored("out/demo_1_0_temp", true));
        assert!(patterns.is_ignored("out/demo_1_0_temp/src/main.rs", false));
        assert!(!patterns.is_ignored("out/demo_1_0_temp_other", false));
        assert!(!patterns.is_ignored("out", true));
    }

    #[test]
    fn excluding_path_escapes_metacharacters() {
        let root = PathBuf::from("/work");
        let patterns = IgnorePatterns::empty()
            .excluding_path(&root, &root.join(".stubpack-config.yaml"))
            .unwrap();
        assert!(patterns.is_ignored(".stubpack-config.yaml", false));
        assert!(!patterns.is_ignored("xstubpack-configxyaml", false));
    }

    #[test]
    fn excluding_path_outside_root_is_noop() {
        let patterns = IgnorePatterns::empty()
            .excluding_path(Path::new("/work/asset"), Path::new("/tmp/elsewhere"))
            .unwrap();
        assert!(patterns.is_empty());
    }

    #[test]
    fn excluding_root_itself_is_noop() {
        let root = PathBuf::from("/work/asset");
        let patterns = IgnorePatterns::empty().excluding_path(&root, &root).unwrap();
        assert!(patterns.is_empty());
    }

    #[test]
    fn relative_slash_path_uses_forward_slashes() {
        let root = PathBuf::from("/a");
        assert_eq!(
            relative_slash_path(&root, &root.join("b").join("c.txt")).as_deref(),
            Some("b/c.txt")
        );
        assert_eq!(relative_slash_path(&root, Path::new("/z")), None);
    }
}
