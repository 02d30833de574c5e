//! Artifact naming
//!
//! The temp name `<name>_<version with dots as underscores>` identifies one
//! (name, version) pair. It is the workspace suffix, the default remote object
//! name and the build output hint.

/// Names the build tool reserves for its own output directories; none of
/// them can be a binary target name.
pub const RESERVED_NAMES: &[&str] = &["build", "deps", "examples", "incremental"];

/// Derive the temp name for an asset.
///
/// Pure function of its inputs: `name_for_temp("demo", "2.3.1") == "demo_2_3_1"`.
pub fn name_for_temp(name: &str, version: &str) -> String {
    format!("{}_{}", name, version.replace('.', "_"))
}

/// Remote object key for a packed asset: `<folder>/<name>/<object>`.
///
/// Empty folder segments are dropped so a missing folder does not produce a
/// leading slash.
pub fn object_key(folder: Option<&str>, name: &str, object: &str) -> String {
    folder
        .map(|f| f.trim_matches('/'))
        .filter(|f| !f.is_empty())
        .into_iter()
        .chain([name, object])
        .collect::<Vec<_>>()
        .join("/")
}

/// Rust identifier for the stub's inner module, derived from the asset name.
///
/// Lowercases, maps anything outside `[a-z0-9_]` to `_` and appends `_stub`
/// so the result can never collide with a keyword.
pub fn module_ident(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if ident.chars().next().map_or(true, |c| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident.push_str("_stub");
    ident
}

/// Check that an asset name can serve as a binary and package name.
pub fn is_valid_asset_name(name: &str) -> bool {
    if RESERVED_NAMES.contains(&name) {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        }
        _ => false,
    }
}

/// Check that a version can be folded into the temp name.
///
/// The temp name is one path segment of the workspace and one segment of
/// the object key, so separators and parent references are refused.
pub fn is_valid_asset_version(version: &str) -> bool {
    !version.trim().is_empty()
        && !version.contains(['/', '\\', '\0'])
        && !version.contains("..")
}
