//! Property tests for ignore patterns.

use std::path::Path;

use proptest::prelude::*;

use stubpack::domain::value_objects::IgnorePatterns;

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_.+()\\[\\]-]{1,8}")
        .unwrap()
        .prop_filter("not a dot segment", |s| s != "." && s != "..")
}

proptest! {
    /// PROPERTY: an implicit exclusion matches exactly the path and what lies below it,
    /// even when the path contains regex metacharacters.
    #[test]
    fn property_excluded_path_covers_subtree_only(
        parts in proptest::collection::vec(segment(), 1..=3),
        child in segment(),
        sibling in segment(),
    ) {
        let rel = parts.join("/");
        let root = Path::new("/asset");
        let patterns = IgnorePatterns::empty()
            .excluding_path(root, &root.join(&rel))
            .unwrap();

        prop_assert!(patterns.is_ignored(&rel, false));
        prop_assert!(patterns.is_ignored(&rel, true));
        let below = format!("{}/{}", rel, child);
        prop_assert!(patterns.is_ignored(&below, false));

        let other = format!("{}{}", rel, sibling);
        prop_assert!(!patterns.is_ignored(&other, false));
    }

    /// PROPERTY: compiling arbitrary input never panics.
    #[test]
    fn property_compile_never_panics(raw in proptest::collection::vec(".{0,12}", 0..=4)) {
        let _ = IgnorePatterns::compile(&raw);
    }
}
