//! Property tests for temp names and object keys.

use proptest::prelude::*;

use stubpack::domain::value_objects::{
    is_valid_asset_name, is_valid_asset_version, module_ident, name_for_temp, object_key,
    RESERVED_NAMES,
};

fn asset_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_-]{0,15}")
        .unwrap()
        .prop_filter("reserved", |name| !RESERVED_NAMES.contains(&name.as_str()))
}

fn version() -> impl Strategy<Value = String> {
    proptest::collection::vec(0u16..1000, 1..=4)
        .prop_map(|parts| parts.iter().map(u16::to_string).collect::<Vec<_>>().join("."))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: the temp name depends only on (name, version) and contains no dots.
    #[test]
    fn property_temp_name_is_pure(name in asset_name(), version in version()) {
        prop_assert!(is_valid_asset_version(&version));
        let first = name_for_temp(&name, &version);
        let second = name_for_temp(&name, &version);

        prop_assert_eq!(&first, &second);
        prop_assert!(!first.contains('.'));
        prop_assert!(!first.contains('/'));
        let expected_prefix = format!("{}_", name);
        prop_assert!(first.starts_with(&expected_prefix));
    }

    /// PROPERTY: generated names are valid and map to a usable module identifier.
    #[test]
    fn property_module_ident_is_identifier(name in asset_name()) {
        prop_assert!(is_valid_asset_name(&name));

        let ident = module_ident(&name);
        prop_assert!(ident.ends_with("_stub"));
        prop_assert!(ident.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
        prop_assert!(!ident.starts_with(|c: char| c.is_ascii_digit()));
    }

    /// PROPERTY: object keys never carry empty segments, whatever slashes the folder has.
    #[test]
    fn property_object_key_has_no_empty_segments(
        folder in proptest::option::of("/{0,2}[a-z]{0,6}(/[a-z]{1,6}){0,2}/{0,2}"),
        name in asset_name(),
        version in version(),
    ) {
        let object = name_for_temp(&name, &version);
        let key = object_key(folder.as_deref(), &name, &object);
        let expected_suffix = format!("{}/{}", name, object);

        prop_assert!(!key.starts_with('/'));
        prop_assert!(!key.contains("//"));
        prop_assert!(key.ends_with(&expected_suffix));
    }
}
