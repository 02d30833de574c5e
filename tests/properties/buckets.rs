//! Property tests for bucket normalization.

use proptest::prelude::*;

use stubpack::domain::value_objects::Variant;

fn variant() -> impl Strategy<Value = Variant> {
    prop_oneof![
        Just(Variant::Fs),
        Just(Variant::Gcp),
        Just(Variant::Aws),
        Just(Variant::Azure),
    ]
}

proptest! {
    /// PROPERTY: normalizing twice is the same as normalizing once.
    #[test]
    fn property_normalize_bucket_is_idempotent(
        variant in variant(),
        bucket in "[a-z0-9][a-z0-9._/-]{0,30}",
    ) {
        let once = variant.normalize_bucket(&bucket);
        let twice = variant.normalize_bucket(&once);

        prop_assert_eq!(&once, &twice);
        prop_assert!(once.starts_with(variant.scheme()));
        prop_assert_eq!(variant.bare_bucket(&once), bucket.as_str());
    }
}
