//! Property tests for API version resolution
//!
//! These tests verify that:
//! - Canonical version strings round-trip through parsing and formatting
//! - Version ordering is a total order consistent with equality
//! - Endpoint matching honors member mappings and is deterministic

#[cfg(test)]
mod tests {
    use crate::*;
    use proptest::prelude::*;
    use std::cmp::Ordering;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn version_strategy() -> impl Strategy<Value = ApiVersion> {
        (
            0u32..20,
            0u32..20,
            prop::option::of("[a-zA-Z0-9][a-zA-Z0-9.-]{0,7}"),
        )
            .prop_map(|(major, minor, status)| {
                let version = ApiVersion::new(major, minor);
                match status {
                    Some(status) => version.with_status(status).unwrap(),
                    None => version,
                }
            })
    }

    fn hash_of(version: &ApiVersion) -> u64 {
        let mut hasher = DefaultHasher::new();
        version.hash(&mut hasher);
        hasher.finish()
    }

    // Property: canonical strings round-trip
    //
    // For any canonical version string s, format(parse(s)) == s.
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_canonical_round_trip(version in version_strategy()) {
            let text = version.to_string();
            let parsed = ApiVersion::parse(&text).unwrap();

            prop_assert_eq!(parsed.to_string(), text.clone());
            prop_assert_eq!(&parsed, &version);

            let group = version.format(VersionFormat::GroupName);
            prop_assert_eq!(ApiVersion::from_group_name(&group).unwrap(), version);
        }

        #[test]
        fn prop_order_consistent_with_equality(
            a in version_strategy(),
            b in version_strategy(),
        ) {
            prop_assert_eq!(a.cmp(&b) == Ordering::Equal, a == b);
            prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
            if a == b {
                prop_assert_eq!(hash_of(&a), hash_of(&b));
            }
        }

        #[test]
        fn prop_order_is_transitive(
            a in version_strategy(),
            b in version_strategy(),
            c in version_strategy(),
        ) {
            let mut sorted = [a, b, c];
            sorted.sort();
            prop_assert!(sorted[0] <= sorted[1]);
            prop_assert!(sorted[1] <= sorted[2]);
            prop_assert!(sorted[0] <= sorted[2]);
        }

        #[test]
        fn prop_status_case_is_ignored(
            major in 0u32..100,
            minor in 0u32..100,
            status in "[a-z]{1,8}",
        ) {
            let lower = ApiVersion::new(major, minor).with_status(status.clone()).unwrap();
            let upper = ApiVersion::new(major, minor)
                .with_status(status.to_ascii_uppercase())
                .unwrap();

            prop_assert_eq!(&lower, &upper);
            prop_assert_eq!(hash_of(&lower), hash_of(&upper));
        }

        #[test]
        fn prop_reader_never_rejects(token in "\\PC{0,16}") {
            let request = RawRequest::new("/").query("api-version", token.clone());
            let tokens = VersionReader::query().read(&request);

            if token.trim().is_empty() {
                prop_assert!(tokens.is_empty());
            } else {
                prop_assert_eq!(tokens, vec![token.trim().to_string()]);
            }
        }
    }

    // Property: member mappings are honored
    //
    // A member mapped to a subset of its group's versions only ever matches
    // versions in that subset, and resolution is deterministic.
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_member_mapping_is_honored(
            declared in prop::collection::btree_set(0u32..6, 1..5),
            pick in any::<prop::sample::Index>(),
            requested in 0u32..8,
        ) {
            let declared: Vec<ApiVersion> =
                declared.into_iter().map(|m| ApiVersion::new(m, 0)).collect();
            let mapped = pick.get(&declared).clone();

            let mut builder = ConventionBuilder::new();
            let group = builder.group("Orders");
            for version in &declared {
                group.declare_version(version.clone());
            }
            group.member("Patch").map_to_version(mapped.clone());
            let table = builder.build().unwrap();
            let candidates = [table.endpoint("Orders", "Patch").unwrap()];

            let policy = VersionMatcherPolicy::default();
            let request = ApiVersion::new(requested, 0);
            let tokens = vec![request.to_string()];
            let first = policy.resolve_tokens(tokens.clone(), &candidates);
            let second = policy.resolve_tokens(tokens, &candidates);

            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.is_ok(), request == mapped);
            if !first.is_ok() {
                let is_unsupported = matches!(
                    first.classification(),
                    Classification::Unsupported { .. }
                );
                prop_assert!(is_unsupported);
            }
        }
    }

    #[test]
    fn test_ordering_examples() {
        let v = |text: &str| ApiVersion::parse(text).unwrap();

        assert!(v("1.0") < v("1.1"));
        assert!(v("1.1") < v("2.0"));
        assert!(v("1.0") < v("1.0-beta"));
        assert!(v("1.0-alpha") < v("1.0-Beta"));
    }

    #[test]
    fn test_end_to_end_with_sunset() {
        use chrono::{TimeZone, Utc};

        let mut conventions = ConventionBuilder::new();
        conventions
            .group("OrdersController")
            .declare_deprecated_version(ApiVersion::new(1, 0))
            .declare_version(ApiVersion::new(2, 0));
        let table = conventions.build().unwrap();
        let candidates = [table.endpoint("OrdersController", "Get").unwrap()];

        let mut sunset = SunsetPolicyManager::new();
        sunset
            .add_policy(
                Some("Orders"),
                Some(ApiVersion::new(1, 0)),
                SunsetPolicy::new().effective(Utc.with_ymd_and_hms(2027, 3, 1, 0, 0, 0).unwrap()),
            )
            .unwrap();

        let policy = VersionMatcherPolicy::new(VersioningOptions::new().report_api_versions(true));
        let request = RawRequest::new("/orders").query("api-version", "1.0");
        let resolution = policy.resolve(&request, &candidates);

        assert!(resolution.is_deprecated());
        assert_eq!(
            policy.response_headers(&resolution, &sunset),
            vec![
                ("api-supported-versions", "2.0".to_string()),
                ("api-deprecated-versions", "1.0".to_string()),
                ("sunset", "Mon, 01 Mar 2027 00:00:00 GMT".to_string()),
            ]
        );
    }
}
