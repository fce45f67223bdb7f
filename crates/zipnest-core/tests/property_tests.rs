//! Property-based tests for archive classification and path derivation.
//!
//! These tests use proptest to generate arbitrary names and verify the
//! naming and filtering rules hold across a wide range of cases.

use proptest::prelude::*;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::Path;
use std::path::PathBuf;
use zipnest_core::artifacts;
use zipnest_core::config::ExtractionTool;
use zipnest_core::extract::fallback_path;
use zipnest_core::extract::sibling_output_dir;
use zipnest_core::types::ProcessedSet;

fn any_case(word: &'static str) -> impl Strategy<Value = String> {
    prop::collection::vec(any::<bool>(), word.len()).prop_map(move |upper| {
        word.chars()
            .zip(upper)
            .map(|(c, u)| if u { c.to_ascii_uppercase() } else { c })
            .collect()
    })
}

proptest! {
    /// The output directory is a sibling named after the archive stem.
    #[test]
    fn prop_sibling_output_dir_strips_extension(
        dirs in prop::collection::vec("[a-z0-9]{1,8}", 0..4),
        stem in "[a-zA-Z0-9_-]{1,20}",
        ext in any_case("zip"),
    ) {
        let parent: PathBuf = std::iter::once("/srv".to_string()).chain(dirs).collect();
        let archive = parent.join(format!("{stem}.{ext}"));

        let expected = format!("{stem}_extracted");

        let out = sibling_output_dir(&archive);

        prop_assert_eq!(out.parent(), Some(parent.as_path()));
        prop_assert_eq!(out.file_name(), Some(OsStr::new(&expected)));
    }

    /// `.zip` is recognized in every letter case; other extensions are not.
    #[test]
    fn prop_zip_extension_case_insensitive(
        stem in "[a-z0-9]{1,12}",
        ext in any_case("zip"),
        other in "[a-y]{1,4}",
    ) {
        let zip_name = format!("{stem}.{ext}");
        let other_name = format!("{stem}.{other}");
        prop_assert!(artifacts::has_zip_extension(Path::new(&zip_name)));
        prop_assert!(!artifacts::has_zip_extension(Path::new(&other_name)));
    }

    /// Companions and anything under `__MACOSX` are never real zips.
    #[test]
    fn prop_metadata_never_real_zip(
        stem in "[a-zA-Z0-9]{1,12}",
        above in prop::collection::vec("[a-z]{1,6}", 0..3),
        below in prop::collection::vec("[a-z]{1,6}", 0..3),
    ) {
        let root = Path::new("/srv/out");
        let mut inside = root.to_path_buf();
        inside.extend(&above);
        inside.push("__MACOSX");
        inside.extend(&below);
        let real = {
            let mut p = root.to_path_buf();
            p.extend(&above);
            p.join(format!("{stem}.zip"))
        };

        prop_assert!(artifacts::is_real_zip(&real, root));
        let resource_fork = real.with_file_name(format!("._{stem}.zip"));
        let under_macosx = inside.join(format!("{stem}.zip"));
        prop_assert!(!artifacts::is_real_zip(&resource_fork, root));
        prop_assert!(!artifacts::is_real_zip(&under_macosx, root));
    }

    /// Fallback directories are timestamped siblings of the preferred path.
    #[test]
    fn prop_fallback_is_timestamped_sibling(
        name in "[a-zA-Z0-9_]{1,20}",
        millis in any::<u64>(),
    ) {
        let preferred = Path::new("/srv/out").join(&name);

        let expected = format!("{name}_{millis}");

        let fallback = fallback_path(&preferred, u128::from(millis));

        prop_assert_eq!(fallback.parent(), preferred.parent());
        prop_assert_eq!(fallback.file_name(), Some(OsStr::new(&expected)));
    }

    /// Each distinct path can be claimed exactly once.
    #[test]
    fn prop_processed_set_claims_once(
        names in prop::collection::vec("[a-d]{1,3}", 0..40),
    ) {
        let mut processed = ProcessedSet::new();
        let claimed = names
            .iter()
            .filter(|n| processed.claim(&Path::new("/out").join(format!("{n}.zip"))))
            .count();
        let distinct: HashSet<_> = names.iter().collect();

        prop_assert_eq!(claimed, distinct.len());
        prop_assert_eq!(processed.len(), distinct.len());
    }

    /// Tool names parse in any letter case.
    #[test]
    fn prop_tool_names_parse_any_case(name in any_case("unzip")) {
        prop_assert_eq!(name.parse::<ExtractionTool>(), Ok(ExtractionTool::Unzip));
    }
}
