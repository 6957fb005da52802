//! Property-based tests for destination path resolution.
//!
//! These tests use proptest to generate random teams and repository names
//! and verify that resolution is deterministic and collision-free.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{resolve, validate_repo_name};
    use crate::team::StudentTeam;
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn members() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-z-][a-z0-9_%-]{0,5}", 1..4)
    }

    // ============================================================================
    // resolve property tests
    // ============================================================================

    proptest! {
        /// Property: resolve is deterministic (same input = same output)
        #[test]
        fn resolve_is_deterministic(
            team in members(),
            repo in "[a-z0-9][a-z0-9-]{0,12}",
        ) {
            let team = StudentTeam::new(&team).unwrap();
            let root = PathBuf::from("root");
            prop_assert_eq!(resolve(&root, &team, &repo), resolve(&root, &team, &repo));
        }

        /// Property: distinct (team, repo) pairs never share a destination
        #[test]
        fn resolve_is_collision_free(
            a in members(),
            b in members(),
            repo_a in "[a-z0-9][a-z0-9-]{0,12}",
            repo_b in "[a-z0-9][a-z0-9-]{0,12}",
        ) {
            let team_a = StudentTeam::new(&a).unwrap();
            let team_b = StudentTeam::new(&b).unwrap();
            let root = PathBuf::from("root");

            let same_pair = team_a == team_b && repo_a == repo_b;
            let same_path = resolve(&root, &team_a, &repo_a) == resolve(&root, &team_b, &repo_b);
            prop_assert_eq!(same_pair, same_path);
        }

        /// Property: the destination always lives two levels below root
        #[test]
        fn resolve_stays_under_root(
            team in members(),
            repo in "[a-z0-9][a-z0-9-]{0,12}",
        ) {
            let team = StudentTeam::new(&team).unwrap();
            let root = PathBuf::from("/srv/course");
            let path = resolve(&root, &team, &repo);
            prop_assert!(path.starts_with(&root));
            prop_assert_eq!(path.components().count(), root.components().count() + 2);
        }
    }

    // ============================================================================
    // validate_repo_name property tests
    // ============================================================================

    proptest! {
        /// Property: names containing a separator are always rejected
        #[test]
        fn validate_rejects_separators(
            prefix in "[a-z]{0,5}",
            sep in "[/\\\\]",
            suffix in "[a-z]{0,5}",
        ) {
            let name = format!("{}{}{}", prefix, sep, suffix);
            prop_assert!(validate_repo_name(&name).is_err());
        }

        /// Property: plain slug names are always accepted
        #[test]
        fn validate_accepts_slugs(name in "[a-zA-Z0-9_][a-zA-Z0-9_.-]{0,20}") {
            prop_assume!(name != "." && name != "..");
            prop_assert!(validate_repo_name(&name).is_ok());
        }
    }
}
