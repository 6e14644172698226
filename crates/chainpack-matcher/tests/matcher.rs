use chainpack_config::NodeModulesTransform;
use chainpack_matcher::{
    BoundaryResolver, MatcherError, MemoryFs, NativeFs, PackageMatchRuleSet, PackageMatcher,
};
use proptest::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn node_modules() -> MemoryFs {
    MemoryFs::new()
        .with_package("/app", "app", "0.1.0")
        .with_package("/app/node_modules/lodash", "lodash", "4.17.0")
        .with_package("/app/node_modules/some-es2020-pkg", "some-es2020-pkg", "1.0.0")
        .with_package("/app/node_modules/query-string", "query-string", "6.13.1")
        .with_package("/app/node_modules/nanoid", "nanoid", "3.3.0")
}

fn matcher_for(policy: &NodeModulesTransform) -> (Arc<MemoryFs>, PackageMatcher) {
    let fs = Arc::new(node_modules());
    let resolver = Arc::new(BoundaryResolver::new(fs.clone()));
    let rules = PackageMatchRuleSet::from_policy(policy).unwrap();
    (fs, PackageMatcher::new(rules, resolver))
}

#[test]
fn blanket_policy_skips_default_exclusions() {
    let (_, matcher) = matcher_for(&NodeModulesTransform::all());
    assert!(!matcher.matches(Path::new("/app/node_modules/lodash/lodash.js")));
}

#[test]
fn blanket_policy_transpiles_unlisted_packages() {
    let (_, matcher) = matcher_for(&NodeModulesTransform::all());
    assert!(matcher.matches(Path::new("/app/node_modules/nanoid/index.js")));
    assert!(matcher.matches(Path::new("/app/node_modules/some-es2020-pkg/lib/a.js")));
}

#[test]
fn selective_policy_transpiles_listed_version() {
    let policy = NodeModulesTransform::none().include("some-es2020-pkg@1.0.0");
    let (_, matcher) = matcher_for(&policy);
    assert!(matcher.matches(Path::new("/app/node_modules/some-es2020-pkg/index.js")));
}

#[test]
fn selective_policy_skips_unlisted_packages() {
    let policy = NodeModulesTransform::none().include("some-es2020-pkg@2.0.0");
    let (_, matcher) = matcher_for(&policy);
    assert!(!matcher.matches(Path::new("/app/node_modules/some-es2020-pkg/index.js")));
    assert!(!matcher.matches(Path::new("/app/node_modules/nanoid/index.js")));
    assert!(matcher.matches(Path::new("/app/node_modules/query-string/index.js")));
}

#[test]
fn stray_files_in_node_modules_are_not_transpiled() {
    let (_, matcher) = matcher_for(&NodeModulesTransform::all());
    assert!(!matcher.matches(Path::new("/app/node_modules/.bin/tool.js")));
    assert!(!matcher.matches(Path::new("/elsewhere/file.js")));
}

#[test]
fn repeated_lookups_hit_the_cache() {
    let (fs, matcher) = matcher_for(&NodeModulesTransform::all());
    let path = Path::new("/app/node_modules/nanoid/async/index.js");

    assert!(matcher.matches(path));
    let lookups = fs.lookups();
    for _ in 0..10 {
        assert!(matcher.matches(path));
    }
    assert!(matcher.matches(Path::new("/app/node_modules/nanoid/async/other.js")));
    assert_eq!(fs.lookups(), lookups);
}

#[test]
fn conflicting_include_and_exclude_is_rejected() {
    let policy = NodeModulesTransform::all().include("lodash").exclude("lodash@4");
    let err = PackageMatchRuleSet::from_policy(&policy).unwrap_err();
    assert!(matches!(err, MatcherError::InvalidRuleSet { .. }));
}

#[test]
fn malformed_user_specifier_is_rejected() {
    let policy = NodeModulesTransform::none().include("@broken");
    let err = PackageMatchRuleSet::from_policy(&policy).unwrap_err();
    assert!(matches!(err, MatcherError::InvalidRuleSet { .. }));
}

#[test]
fn native_fs_resolves_installed_packages() {
    let dir = TempDir::new().unwrap();
    let pkg = dir.path().join("node_modules/moment");
    fs::create_dir_all(pkg.join("locale")).unwrap();
    fs::write(
        pkg.join("package.json"),
        r#"{ "name": "moment", "version": "2.29.4" }"#,
    )
    .unwrap();

    let resolver = Arc::new(BoundaryResolver::new(Arc::new(NativeFs::new())));
    let rules = PackageMatchRuleSet::from_policy(&NodeModulesTransform::all()).unwrap();
    let matcher = PackageMatcher::new(rules, resolver);

    let file = pkg.join("locale/de.js");
    assert!(!matcher.matches(&file));
    assert_eq!(
        matcher.owning_package(&file).unwrap().version(),
        Some("2.29.4")
    );
}

#[test]
fn nested_module_type_marker_keeps_owning_package() {
    let dir = TempDir::new().unwrap();
    let pkg = dir.path().join("node_modules/dual-pkg");
    fs::create_dir_all(pkg.join("dist/esm")).unwrap();
    fs::write(
        pkg.join("package.json"),
        r#"{ "name": "dual-pkg", "version": "2.0.0" }"#,
    )
    .unwrap();
    fs::write(pkg.join("dist/esm/package.json"), r#"{ "type": "module" }"#).unwrap();

    let resolver = Arc::new(BoundaryResolver::new(Arc::new(NativeFs::new())));
    let rules = PackageMatchRuleSet::from_policy(&NodeModulesTransform::all()).unwrap();
    let matcher = PackageMatcher::new(rules, resolver);

    assert!(matcher.matches(&pkg.join("index.js")));
    assert!(matcher.matches(&pkg.join("dist/esm/index.js")));
    assert_eq!(
        matcher.owning_package(&pkg.join("dist/esm/index.js")).unwrap().root,
        pkg
    );
}

const PACKAGES: [&str; 4] = ["lodash", "some-es2020-pkg", "query-string", "nanoid"];

fn module_path(pkg: usize, depth: usize) -> PathBuf {
    let mut path = PathBuf::from("/app/node_modules").join(PACKAGES[pkg]);
    for level in 0..depth {
        path.push(format!("d{level}"));
    }
    path.join("index.js")
}

proptest! {
    #[test]
    fn matching_is_independent_of_call_order(
        calls in prop::collection::vec((0usize..4, 0usize..4), 1..40),
        selective in any::<bool>(),
    ) {
        let policy = if selective {
            NodeModulesTransform::none().include("some-es2020-pkg@1.0.0")
        } else {
            NodeModulesTransform::all()
        };

        let (_, warm) = matcher_for(&policy);
        for (pkg, depth) in &calls {
            let path = module_path(*pkg, *depth);
            let (_, cold) = matcher_for(&policy);
            prop_assert_eq!(warm.matches(&path), cold.matches(&path));
        }
    }

    #[test]
    fn decision_depends_only_on_owning_package(pkg in 0usize..4, a in 0usize..6, b in 0usize..6) {
        let (_, matcher) = matcher_for(&NodeModulesTransform::all());
        prop_assert_eq!(
            matcher.matches(&module_path(pkg, a)),
            matcher.matches(&module_path(pkg, b))
        );
    }
}
