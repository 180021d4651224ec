use super::ImportTracker;

#[test]
fn local_namespace_is_never_imported() {
    let mut imports = ImportTracker::new("example.com/api/v1");

    assert_eq!(imports.add("example.com/api/v1"), None);
    assert!(imports.is_empty());
}

#[test]
fn collisions_join_more_segments() {
    let mut imports = ImportTracker::new("example.com/internal/core");

    assert_eq!(imports.add("example.com/api/v1").as_deref(), Some("v1"));
    assert_eq!(imports.add("k8s.io/api/core/v1").as_deref(), Some("corev1"));
    assert_eq!(imports.add("example.com/api/v1").as_deref(), Some("v1"));
    assert_eq!(imports.local_name("k8s.io/api/core/v1"), Some("corev1"));

    insta::assert_snapshot!(imports.lines().join("\n"), @r#"
    "example.com/api/v1"
    corev1 "k8s.io/api/core/v1"
    "#);
}

#[test]
fn names_are_sanitized() {
    let mut imports = ImportTracker::new("example.com/local");

    assert_eq!(imports.add("example.com/go-client").as_deref(), Some("goclient"));
    assert_eq!(imports.add("example.com/2fa").as_deref(), Some("examplecom2fa"));

    insta::assert_snapshot!(imports.lines().join("\n"), @r#"
    examplecom2fa "example.com/2fa"
    goclient "example.com/go-client"
    "#);
}

#[test]
fn numeric_suffix_is_last_resort() {
    let mut imports = ImportTracker::new("example.com/local");

    assert_eq!(imports.add("api").as_deref(), Some("api"));
    assert_eq!(imports.add("pkg/api").as_deref(), Some("pkgapi"));
    assert_eq!(imports.add("pkgapi").as_deref(), Some("pkgapi2"));
}
