use convgen_core::Namespace;

use crate::options::Options;
use crate::tags::{TagReader, function_directives};
use crate::tracker::Directives;

fn lines(values: &[&str]) -> Vec<String> {
    values.iter().map(|line| line.to_string()).collect()
}

#[test]
fn type_tags() {
    let options = Options::new();
    let tags = TagReader::new(&options);
    let opted_out = lines(&["Pod is a group.", "+conversion-gen=false"]);
    let no_public = lines(&["+conversion-gen=no-public", "+conversion-gen=peerName:Spec"]);

    assert!(tags.opted_out(&opted_out));
    assert!(!tags.no_public(&opted_out));
    assert!(tags.no_public(&no_public));
    assert_eq!(tags.peer_name(&no_public), Some("Spec"));
    assert_eq!(tags.peer_name(&opted_out), None);
}

#[test]
fn malformed_options_are_ignored() {
    let options = Options::new();
    let tags = TagReader::new(&options);

    assert_eq!(tags.peer_name(&lines(&["+conversion-gen=peerName:a:b"])), None);
    assert_eq!(tags.peer_name(&lines(&["+conversion-gen=peerName"])), None);
}

#[test]
fn custom_tag_names() {
    let options = Options::new().tag_name("convert");
    let tags = TagReader::new(&options);

    assert!(tags.opted_out(&lines(&["+convert=false"])));
    assert!(!tags.opted_out(&lines(&["+conversion-gen=false"])));
}

#[test]
fn function_tags() {
    assert_eq!(
        function_directives("conversion-gen", &lines(&["+conversion-gen=drop"])),
        Directives {
            drop: true,
            copy_only: false,
        }
    );
    assert_eq!(
        function_directives("conversion-gen", &lines(&["+conversion-gen=copy-only"])),
        Directives {
            drop: false,
            copy_only: true,
        }
    );
    assert_eq!(
        function_directives("conversion-fn", &lines(&["+conversion-gen=drop"])),
        Directives::default()
    );
}

#[test]
fn namespace_tags() {
    let options = Options::new()
        .peer_namespaces_tag_name("peers")
        .base_peer_namespaces(["example.com/base", "example.com/b"]);
    let tags = TagReader::new(&options);
    let mut namespace = Namespace::new("example.com/api/v1");
    namespace.comment_lines = lines(&[
        "+peers=example.com/a, example.com/b",
        "+peers=",
        "+conversion-gen-extra-imports=example.com/extra",
        "+conversion-gen-extra-imports= ",
    ]);

    assert_eq!(
        tags.peer_namespaces(&namespace),
        ["example.com/a", "example.com/b", "example.com/base"]
    );
    assert_eq!(tags.extra_imports(&namespace), ["example.com/extra"]);
}
