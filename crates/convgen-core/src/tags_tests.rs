use crate::{extract_comment_tags, tag_values};

fn lines(input: &[&str]) -> Vec<String> {
    input.iter().map(|s| s.to_string()).collect()
}

#[test]
fn extracts_key_value_tags() {
    let lines = lines(&[
        "Pod is a collection of containers.",
        "+conversion-gen=false",
        "  +conversion-gen=peerName:Thing  ",
        "+genclient",
    ]);
    let tags = extract_comment_tags("+", &lines);

    assert_eq!(tags["conversion-gen"], vec!["false", "peerName:Thing"]);
    assert_eq!(tags["genclient"], vec![""]);
    assert_eq!(tags.len(), 2);
}

#[test]
fn value_keeps_everything_after_first_equals() {
    let lines = lines(&["+tag=a=b"]);
    assert_eq!(tag_values("+", "tag", &lines), vec!["a=b"]);
}

#[test]
fn missing_tag_yields_no_values() {
    let lines = lines(&["no tags here"]);
    assert!(tag_values("+", "conversion-gen", &lines).is_empty());
}
