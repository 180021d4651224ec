//! Tests for CLI dispatch logic.

use std::path::PathBuf;

use super::*;
use crate::cli::commands::{check_command, generate_command};
use crate::commands::check::{CheckArgs, ReportFormat};
use crate::commands::generate::GenerateArgs;

#[test]
fn generate_extracts_shared_flags() {
    let m = generate_command()
        .try_get_matches_from([
            "generate",
            "types.json",
            "-i",
            "example.com/api/v1",
            "--input",
            "example.com/api/v2",
            "--base-peer-namespaces",
            "example.com/a,example.com/b",
            "--extra-param",
            "scope:example.com/conversion.Scope",
            "--extra-param",
            "n:int",
            "--tag-name",
            "convert",
            "--skip-unsafe",
            "-o",
            "zz_generated.go",
            "-vv",
        ])
        .unwrap();

    let params = GenerateParams::from_matches(&m);

    assert_eq!(params.verbosity, 2);
    assert_eq!(params.output, Some(PathBuf::from("zz_generated.go")));
    let args: GenerateArgs = params.into();
    let generation = args.generation;
    assert_eq!(generation.universe, PathBuf::from("types.json"));
    assert_eq!(generation.inputs, ["example.com/api/v1", "example.com/api/v2"]);
    assert_eq!(generation.base_peer_namespaces, ["example.com/a", "example.com/b"]);
    assert_eq!(
        generation.extra_params,
        ["scope:example.com/conversion.Scope", "n:int"]
    );
    assert_eq!(generation.tag_name.as_deref(), Some("convert"));
    assert!(generation.skip_unsafe);
    assert!(!generation.no_public_on_error);
    assert_eq!(generation.build_tag, None);
}

#[test]
fn input_is_required() {
    let result = generate_command().try_get_matches_from(["generate", "types.json"]);

    assert!(result.is_err());
}

#[test]
fn empty_build_tag_is_kept() {
    let m = generate_command()
        .try_get_matches_from(["generate", "types.json", "-i", "a", "--build-tag", ""])
        .unwrap();

    let params = GenerateParams::from_matches(&m);

    assert_eq!(params.generation.build_tag.as_deref(), Some(""));
}

#[test]
fn check_defaults_to_text() {
    let m = check_command()
        .try_get_matches_from(["check", "types.json", "-i", "a"])
        .unwrap();

    let args: CheckArgs = CheckParams::from_matches(&m).into();

    assert_eq!(args.format, ReportFormat::Text);
    assert!(!args.strict);
}

#[test]
fn check_json_strict() {
    let m = check_command()
        .try_get_matches_from([
            "check",
            "types.json",
            "-i",
            "a",
            "--format",
            "json",
            "--strict",
            "--no-public-conversion-function-on-error",
        ])
        .unwrap();

    let params = CheckParams::from_matches(&m);

    assert_eq!(params.format, ReportFormat::Json);
    assert!(params.strict);
    assert!(params.generation.no_public_on_error);
    assert_eq!(params.verbosity, 0);
}

#[test]
fn unknown_format_is_rejected() {
    let result = check_command().try_get_matches_from([
        "check",
        "types.json",
        "-i",
        "a",
        "--format",
        "yaml",
    ]);

    assert!(result.is_err());
}

#[test]
fn generate_rejects_check_flags() {
    let result = generate_command().try_get_matches_from([
        "generate",
        "types.json",
        "-i",
        "a",
        "--strict",
    ]);

    assert!(result.is_err());
}

#[test]
fn verbosity_directives() {
    use crate::logging::default_directive;

    assert_eq!(default_directive(0), "warn");
    assert_eq!(default_directive(1), "debug");
    assert_eq!(default_directive(5), "trace");
}
