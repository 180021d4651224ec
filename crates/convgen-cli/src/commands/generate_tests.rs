use convgen_compiler::render::GoConfig;
use convgen_compiler::{Converter, Options};
use convgen_core::{Member, Universe};

use super::common::{CliError, GenerationArgs};
use super::generate::{GenerateArgs, execute, render_sources};

#[test]
fn files_are_separated_by_a_blank_line() {
    let mut universe = Universe::new();
    let string = universe.builtin("string");
    for (home, peer) in [
        ("example.com/api/v1", "example.com/internal/core"),
        ("example.com/api/v2", "example.com/internal/core"),
    ] {
        universe
            .namespace_mut(home)
            .comment_lines
            .push(format!("+conversion-gen={peer}"));
        universe.add_record(home, "Pod", vec![Member::new("Name", string)]);
    }
    universe.add_record("example.com/internal/core", "Pod", vec![Member::new("Name", string)]);
    let inputs = ["example.com/api/v1".to_string(), "example.com/api/v2".to_string()];
    let files = Converter::new(&universe, Options::new()).run(&inputs).unwrap();
    let config = GoConfig::new().indent("    ").build_tag("");

    let source = render_sources(&universe, &files, &config);

    let packages: Vec<&str> = source.lines().filter(|line| line.starts_with("package ")).collect();
    assert_eq!(packages, ["package v1", "package v2"]);
    assert!(source.contains("}\n\n// Code generated by convgen. DO NOT EDIT.\n\npackage v2\n"));
}

#[test]
fn writes_output_file_with_header() {
    let dir = tempfile::tempdir().unwrap();
    let universe_path = dir.path().join("types.json");
    let header_path = dir.path().join("header.txt");
    let output_path = dir.path().join("zz_generated.conversion.go");
    std::fs::write(
        &universe_path,
        r#"{
          "namespaces": [
            {
              "path": "example.com/api/v1",
              "comments": ["+conversion-gen=example.com/internal/core"],
              "types": [{"kind": "record", "name": "Pod", "members": [{"name": "Name", "type": "string"}]}]
            },
            {
              "path": "example.com/internal/core",
              "types": [{"kind": "record", "name": "Pod", "members": [{"name": "Name", "type": "string"}]}]
            }
          ]
        }"#,
    )
    .unwrap();
    std::fs::write(&header_path, "// Copyright The Pod Authors.\n").unwrap();
    let args = GenerateArgs {
        generation: GenerationArgs {
            universe: universe_path,
            inputs: vec!["example.com/api/v1".to_string()],
            header_file: Some(header_path),
            ..GenerationArgs::default()
        },
        output: Some(output_path.clone()),
    };

    execute(&args).unwrap();

    let source = std::fs::read_to_string(&output_path).unwrap();
    assert!(source.starts_with(
        "// Copyright The Pod Authors.\n\n// +build !ignore_autogenerated\n\n// Code generated by convgen. DO NOT EDIT.\n\npackage v1\n"
    ));
    assert!(source.contains("func Convert_core_Pod_To_v1_Pod(in *core.Pod, out *Pod) error {\n"));
}

#[test]
fn unreadable_universe_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let universe_path = dir.path().join("types.json");
    std::fs::write(&universe_path, "{\"namespaces\": 3}").unwrap();
    let args = GenerateArgs {
        generation: GenerationArgs {
            universe: universe_path,
            inputs: vec!["example.com/api/v1".to_string()],
            ..GenerationArgs::default()
        },
        output: None,
    };

    let error = execute(&args).unwrap_err();

    assert!(matches!(error, CliError::TypeGraph { .. }));
}
