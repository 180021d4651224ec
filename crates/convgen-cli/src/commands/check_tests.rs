use convgen_compiler::{Converter, Options};
use convgen_core::load_universe;
use indoc::indoc;

use super::check::Report;
use super::common::CliError;

const GRAPH: &str = indoc! {r#"
    {
      "namespaces": [
        {
          "path": "example.com/api/v1",
          "comments": ["+conversion-gen=example.com/internal/core"],
          "types": [
            {
              "kind": "record",
              "name": "Pod",
              "members": [
                {"name": "Name", "type": "string"},
                {"name": "NodeName", "type": "string"}
              ]
            },
            {
              "kind": "record",
              "name": "Service",
              "comments": ["+conversion-gen=no-public"],
              "members": [{"name": "Port", "type": "int32"}]
            }
          ]
        },
        {
          "path": "example.com/internal/core",
          "types": [
            {
              "kind": "record",
              "name": "Pod",
              "members": [{"name": "Name", "type": "string"}]
            },
            {
              "kind": "record",
              "name": "Service",
              "members": [{"name": "Port", "type": "int64"}]
            }
          ]
        }
      ]
    }
"#};

fn report(options: Options) -> (Report, usize) {
    let universe = load_universe(GRAPH).unwrap();
    let files = Converter::new(&universe, options)
        .run(&["example.com/api/v1".to_string()])
        .unwrap();
    (
        Report::new(&universe, &files),
        Report::suppressed_by_errors(&files),
    )
}

#[test]
fn text_report() {
    let (report, suppressed) = report(Options::new());

    assert_eq!(suppressed, 0);
    insta::assert_snapshot!(report.render_text(), @r"
    example.com/api/v1 (4 conversions, 2 public)
      Convert_v1_Pod_To_core_Pod: public
        warning: example.com/api/v1.Pod.NodeName: requires manual conversion: does not exist in peer-type example.com/internal/core.Pod
      Convert_core_Pod_To_v1_Pod: public
      Convert_v1_Service_To_core_Service: suppressed (example.com/api/v1.Service opted out of public conversions)
      Convert_core_Service_To_v1_Service: suppressed (example.com/api/v1.Service opted out of public conversions)
    ");
}

#[test]
fn json_report_with_failing_handlers() {
    let (report, suppressed) = report(Options::new().no_public_conversion_on_error());

    assert_eq!(suppressed, 1);
    insta::assert_snapshot!(report.render_json().unwrap(), @r#"
    {
      "files": [
        {
          "namespace": "example.com/api/v1",
          "conversions": [
            {
              "function": "Convert_v1_Pod_To_core_Pod",
              "state": "suppressed",
              "reason": "1 field error",
              "field_errors": [
                "example.com/api/v1.Pod.NodeName: field NodeName requires manual conversion"
              ]
            },
            {
              "function": "Convert_core_Pod_To_v1_Pod",
              "state": "public"
            },
            {
              "function": "Convert_v1_Service_To_core_Service",
              "state": "suppressed",
              "reason": "example.com/api/v1.Service opted out of public conversions"
            },
            {
              "function": "Convert_core_Service_To_v1_Service",
              "state": "suppressed",
              "reason": "example.com/api/v1.Service opted out of public conversions"
            }
          ]
        }
      ]
    }
    "#);
}

#[test]
fn serialization_failures_are_errors() {
    let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();

    let error = CliError::from(source);

    assert!(matches!(error, CliError::Report(_)));
    insta::assert_snapshot!(error, @"failed to serialize report: EOF while parsing an object at line 1 column 1");
}
