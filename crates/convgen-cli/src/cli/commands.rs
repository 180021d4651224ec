//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Arguments shared by every command that runs the generator.
fn with_generation_args(cmd: Command) -> Command {
    cmd.arg(universe_arg())
        .arg(input_arg())
        .arg(skip_unsafe_arg())
        .arg(tag_name_arg())
        .arg(function_tag_name_arg())
        .arg(peer_namespaces_tag_name_arg())
        .arg(extra_imports_tag_name_arg())
        .arg(base_peer_namespaces_arg())
        .arg(no_public_on_error_arg())
        .arg(extra_param_arg())
        .arg(build_tag_arg())
        .arg(header_file_arg())
        .arg(verbose_arg())
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("convgen")
        .about("Generate conversion functions between peer type graphs")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(generate_command())
        .subcommand(check_command())
}

/// Render conversion functions as Go source.
pub fn generate_command() -> Command {
    let cmd = Command::new("generate")
        .about("Generate conversion functions")
        .override_usage("  convgen generate <UNIVERSE> -i <NAMESPACE>... [-o <FILE>]")
        .after_help(
            r#"EXAMPLES:
  convgen generate types.json -i example.com/api/v1
  convgen generate types.json -i example.com/api/v1 -o zz_generated.conversion.go
  convgen generate types.json -i example.com/api/v1 --extra-param 'scope:example.com/conversion.Scope'"#,
        )
        .arg(output_arg());

    with_generation_args(cmd)
}

/// Report what would be generated without rendering it.
pub fn check_command() -> Command {
    let cmd = Command::new("check")
        .about("Report conversion visibility, field errors and warnings")
        .override_usage("  convgen check <UNIVERSE> -i <NAMESPACE>... [--format <FORMAT>] [--strict]")
        .after_help(
            r#"EXAMPLES:
  convgen check types.json -i example.com/api/v1
  convgen check types.json -i example.com/api/v1 --format json
  convgen check types.json -i example.com/api/v1 --no-public-conversion-function-on-error --strict"#,
        )
        .arg(format_arg())
        .arg(strict_arg());

    with_generation_args(cmd)
}
