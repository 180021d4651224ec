//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` so `generate` and `check` read the
//! type graph and configure the generator the same way.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Type graph JSON file (positional).
pub fn universe_arg() -> Arg {
    Arg::new("universe")
        .value_name("UNIVERSE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Type graph JSON file")
}

/// Input namespaces (-i/--input, repeatable).
pub fn input_arg() -> Arg {
    Arg::new("inputs")
        .short('i')
        .long("input")
        .value_name("NAMESPACE")
        .required(true)
        .action(ArgAction::Append)
        .help("Namespace to generate conversions for (repeatable)")
}

/// Output file (-o/--output).
pub fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Write generated code to FILE instead of stdout")
}

/// Disable raw memory reinterpretation (--skip-unsafe).
pub fn skip_unsafe_arg() -> Arg {
    Arg::new("skip_unsafe")
        .long("skip-unsafe")
        .action(ArgAction::SetTrue)
        .help("Never reinterpret memory, even for layout-equivalent types")
}

pub fn tag_name_arg() -> Arg {
    Arg::new("tag_name")
        .long("tag-name")
        .value_name("TAG")
        .help("Tag on types and members [default: conversion-gen]")
}

pub fn function_tag_name_arg() -> Arg {
    Arg::new("function_tag_name")
        .long("function-tag-name")
        .value_name("TAG")
        .help("Tag on manual conversion functions [default: conversion-gen]")
}

pub fn peer_namespaces_tag_name_arg() -> Arg {
    Arg::new("peer_namespaces_tag_name")
        .long("peer-namespaces-tag-name")
        .value_name("TAG")
        .help("Namespace tag listing peer namespaces [default: conversion-gen]")
}

pub fn extra_imports_tag_name_arg() -> Arg {
    Arg::new("extra_imports_tag_name")
        .long("extra-imports-tag-name")
        .value_name("TAG")
        .help("Namespace tag listing extra imports [default: conversion-gen-extra-imports]")
}

/// Peer namespaces searched for every input (--base-peer-namespaces a,b).
pub fn base_peer_namespaces_arg() -> Arg {
    Arg::new("base_peer_namespaces")
        .long("base-peer-namespaces")
        .value_name("NAMESPACES")
        .value_delimiter(',')
        .action(ArgAction::Append)
        .help("Comma-separated peer namespaces searched after tagged ones")
}

pub fn no_public_on_error_arg() -> Arg {
    Arg::new("no_public_on_error")
        .long("no-public-conversion-function-on-error")
        .action(ArgAction::SetTrue)
        .help("Omit the public wrapper of any function with an unresolved member")
}

/// Extra conversion parameter (--extra-param NAME:TYPE, repeatable).
pub fn extra_param_arg() -> Arg {
    Arg::new("extra_params")
        .long("extra-param")
        .value_name("NAME:TYPE")
        .action(ArgAction::Append)
        .help("Parameter appended to every conversion function (repeatable)")
}

pub fn build_tag_arg() -> Arg {
    Arg::new("build_tag")
        .long("build-tag")
        .value_name("TAG")
        .help("Build tag excluding generated files; empty for none [default: ignore_autogenerated]")
}

pub fn header_file_arg() -> Arg {
    Arg::new("header_file")
        .long("header-file")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("File whose contents start every generated file")
}

/// Verbosity (-v debug, -vv trace).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .help("Log more (-v debug, -vv trace); RUST_LOG takes precedence")
}

/// Report format (--format).
pub fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .value_name("FORMAT")
        .default_value("text")
        .value_parser(["text", "json"])
        .help("Report format")
}

/// Fail on suppressed wrappers (--strict).
pub fn strict_arg() -> Arg {
    Arg::new("strict")
        .long("strict")
        .action(ArgAction::SetTrue)
        .help("Exit with an error when field errors suppress a public wrapper")
}
