//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;

use crate::commands::check::{CheckArgs, ReportFormat};
use crate::commands::common::GenerationArgs;
use crate::commands::generate::GenerateArgs;

fn strings(m: &ArgMatches, id: &str) -> Vec<String> {
    m.get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

fn generation_args(m: &ArgMatches) -> GenerationArgs {
    GenerationArgs {
        universe: m.get_one::<PathBuf>("universe").cloned().unwrap_or_default(),
        inputs: strings(m, "inputs"),
        skip_unsafe: m.get_flag("skip_unsafe"),
        tag_name: m.get_one::<String>("tag_name").cloned(),
        function_tag_name: m.get_one::<String>("function_tag_name").cloned(),
        peer_namespaces_tag_name: m.get_one::<String>("peer_namespaces_tag_name").cloned(),
        extra_imports_tag_name: m.get_one::<String>("extra_imports_tag_name").cloned(),
        base_peer_namespaces: strings(m, "base_peer_namespaces"),
        no_public_on_error: m.get_flag("no_public_on_error"),
        extra_params: strings(m, "extra_params"),
        build_tag: m.get_one::<String>("build_tag").cloned(),
        header_file: m.get_one::<PathBuf>("header_file").cloned(),
    }
}

pub struct GenerateParams {
    pub generation: GenerationArgs,
    pub output: Option<PathBuf>,
    pub verbosity: u8,
}

impl GenerateParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            generation: generation_args(m),
            output: m.get_one::<PathBuf>("output").cloned(),
            verbosity: m.get_count("verbose"),
        }
    }
}

impl From<GenerateParams> for GenerateArgs {
    fn from(p: GenerateParams) -> Self {
        Self {
            generation: p.generation,
            output: p.output,
        }
    }
}

pub struct CheckParams {
    pub generation: GenerationArgs,
    pub format: ReportFormat,
    pub strict: bool,
    pub verbosity: u8,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let format = match m.get_one::<String>("format").map(String::as_str) {
            Some("json") => ReportFormat::Json,
            _ => ReportFormat::Text,
        };
        Self {
            generation: generation_args(m),
            format,
            strict: m.get_flag("strict"),
            verbosity: m.get_count("verbose"),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            generation: p.generation,
            format: p.format,
            strict: p.strict,
        }
    }
}
