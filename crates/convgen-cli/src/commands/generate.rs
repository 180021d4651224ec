use std::io::Write;
use std::path::PathBuf;

use convgen_compiler::GeneratedFile;
use convgen_compiler::render::{GoConfig, render_file};
use convgen_core::Universe;

use super::common::{CliError, GenerationArgs, Result, exit_on_error, generate, go_config};

pub struct GenerateArgs {
    pub generation: GenerationArgs,
    pub output: Option<PathBuf>,
}

pub fn run(args: GenerateArgs) {
    exit_on_error(execute(&args));
}

pub fn execute(args: &GenerateArgs) -> Result<()> {
    let config = go_config(&args.generation)?;
    let (universe, files) = generate(&args.generation)?;
    let source = render_sources(&universe, &files, &config);

    match &args.output {
        Some(path) => std::fs::write(path, source).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        }),
        None => std::io::stdout()
            .write_all(source.as_bytes())
            .map_err(|source| CliError::Write {
                path: PathBuf::from("<stdout>"),
                source,
            }),
    }
}

/// Every generated file, separated by a blank line.
pub fn render_sources(universe: &Universe, files: &[GeneratedFile], config: &GoConfig) -> String {
    files
        .iter()
        .map(|file| render_file(universe, file, config))
        .collect::<Vec<_>>()
        .join("\n")
}
