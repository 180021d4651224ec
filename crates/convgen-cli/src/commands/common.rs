//! Loading, option building and error reporting shared by commands.

use std::path::{Path, PathBuf};

use convgen_compiler::render::GoConfig;
use convgen_compiler::{Converter, GeneratedFile, Options};
use convgen_core::Universe;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    TypeGraph {
        path: PathBuf,
        #[source]
        source: convgen_core::Error,
    },

    #[error("invalid --extra-param {spec:?}: {message}")]
    ExtraParam { spec: String, message: String },

    #[error(transparent)]
    Generation(#[from] convgen_compiler::Error),

    #[error("failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),

    #[error("{0} conversion(s) need manual conversion functions")]
    Suppressed(usize),
}

pub type Result<T> = std::result::Result<T, CliError>;

/// Flags shared by every command that runs the generator.
#[derive(Debug, Clone, Default)]
pub struct GenerationArgs {
    pub universe: PathBuf,
    pub inputs: Vec<String>,
    pub skip_unsafe: bool,
    pub tag_name: Option<String>,
    pub function_tag_name: Option<String>,
    pub peer_namespaces_tag_name: Option<String>,
    pub extra_imports_tag_name: Option<String>,
    pub base_peer_namespaces: Vec<String>,
    pub no_public_on_error: bool,
    pub extra_params: Vec<String>,
    pub build_tag: Option<String>,
    pub header_file: Option<PathBuf>,
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_universe(path: &Path) -> Result<Universe> {
    let json = read(path)?;
    convgen_core::load_universe(&json).map_err(|source| CliError::TypeGraph {
        path: path.to_path_buf(),
        source,
    })
}

/// Split `NAME:TYPE` at the first colon.
pub fn parse_extra_param(spec: &str) -> Result<(&str, &str)> {
    let invalid = |message: &str| CliError::ExtraParam {
        spec: spec.to_string(),
        message: message.to_string(),
    };
    let (name, ty) = spec.split_once(':').ok_or_else(|| invalid("expected NAME:TYPE"))?;
    let (name, ty) = (name.trim(), ty.trim());
    if name.is_empty() || ty.is_empty() {
        return Err(invalid("expected NAME:TYPE"));
    }
    Ok((name, ty))
}

/// Generator options. Extra parameter types are resolved against the type
/// graph, so they must be qualified unless builtin.
pub fn build_options(universe: &mut Universe, args: &GenerationArgs) -> Result<Options> {
    let mut options = Options::new()
        .no_unsafe_conversions(args.skip_unsafe)
        .base_peer_namespaces(args.base_peer_namespaces.iter().cloned());
    if let Some(tag) = &args.tag_name {
        options = options.tag_name(tag);
    }
    if let Some(tag) = &args.function_tag_name {
        options = options.function_tag_name(tag);
    }
    if let Some(tag) = &args.peer_namespaces_tag_name {
        options = options.peer_namespaces_tag_name(tag);
    }
    if let Some(tag) = &args.extra_imports_tag_name {
        options = options.extra_imports_tag_name(tag);
    }
    if args.no_public_on_error {
        options = options.no_public_conversion_on_error();
    }
    for spec in &args.extra_params {
        let (name, ty) = parse_extra_param(spec)?;
        let ty = universe
            .resolve_type_expr("", ty)
            .map_err(|error| CliError::ExtraParam {
                spec: spec.clone(),
                message: error.to_string(),
            })?;
        options = options.extra_param(name, ty);
    }
    options.validate()?;
    Ok(options)
}

pub fn go_config(args: &GenerationArgs) -> Result<GoConfig> {
    let mut config = GoConfig::new();
    if let Some(tag) = &args.build_tag {
        config = config.build_tag(tag);
    }
    if let Some(path) = &args.header_file {
        config = config.header(read(path)?);
    }
    Ok(config)
}

/// Load the type graph and run the generator over the inputs.
pub fn generate(args: &GenerationArgs) -> Result<(Universe, Vec<GeneratedFile>)> {
    let mut universe = load_universe(&args.universe)?;
    let options = build_options(&mut universe, args)?;
    let files = Converter::new(&universe, options).run(&args.inputs)?;
    Ok((universe, files))
}

/// Unwrap or report the error and exit.
pub fn exit_on_error<T>(result: Result<T>) -> T {
    result.unwrap_or_else(|error| {
        eprintln!("error: {error}");
        std::process::exit(1);
    })
}
