//! Runs generators over a set of input namespaces.

use std::collections::HashSet;

use convgen_core::{Universe, last_segment};

use crate::options::{ExtraParam, Options};
use crate::synth::{self, Conversion, Generator};
use crate::tracker::ManualConversionTracker;
use crate::{ConversionPair, Result};

/// Conversions generated for one input namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Namespace the file belongs to.
    pub namespace: String,
    /// Package clause (last namespace segment).
    pub package: String,
    pub conversions: Vec<Conversion>,
    pub extra_imports: Vec<String>,
    pub extra_params: Vec<ExtraParam>,
}

impl GeneratedFile {
    pub fn public_count(&self) -> usize {
        self.conversions.iter().filter(|c| c.emits_public()).count()
    }
}

pub struct Converter<'a> {
    universe: &'a Universe,
    options: Options,
}

impl<'a> Converter<'a> {
    pub fn new(universe: &'a Universe, options: Options) -> Self {
        Self { universe, options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Generate every conversion for `inputs`.
    ///
    /// Discovery runs for all inputs before anything is generated, so a
    /// malformed manual conversion anywhere aborts the whole run.
    #[tracing::instrument(level = "debug", skip_all, fields(inputs = inputs.len()))]
    pub fn run(&self, inputs: &[String]) -> Result<Vec<GeneratedFile>> {
        let mut seen = HashSet::new();
        let inputs: Vec<&str> = inputs
            .iter()
            .map(String::as_str)
            .filter(|input| seen.insert(*input))
            .filter(|input| {
                let known = self.universe.namespace(input).is_some();
                if !known {
                    tracing::debug!(namespace = input, "skipping input missing from the type graph");
                }
                known
            })
            .collect();

        let mut tracker = ManualConversionTracker::new(&self.options)?;
        for input in &inputs {
            synth::discover(self.universe, &self.options, &mut tracker, input)?;
        }
        tracing::debug!(manual = tracker.len(), "discovered manual conversions");

        let mut files = Vec::with_capacity(inputs.len());
        for input in inputs {
            files.push(self.generate_file(&mut tracker, input)?);
        }
        Ok(files)
    }

    fn generate_file(&self, tracker: &mut ManualConversionTracker, input: &str) -> Result<GeneratedFile> {
        let mut generator = Generator::new(self.universe, &self.options, tracker, input)?;

        let mut generated: HashSet<ConversionPair> = HashSet::new();
        let mut conversions = Vec::new();
        for (ty, peer) in generator.candidates() {
            for (source, target) in [(ty, peer), (peer, ty)] {
                if !generated.insert(ConversionPair::new(source, target)) {
                    continue;
                }
                conversions.push(generator.generate_conversion(source, target));
            }
        }
        tracing::debug!(namespace = input, conversions = conversions.len(), "generated file");

        Ok(GeneratedFile {
            namespace: input.to_string(),
            package: last_segment(input).to_string(),
            conversions,
            extra_imports: generator.extra_imports(),
            extra_params: self.options.extra_params().to_vec(),
        })
    }
}
