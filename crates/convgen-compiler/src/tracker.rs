//! Index of hand-written conversion functions.
//!
//! Any function shaped `(in *Source, out *Target, extra...) -> error` is a
//! manual conversion for `(Source, Target)`, whatever its name or
//! visibility. Functions named like conversions (`Convert_` prefix) that
//! don't have that shape are reported, since they almost certainly meant to
//! be one.

use std::collections::HashMap;
use std::fmt;

use convgen_core::{Function, Namespace, TypeId, TypeKind, TypeName, Universe};

use crate::options::{ExtraParam, Options};
use crate::tags::function_directives;
use crate::{ConversionPair, Error, Result};

pub const CONVERSION_FUNCTION_PREFIX: &str = "Convert_";

/// Directives attached to a manual conversion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Directives {
    /// The member is dropped: no call, no fallback, no error.
    pub drop: bool,
    /// Only a copy; generated code may prefer a plain assignment.
    pub copy_only: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManualConversion {
    pub function: TypeName,
    pub directives: Directives,
}

impl ManualConversion {
    pub fn is_exported(&self) -> bool {
        self.function.is_exported()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("function {function} does not match the expected conversion signature: {reason}")]
pub struct TrackerError {
    pub function: TypeName,
    pub reason: String,
}

/// Errors collected while scanning one namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackerErrors(pub Vec<TrackerError>);

impl TrackerErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for TrackerErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {error}")?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct ManualConversionTracker {
    extra_params: Vec<ExtraParam>,
    function_tag_name: String,
    /// Outcome of each scanned namespace.
    processed: HashMap<String, TrackerErrors>,
    conversions: HashMap<ConversionPair, ManualConversion>,
}

impl ManualConversionTracker {
    pub fn new(options: &Options) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            extra_params: options.extra_params.clone(),
            function_tag_name: options.function_tag_name.clone(),
            processed: HashMap::new(),
            conversions: HashMap::new(),
        })
    }

    pub fn extra_params(&self) -> &[ExtraParam] {
        &self.extra_params
    }

    /// Index every namespace in `namespaces`. Each namespace is scanned
    /// once; later calls replay the recorded outcome.
    pub fn discover(&mut self, universe: &Universe, namespaces: &[String]) -> Result<()> {
        for path in namespaces {
            let errors = self.scan(universe, path);
            if !errors.is_empty() {
                return Err(Error::ManualConversions {
                    namespace: path.clone(),
                    errors,
                });
            }
        }
        Ok(())
    }

    pub fn preexists(&self, source: TypeId, target: TypeId) -> Option<&ManualConversion> {
        self.conversions.get(&ConversionPair::new(source, target))
    }

    pub fn len(&self) -> usize {
        self.conversions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversions.is_empty()
    }

    fn scan(&mut self, universe: &Universe, path: &str) -> TrackerErrors {
        if let Some(errors) = self.processed.get(path) {
            return errors.clone();
        }
        let errors = match universe.namespace(path) {
            Some(namespace) => self.index(universe, namespace),
            None => {
                tracing::warn!(
                    namespace = path,
                    "skipping unknown namespace while looking for conversion functions"
                );
                TrackerErrors::default()
            }
        };
        self.processed.insert(path.to_string(), errors.clone());
        errors
    }

    fn index(&mut self, universe: &Universe, namespace: &Namespace) -> TrackerErrors {
        tracing::debug!(namespace = %namespace.path, "scanning for conversion functions");

        let mut functions: Vec<&Function> = namespace.functions().iter().collect();
        functions.sort_by(|a, b| a.name.name.cmp(&b.name.name));

        let mut errors = Vec::new();
        for function in functions {
            let pair = match self.signature_pair(universe, function) {
                Ok(pair) => pair,
                Err(reason) => {
                    if function.name.name.starts_with(CONVERSION_FUNCTION_PREFIX) {
                        errors.push(TrackerError {
                            function: function.name.clone(),
                            reason,
                        });
                    }
                    continue;
                }
            };

            if let Some(existing) = self.conversions.get(&pair) {
                tracing::debug!(
                    kept = %existing.function,
                    ignored = %function.name,
                    "conversion already registered for pair"
                );
                continue;
            }
            tracing::trace!(function = %function.name, "registered manual conversion");
            self.conversions.insert(
                pair,
                ManualConversion {
                    function: function.name.clone(),
                    directives: function_directives(
                        &self.function_tag_name,
                        &function.comment_lines,
                    ),
                },
            );
        }
        TrackerErrors(errors)
    }

    fn signature_pair(
        &self,
        universe: &Universe,
        function: &Function,
    ) -> std::result::Result<ConversionPair, String> {
        if function.receiver.is_some() {
            return Err("conversion functions can't have a receiver".to_string());
        }
        let expected = 2 + self.extra_params.len();
        if function.params.len() != expected {
            return Err(format!(
                "expected {expected} parameters, found {}",
                function.params.len()
            ));
        }
        let returns_error = match function.results.as_slice() {
            [result] => {
                let name = universe.name(*result);
                name.is_anonymous() && name.name == "error"
            }
            _ => false,
        };
        if !returns_error {
            return Err("must return exactly one error".to_string());
        }
        let (TypeKind::Pointer { elem: source }, TypeKind::Pointer { elem: target }) = (
            universe.kind(function.params[0].ty),
            universe.kind(function.params[1].ty),
        ) else {
            return Err("the first two parameters must be pointers".to_string());
        };
        for (param, extra) in function.params[2..].iter().zip(&self.extra_params) {
            if param.ty != extra.ty {
                return Err(format!(
                    "parameter {} must have type {}",
                    param.name,
                    universe.name(extra.ty)
                ));
            }
        }
        Ok(ConversionPair::new(*source, *target))
    }
}
