//! convgen compiler: conversion-function synthesis between peer type graphs.
//!
//! This crate provides the generation pipeline:
//! - `peer` - finds the counterpart of a type in the peer namespaces
//! - `tracker` - indexes hand-written conversion functions
//! - `layout` - decides when a raw memory reinterpretation is safe
//! - `synth` - the recursive conversion synthesizer
//! - `emit` - structured, append-only emit operations
//! - `render` - Go rendering backend (naming, imports, text)
//! - `driver` - runs generators over a set of input namespaces

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use convgen_core::TypeId;

pub mod driver;
pub mod emit;
pub mod handlers;
pub mod layout;
pub mod options;
pub mod peer;
pub mod render;
pub mod synth;
pub mod tags;
pub mod tracker;

#[cfg(test)]
mod tags_tests;
#[cfg(test)]
pub mod test_utils;

pub use driver::{Converter, GeneratedFile};
pub use emit::{Block, Callee, Expr, Stmt};
pub use handlers::{HandlerError, NamedVariable, Site};
pub use options::{ExtraParam, Options};
pub use synth::{Conversion, FieldError, GeneratedFunction, Generator, Warning, WrapperState};
pub use tracker::{Directives, ManualConversion, ManualConversionTracker};

/// Errors that abort generation before any code is produced.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("namespace {0:?} is not part of the type graph")]
    UnknownNamespace(String),

    #[error("errors when looking for manual conversion functions in {namespace}:\n{errors}")]
    ManualConversions {
        namespace: String,
        errors: tracker::TrackerErrors,
    },

    #[error("invalid extra parameter {name:?}: {reason}")]
    InvalidExtraParam { name: String, reason: String },
}

/// Result type for generator construction.
pub type Result<T> = std::result::Result<T, Error>;

/// Identifies exactly one generated conversion function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConversionPair {
    pub source: TypeId,
    pub target: TypeId,
}

impl ConversionPair {
    pub fn new(source: TypeId, target: TypeId) -> Self {
        Self { source, target }
    }

    pub fn reversed(self) -> Self {
        Self::new(self.target, self.source)
    }
}
