//! Go rendering backend.
//!
//! Turns `emit` trees into Go source. Kept apart from synthesis so the
//! engine never deals with text, qualification or imports.

mod go;
mod imports;
mod naming;

#[cfg(test)]
mod imports_tests;

pub use go::{GoRenderer, render_file};
pub use imports::ImportTracker;
pub use naming::{PRIVATE_PREFIX, private_function_name, public_function_name, type_segment};

pub const DEFAULT_BUILD_TAG: &str = "ignore_autogenerated";

/// Configuration for Go emission.
#[derive(Clone, Debug)]
pub struct GoConfig {
    /// Boilerplate written before anything else (usually a license)
    pub(crate) header: Option<String>,
    /// `// +build !<tag>` constraint; none when empty
    pub(crate) build_tag: String,
    /// One level of indentation
    pub(crate) indent: String,
}

impl Default for GoConfig {
    fn default() -> Self {
        Self {
            header: None,
            build_tag: DEFAULT_BUILD_TAG.to_string(),
            indent: "\t".to_string(),
        }
    }
}

impl GoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, value: impl Into<String>) -> Self {
        self.header = Some(value.into());
        self
    }

    pub fn build_tag(mut self, value: impl Into<String>) -> Self {
        self.build_tag = value.into();
        self
    }

    pub fn indent(mut self, value: impl Into<String>) -> Self {
        self.indent = value.into();
        self
    }
}
