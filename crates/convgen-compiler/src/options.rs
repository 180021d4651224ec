//! Per-run configuration.

use std::collections::HashSet;
use std::fmt;

use convgen_core::TypeId;

use crate::handlers::{
    ExternalConversionsHandler, InconvertibleFieldsHandler, MissingFieldsHandler,
    UnsupportedTypesHandler, strict,
};
use crate::{Error, Result};

pub const DEFAULT_TAG_NAME: &str = "conversion-gen";
pub const DEFAULT_EXTRA_IMPORTS_TAG_NAME: &str = "conversion-gen-extra-imports";

/// Parameter appended, in order, to every conversion signature and call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtraParam {
    pub name: String,
    pub ty: TypeId,
}

impl ExtraParam {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Immutable configuration snapshot shared by every generator of a run.
#[derive(Clone)]
pub struct Options {
    /// Type and member tag (`+<tag>=false`, `no-public`, `peerName:X`)
    pub(crate) tag_name: String,
    /// Manual conversion function tag (`drop`, `copy-only`)
    pub(crate) function_tag_name: String,
    /// Namespace tag listing peer namespaces
    pub(crate) peer_namespaces_tag_name: String,
    /// Namespace tag listing extra imports
    pub(crate) extra_imports_tag_name: String,
    /// Peer namespaces searched after the tagged ones
    pub(crate) base_peer_namespaces: Vec<String>,
    /// Disables raw memory reinterpretation
    pub(crate) no_unsafe_conversions: bool,
    pub(crate) extra_params: Vec<ExtraParam>,
    pub(crate) missing_fields: Option<MissingFieldsHandler>,
    pub(crate) inconvertible_fields: Option<InconvertibleFieldsHandler>,
    pub(crate) unsupported_types: Option<UnsupportedTypesHandler>,
    pub(crate) external_conversions: Option<ExternalConversionsHandler>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tag_name: DEFAULT_TAG_NAME.to_string(),
            function_tag_name: DEFAULT_TAG_NAME.to_string(),
            peer_namespaces_tag_name: DEFAULT_TAG_NAME.to_string(),
            extra_imports_tag_name: DEFAULT_EXTRA_IMPORTS_TAG_NAME.to_string(),
            base_peer_namespaces: Vec::new(),
            no_unsafe_conversions: false,
            extra_params: Vec::new(),
            missing_fields: None,
            inconvertible_fields: None,
            unsupported_types: None,
            external_conversions: None,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag_name(mut self, value: impl Into<String>) -> Self {
        self.tag_name = value.into();
        self
    }

    pub fn function_tag_name(mut self, value: impl Into<String>) -> Self {
        self.function_tag_name = value.into();
        self
    }

    pub fn peer_namespaces_tag_name(mut self, value: impl Into<String>) -> Self {
        self.peer_namespaces_tag_name = value.into();
        self
    }

    pub fn extra_imports_tag_name(mut self, value: impl Into<String>) -> Self {
        self.extra_imports_tag_name = value.into();
        self
    }

    pub fn base_peer_namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_peer_namespaces = namespaces.into_iter().map(Into::into).collect();
        self
    }

    pub fn no_unsafe_conversions(mut self, value: bool) -> Self {
        self.no_unsafe_conversions = value;
        self
    }

    pub fn extra_param(mut self, name: impl Into<String>, ty: TypeId) -> Self {
        self.extra_params.push(ExtraParam::new(name, ty));
        self
    }

    pub fn missing_fields_handler(mut self, handler: MissingFieldsHandler) -> Self {
        self.missing_fields = Some(handler);
        self
    }

    pub fn inconvertible_fields_handler(mut self, handler: InconvertibleFieldsHandler) -> Self {
        self.inconvertible_fields = Some(handler);
        self
    }

    pub fn unsupported_types_handler(mut self, handler: UnsupportedTypesHandler) -> Self {
        self.unsupported_types = Some(handler);
        self
    }

    pub fn external_conversions_handler(mut self, handler: ExternalConversionsHandler) -> Self {
        self.external_conversions = Some(handler);
        self
    }

    /// Install the failing handlers from `handlers::strict`, so no public
    /// wrapper is emitted for a function with any unresolved member.
    pub fn no_public_conversion_on_error(self) -> Self {
        self.missing_fields_handler(strict::missing_field())
            .inconvertible_fields_handler(strict::inconvertible_fields())
            .unsupported_types_handler(strict::unsupported_types())
            .external_conversions_handler(strict::external_conversions())
    }

    pub fn extra_params(&self) -> &[ExtraParam] {
        &self.extra_params
    }

    pub fn base_peers(&self) -> &[String] {
        &self.base_peer_namespaces
    }

    pub fn unsafe_conversions_enabled(&self) -> bool {
        !self.no_unsafe_conversions
    }

    /// Extra parameter names must be distinct identifiers that don't shadow
    /// the generated variables.
    pub fn validate(&self) -> Result<()> {
        const RESERVED: &[&str] = &["in", "out", "err", "key", "val", "i", "newVal"];

        let mut seen = HashSet::new();
        for param in &self.extra_params {
            let invalid = |reason: &str| Error::InvalidExtraParam {
                name: param.name.clone(),
                reason: reason.to_string(),
            };
            if !is_identifier(&param.name) {
                return Err(invalid("not an identifier"));
            }
            if RESERVED.contains(&param.name.as_str()) {
                return Err(invalid("name is reserved by generated code"));
            }
            if !seen.insert(param.name.as_str()) {
                return Err(invalid("declared more than once"));
            }
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("tag_name", &self.tag_name)
            .field("function_tag_name", &self.function_tag_name)
            .field("peer_namespaces_tag_name", &self.peer_namespaces_tag_name)
            .field("extra_imports_tag_name", &self.extra_imports_tag_name)
            .field("base_peer_namespaces", &self.base_peer_namespaces)
            .field("no_unsafe_conversions", &self.no_unsafe_conversions)
            .field("extra_params", &self.extra_params)
            .field("missing_fields", &self.missing_fields.is_some())
            .field("inconvertible_fields", &self.inconvertible_fields.is_some())
            .field("unsupported_types", &self.unsupported_types.is_some())
            .field("external_conversions", &self.external_conversions.is_some())
            .finish()
    }
}
