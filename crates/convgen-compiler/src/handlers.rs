//! Extension handlers.
//!
//! Four optional callbacks let the caller decide what to emit where the
//! synthesizer can't: a member missing from the peer, members of
//! incompatible kinds, types with no known shape, and values that need a
//! conversion from outside the generated set. Each handler writes into the
//! current `Block`; an `Err` becomes a field error of the function being
//! generated and suppresses its public wrapper.

use std::sync::Arc;

use convgen_core::{Member, TypeId, Universe};

use crate::emit::{Block, Expr};

/// An expression together with its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedVariable {
    pub expr: Expr,
    pub ty: TypeId,
}

impl NamedVariable {
    pub fn new(expr: Expr, ty: TypeId) -> Self {
        Self { expr, ty }
    }
}

/// Where a handler is invoked.
pub struct Site<'a> {
    pub universe: &'a Universe,
    pub in_var: NamedVariable,
    pub out_var: NamedVariable,
}

impl Site<'_> {
    pub fn type_name(&self, id: TypeId) -> String {
        self.universe.name(id).to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type HandlerResult<T = ()> = Result<T, HandlerError>;

pub type MissingFieldsHandler =
    Arc<dyn Fn(&Site<'_>, &Member, &mut Block) -> HandlerResult + Send + Sync>;

pub type InconvertibleFieldsHandler =
    Arc<dyn Fn(&Site<'_>, &Member, &Member, &mut Block) -> HandlerResult + Send + Sync>;

pub type UnsupportedTypesHandler =
    Arc<dyn Fn(&Site<'_>, &mut Block) -> HandlerResult + Send + Sync>;

/// Returns whether it wrote a conversion.
pub type ExternalConversionsHandler =
    Arc<dyn Fn(&Site<'_>, &mut Block) -> HandlerResult<bool> + Send + Sync>;

/// Handlers that leave a warning comment and fail, so that any unresolved
/// member keeps the public wrapper from being emitted.
pub mod strict {
    use std::sync::Arc;

    use convgen_core::Member;

    use super::{
        ExternalConversionsHandler, HandlerError, HandlerResult, InconvertibleFieldsHandler,
        MissingFieldsHandler, Site, UnsupportedTypesHandler,
    };
    use crate::emit::Block;

    pub fn missing_field() -> MissingFieldsHandler {
        Arc::new(|_site: &Site<'_>, member: &Member, out: &mut Block| -> HandlerResult {
            out.comment(format!(
                "WARNING: in.{} requires manual conversion: does not exist in peer-type",
                member.name
            ));
            Err(HandlerError::new(format!(
                "field {} requires manual conversion",
                member.name
            )))
        })
    }

    pub fn inconvertible_fields() -> InconvertibleFieldsHandler {
        Arc::new(
            |site: &Site<'_>, in_member: &Member, out_member: &Member, out: &mut Block| {
                out.comment(format!(
                    "WARNING: in.{} requires manual conversion: inconvertible types ({} vs {})",
                    in_member.name,
                    site.type_name(in_member.ty),
                    site.type_name(out_member.ty)
                ));
                let result: HandlerResult = Err(HandlerError::new(format!(
                    "field {} requires manual conversion",
                    in_member.name
                )));
                result
            },
        )
    }

    pub fn unsupported_types() -> UnsupportedTypesHandler {
        Arc::new(|site: &Site<'_>, out: &mut Block| -> HandlerResult {
            let (from, to) = (site.type_name(site.in_var.ty), site.type_name(site.out_var.ty));
            out.comment(format!(
                "WARNING: requires manual conversion: unsupported types ({from} vs {to})"
            ));
            Err(HandlerError::new(format!(
                "conversion from {from} to {to} requires manual conversion"
            )))
        })
    }

    pub fn external_conversions() -> ExternalConversionsHandler {
        Arc::new(|site: &Site<'_>, out: &mut Block| -> HandlerResult<bool> {
            let (from, to) = (site.type_name(site.in_var.ty), site.type_name(site.out_var.ty));
            out.comment(format!(
                "WARNING: requires manual conversion: no conversion function for {from} to {to}"
            ));
            Err(HandlerError::new(format!(
                "conversion from {from} to {to} requires manual conversion"
            )))
        })
    }
}
