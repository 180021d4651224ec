//! Non-record shapes and the fallback chain for nested values.

use convgen_core::{TypeId, TypeKind};

use super::{Diagnostics, Generator, Shape};
use crate::emit::{Block, Callee, Expr, INDEX, KEY, NEW_VALUE, Stmt, VALUE};
use crate::ConversionPair;
use crate::handlers::{NamedVariable, Site};

/// How a nested value ended up converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Resolution {
    /// A manual or generated conversion is called.
    Called,
    /// The external conversions handler wrote the conversion.
    Handled,
    /// A `drop` manual conversion covers the pair.
    Dropped,
    Unresolved,
}

impl Resolution {
    fn wrote_code(self) -> bool {
        matches!(self, Resolution::Called | Resolution::Handled)
    }
}

impl<'a> Generator<'a> {
    pub(super) fn do_builtin(&mut self, from: Shape<'a>, to: Shape<'a>, out: &mut Block) {
        let value = Expr::input().deref();
        let value = if from.id == to.id {
            value
        } else {
            Expr::convert(to.id, value)
        };
        out.push(Stmt::assign(Expr::output().deref(), value));
    }

    pub(super) fn do_associative(
        &mut self,
        from: Shape<'a>,
        to: Shape<'a>,
        (in_key, in_elem): (TypeId, TypeId),
        (out_key, out_elem): (TypeId, TypeId),
        out: &mut Block,
        diagnostics: &mut Diagnostics,
    ) {
        out.push(Stmt::Make {
            target: Expr::output().deref(),
            ty: to.id,
            len_of: Expr::input().deref(),
        });

        if !self.directly_assignable(in_key, out_key) {
            diagnostics.warn(
                self.type_name(from.id),
                format!(
                    "converting unassignable keys of type {} to {} is unsupported",
                    self.type_name(in_key),
                    self.type_name(out_key)
                ),
            );
            out.push(Stmt::UnsupportedKeys {
                source: Expr::input().deref(),
                key: in_key,
            });
            return;
        }

        let key = if in_key == out_key {
            Expr::var(KEY)
        } else {
            Expr::convert(out_key, Expr::var(KEY))
        };
        let slot = Expr::output().deref().index(key);

        let mut body = Block::new();
        if self.directly_assignable(in_elem, out_elem) {
            let value = if in_elem == out_elem {
                Expr::var(VALUE)
            } else {
                Expr::convert(out_elem, Expr::var(VALUE))
            };
            body.push(Stmt::assign(slot, value));
        } else {
            body.push(Stmt::Declare {
                name: NEW_VALUE.to_string(),
                elem: out_elem,
            });
            let resolution = self.convert_nested(
                NamedVariable::new(Expr::var(VALUE).addr(), in_elem),
                NamedVariable::new(Expr::var(NEW_VALUE), out_elem),
                from.id,
                &mut body,
                diagnostics,
            );
            if resolution == Resolution::Unresolved && self.options.external_conversions.is_none() {
                body.comment(format!(
                    "WARNING: values of type {} require manual conversion to {}",
                    self.type_name(in_elem),
                    self.type_name(out_elem)
                ));
            }
            body.push(Stmt::assign(slot, Expr::var(NEW_VALUE).deref()));
        }

        out.push(Stmt::ForEachEntry {
            key: KEY.to_string(),
            value: VALUE.to_string(),
            source: Expr::input().deref(),
            body,
        });
    }

    pub(super) fn do_sequence(
        &mut self,
        from: Shape<'a>,
        to: Shape<'a>,
        in_elem: TypeId,
        out_elem: TypeId,
        out: &mut Block,
        diagnostics: &mut Diagnostics,
    ) {
        out.push(Stmt::Make {
            target: Expr::output().deref(),
            ty: to.id,
            len_of: Expr::input().deref(),
        });

        if in_elem == out_elem && matches!(self.universe.kind(in_elem), TypeKind::Builtin) {
            out.push(Stmt::BulkCopy {
                target: Expr::output().deref(),
                source: Expr::input().deref(),
            });
            return;
        }

        let item = |base: Expr| base.deref().index(Expr::var(INDEX));
        let mut body = Block::new();
        if self.directly_assignable(in_elem, out_elem) {
            let value = if in_elem == out_elem {
                item(Expr::input())
            } else {
                Expr::convert(out_elem, item(Expr::input()))
            };
            body.push(Stmt::assign(item(Expr::output()), value));
        } else {
            let resolution = self.convert_nested(
                NamedVariable::new(item(Expr::input()).addr(), in_elem),
                NamedVariable::new(item(Expr::output()).addr(), out_elem),
                from.id,
                &mut body,
                diagnostics,
            );
            if !resolution.wrote_code() {
                body.push(Stmt::Discard(Expr::var(INDEX)));
            }
        }

        out.push(Stmt::ForEachIndex {
            index: INDEX.to_string(),
            source: Expr::input().deref(),
            body,
        });
    }

    pub(super) fn do_pointer(
        &mut self,
        from: Shape<'a>,
        in_elem: TypeId,
        out_elem: TypeId,
        out: &mut Block,
        diagnostics: &mut Diagnostics,
    ) {
        out.push(Stmt::Allocate {
            target: Expr::output().deref(),
            elem: out_elem,
        });

        if self.directly_assignable(in_elem, out_elem) {
            let value = Expr::input().deref().deref();
            let value = if in_elem == out_elem {
                value
            } else {
                Expr::convert(out_elem, value)
            };
            out.push(Stmt::assign(Expr::output().deref().deref(), value));
            return;
        }

        self.convert_nested(
            NamedVariable::new(Expr::input().deref(), in_elem),
            NamedVariable::new(Expr::output().deref(), out_elem),
            from.id,
            out,
            diagnostics,
        );
    }

    /// Shapes the synthesizer can't convert: defer to the unsupported types
    /// handler.
    pub(super) fn do_unknown(
        &mut self,
        from: Shape<'a>,
        to: Shape<'a>,
        out: &mut Block,
        diagnostics: &mut Diagnostics,
    ) {
        let location = self.type_name(from.id);
        let Some(handler) = self.options.unsupported_types.as_ref() else {
            diagnostics.warn(
                location,
                format!("don't know how to convert {} to {}", self.type_name(from.id), self.type_name(to.id)),
            );
            return;
        };
        let site = Site {
            universe: self.universe,
            in_var: NamedVariable::new(Expr::input(), from.id),
            out_var: NamedVariable::new(Expr::output(), to.id),
        };
        if let Err(error) = handler(&site, out) {
            diagnostics.error(location, error.to_string());
        }
    }

    /// Convert a nested value through the fallback chain: manual conversion,
    /// generated conversion, external conversions handler, warning.
    pub(super) fn convert_nested(
        &mut self,
        from: NamedVariable,
        to: NamedVariable,
        container: TypeId,
        out: &mut Block,
        diagnostics: &mut Diagnostics,
    ) -> Resolution {
        if let Some(manual) = self.tracker.preexists(from.ty, to.ty) {
            if manual.directives.drop {
                tracing::trace!(function = %manual.function, "dropped nested conversion");
                return Resolution::Dropped;
            }
            out.push(self.call(Callee::Manual(manual.function.clone()), from.expr, to.expr));
            return Resolution::Called;
        }

        let universe = self.universe;
        if self.convertible_within_home(Shape::declared(universe, from.ty), Shape::declared(universe, to.ty)) {
            let callee = Callee::Generated(ConversionPair::new(from.ty, to.ty));
            out.push(self.call(callee, from.expr, to.expr));
            return Resolution::Called;
        }

        self.external(from, to, container, out, diagnostics)
    }

    pub(super) fn external(
        &mut self,
        from: NamedVariable,
        to: NamedVariable,
        container: TypeId,
        out: &mut Block,
        diagnostics: &mut Diagnostics,
    ) -> Resolution {
        let location = self.type_name(container);
        let Some(handler) = self.options.external_conversions.as_ref() else {
            diagnostics.warn(
                location,
                format!(
                    "values of type {} require manual conversion to external type {}",
                    self.type_name(from.ty),
                    self.type_name(to.ty)
                ),
            );
            return Resolution::Unresolved;
        };
        let site = Site {
            universe: self.universe,
            in_var: from,
            out_var: to,
        };
        match handler(&site, out) {
            Ok(true) => Resolution::Handled,
            Ok(false) => Resolution::Unresolved,
            Err(error) => {
                diagnostics.error(location, error.to_string());
                Resolution::Unresolved
            }
        }
    }
}
