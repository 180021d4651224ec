//! Member-by-member record conversion.
//!
//! Each source member goes through these steps, first match wins:
//! 1. opted out
//! 2. missing from the target
//! 3. manual conversion for the member types
//! 4. layout-equivalent reinterpretation
//! 5. kind mismatch
//! 6. conversion by kind

use convgen_core::{Member, TypeKind};

use super::{Diagnostics, Generator, Shape};
use crate::ConversionPair;
use crate::emit::{Block, Callee, Expr, Stmt};
use crate::handlers::{NamedVariable, Site};

impl<'a> Generator<'a> {
    pub(super) fn do_record(
        &mut self,
        from: Shape<'a>,
        to: Shape<'a>,
        members: &'a [Member],
        out_members: &'a [Member],
        out: &mut Block,
        diagnostics: &mut Diagnostics,
    ) {
        for member in members {
            let location = format!("{}.{}", self.type_name(from.id), member.name);

            if self.tags.opted_out(&member.comment_lines) {
                out.comment(format!(
                    "INFO: in.{} opted out of conversion generation",
                    member.name
                ));
                continue;
            }

            let Some(out_member) = out_members.iter().find(|candidate| candidate.name == member.name)
            else {
                self.missing_member(from, to, member, &location, out, diagnostics);
                continue;
            };

            let universe = self.universe;
            let member_from = Shape::unwrapped(universe, member.ty);
            let member_to = Shape::unwrapped(universe, out_member.ty);
            let source = Expr::input().field(&member.name);
            let target = Expr::output().field(&out_member.name);

            let tracker = self.tracker;
            if let Some(manual) = tracker.preexists(member.ty, out_member.ty) {
                if manual.directives.drop {
                    continue;
                }
                let fast = self.directly_assignable(member_from.id, member_to.id)
                    || self.can_reinterpret(member.ty, out_member.ty);
                if !manual.directives.copy_only || !fast {
                    out.push(self.call(
                        Callee::Manual(manual.function.clone()),
                        source.addr(),
                        target.addr(),
                    ));
                    continue;
                }
                tracing::trace!(
                    function = %manual.function,
                    "skipped copy-only conversion in favor of direct assignment"
                );
            }

            if self.reinterpret_member(member_from, member_to, &source, &target, out) {
                continue;
            }

            if !member_from.kind.same_kind(member_to.kind) {
                self.inconvertible_members(from, to, member, out_member, &location, out, diagnostics);
                continue;
            }

            match member_from.kind {
                TypeKind::Builtin => {
                    let value = if member_from.id == member_to.id {
                        source
                    } else {
                        Expr::convert(member_to.id, source)
                    };
                    out.push(Stmt::assign(target, value));
                }
                TypeKind::Pointer { .. } | TypeKind::Associative { .. } | TypeKind::Sequence { .. } => {
                    if self.directly_assignable(member_from.id, member_to.id) {
                        out.push(Stmt::assign(target, source));
                        continue;
                    }
                    let mut body = Block::new();
                    self.generate_for(member_from, member_to, &mut body, diagnostics);
                    out.push(Stmt::NilGuard {
                        source,
                        target,
                        body,
                    });
                }
                TypeKind::Record { .. } | TypeKind::Alias { .. } | TypeKind::Unknown => {
                    if self.directly_assignable(member_from.id, member_to.id) {
                        out.push(Stmt::assign(target, source));
                    } else if self.convertible_within_home(member_from, member_to) {
                        let callee = Callee::Generated(ConversionPair::new(member_from.id, member_to.id));
                        out.push(self.call(callee, source.addr(), target.addr()));
                    } else {
                        self.external(
                            NamedVariable::new(source.addr(), member_from.id),
                            NamedVariable::new(target.addr(), member_to.id),
                            from.id,
                            out,
                            diagnostics,
                        );
                    }
                }
            }
        }
    }

    /// Raw memory copy for layout-equivalent composite members. Returns
    /// whether the member was handled.
    fn reinterpret_member(
        &mut self,
        from: Shape<'a>,
        to: Shape<'a>,
        source: &Expr,
        target: &Expr,
        out: &mut Block,
    ) -> bool {
        let reinterpretable = matches!(
            from.kind,
            TypeKind::Pointer { .. }
                | TypeKind::Sequence { .. }
                | TypeKind::Associative { .. }
                | TypeKind::Record { .. }
        );
        if !reinterpretable || !self.can_reinterpret(from.id, to.id) {
            return false;
        }

        let value = match from.kind {
            TypeKind::Record { .. } if self.directly_assignable(from.id, to.id) => source.clone(),
            TypeKind::Pointer { .. } => Expr::reinterpret(to.id, source.clone(), false),
            _ => Expr::reinterpret(to.id, source.clone().addr(), true),
        };
        out.push(Stmt::assign(target.clone(), value));
        true
    }

    fn missing_member(
        &mut self,
        from: Shape<'a>,
        to: Shape<'a>,
        member: &Member,
        location: &str,
        out: &mut Block,
        diagnostics: &mut Diagnostics,
    ) {
        let Some(handler) = self.options.missing_fields.as_ref() else {
            diagnostics.warn(
                location,
                format!(
                    "requires manual conversion: does not exist in peer-type {}",
                    self.type_name(to.id)
                ),
            );
            return;
        };
        let site = self.record_site(from, to);
        if let Err(error) = handler(&site, member, out) {
            diagnostics.error(location, error.to_string());
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn inconvertible_members(
        &mut self,
        from: Shape<'a>,
        to: Shape<'a>,
        member: &Member,
        out_member: &Member,
        location: &str,
        out: &mut Block,
        diagnostics: &mut Diagnostics,
    ) {
        let Some(handler) = self.options.inconvertible_fields.as_ref() else {
            diagnostics.warn(
                location,
                format!(
                    "requires manual conversion: inconvertible types: {} vs {} for {}.{}",
                    self.type_name(member.ty),
                    self.type_name(out_member.ty),
                    self.type_name(to.id),
                    out_member.name
                ),
            );
            return;
        };
        let site = self.record_site(from, to);
        if let Err(error) = handler(&site, member, out_member, out) {
            diagnostics.error(location, error.to_string());
        }
    }

    fn record_site(&self, from: Shape<'a>, to: Shape<'a>) -> Site<'a> {
        Site {
            universe: self.universe,
            in_var: NamedVariable::new(Expr::input(), from.id),
            out_var: NamedVariable::new(Expr::output(), to.id),
        }
    }
}
