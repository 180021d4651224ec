//! Memory-layout equivalence.
//!
//! Two types are layout-equivalent when a value of one can be reinterpreted
//! as the other without changing a bit of meaning. Equivalence is decided
//! after unwrapping aliases:
//! - identical types are equivalent
//! - builtins are equivalent when they are the same builtin
//! - pointers and sequences when their elements are
//! - associatives when keys and elements are
//! - records when they have the same members, in the same order, with
//!   equivalent types
//!
//! A manual conversion that isn't `copy-only` means the bits must change, so
//! it disqualifies the pair.

use std::collections::{HashMap, HashSet};

use convgen_core::{TypeId, TypeKind, Universe};

use crate::ConversionPair;
use crate::tracker::ManualConversionTracker;

pub struct LayoutArbiter<'a> {
    universe: &'a Universe,
    tracker: &'a ManualConversionTracker,
    enabled: bool,
    cache: HashMap<ConversionPair, bool>,
}

impl<'a> LayoutArbiter<'a> {
    pub fn new(universe: &'a Universe, tracker: &'a ManualConversionTracker, enabled: bool) -> Self {
        Self {
            universe,
            tracker,
            enabled,
            cache: HashMap::new(),
        }
    }

    /// Whether the synthesizer may reinterpret `a` as `b`.
    pub fn can_use_unsafe_conversion(&mut self, a: TypeId, b: TypeId) -> bool {
        self.enabled && self.equivalent(a, b)
    }

    /// Layout equivalence, regardless of whether shortcuts are enabled.
    pub fn equivalent(&mut self, a: TypeId, b: TypeId) -> bool {
        self.cached_equivalent(a, b, &mut HashSet::new())
    }

    /// `in_progress` holds the pairs currently being compared. A `true`
    /// found below the outermost query may rest on one of them, so only
    /// `false` and outermost results are cached.
    fn cached_equivalent(
        &mut self,
        a: TypeId,
        b: TypeId,
        in_progress: &mut HashSet<ConversionPair>,
    ) -> bool {
        let pair = ConversionPair::new(a, b);
        if let Some(&known) = self
            .cache
            .get(&pair)
            .or_else(|| self.cache.get(&pair.reversed()))
        {
            return known;
        }
        let outermost = in_progress.is_empty();
        let result = self.compute(a, b, in_progress);
        if outermost || !result {
            self.cache.insert(pair, result);
            self.cache.insert(pair.reversed(), result);
        }
        result
    }

    fn overridden(&self, a: TypeId, b: TypeId) -> bool {
        [(a, b), (b, a)].into_iter().any(|(source, target)| {
            self.tracker
                .preexists(source, target)
                .is_some_and(|manual| !manual.directives.copy_only)
        })
    }

    fn compute(
        &mut self,
        a: TypeId,
        b: TypeId,
        in_progress: &mut HashSet<ConversionPair>,
    ) -> bool {
        if self.overridden(a, b) {
            return false;
        }
        if a == b {
            return true;
        }
        let (a, b) = (self.universe.unwrap_alias(a), self.universe.unwrap_alias(b));
        if a == b {
            return true;
        }
        if self.overridden(a, b) {
            return false;
        }

        let universe = self.universe;
        let (kind_a, kind_b) = (universe.kind(a), universe.kind(b));
        if !kind_a.same_kind(kind_b) {
            return false;
        }
        // Revisiting a pair means we're inside a cycle that so far matches.
        let pair = ConversionPair::new(a, b);
        if !in_progress.insert(pair) {
            return true;
        }

        let result = match (kind_a, kind_b) {
            (TypeKind::Builtin, TypeKind::Builtin) => universe.name(a).name == universe.name(b).name,
            (TypeKind::Pointer { elem: x }, TypeKind::Pointer { elem: y })
            | (TypeKind::Sequence { elem: x }, TypeKind::Sequence { elem: y }) => {
                self.cached_equivalent(*x, *y, in_progress)
            }
            (
                TypeKind::Associative { key: ka, elem: ea },
                TypeKind::Associative { key: kb, elem: eb },
            ) => {
                self.cached_equivalent(*ka, *kb, in_progress)
                    && self.cached_equivalent(*ea, *eb, in_progress)
            }
            (TypeKind::Record { members: ma }, TypeKind::Record { members: mb }) => {
                ma.len() == mb.len()
                    && ma.iter().zip(mb).all(|(x, y)| {
                        x.name == y.name && self.cached_equivalent(x.ty, y.ty, in_progress)
                    })
            }
            _ => false,
        };
        in_progress.remove(&pair);
        result
    }
}
