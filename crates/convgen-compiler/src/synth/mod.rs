//! Recursive conversion synthesis.
//!
//! A `Generator` is bound to one home namespace. For a pair of types it
//! always produces the private function body, then decides whether the
//! public wrapper may be emitted.
//!
//! The walk uses the shadowing convention of `emit`: `in` and `out` always
//! point at the current source and target values, so the same routine is
//! valid at any nesting depth.
//!
//! # Module Organization
//!
//! - `kinds`: builtin, associative, sequence, pointer and unknown shapes,
//!   plus the fallback chain used for nested values
//! - `record`: member-by-member record conversion
//! - `visibility`: public wrapper state machine

mod kinds;
mod record;
mod visibility;

#[cfg(test)]
mod record_tests;

use std::fmt;

use convgen_core::{TypeId, TypeKind, Universe};

use crate::emit::{Block, Callee, Expr, Stmt};
use crate::layout::LayoutArbiter;
use crate::options::Options;
use crate::peer::PeerResolver;
use crate::tags::TagReader;
use crate::tracker::ManualConversionTracker;
use crate::{ConversionPair, Error, Result};

pub use visibility::{SuppressReason, WrapperState};

/// An unresolved member or value. Only affects public wrapper eligibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub location: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Something left unconverted with no handler to ask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub location: String,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Body of a private conversion function and what went wrong building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFunction {
    pub pair: ConversionPair,
    pub body: Block,
    pub field_errors: Vec<FieldError>,
    pub warnings: Vec<Warning>,
}

/// A generated function together with its public wrapper decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub function: GeneratedFunction,
    pub state: WrapperState,
}

impl Conversion {
    pub fn pair(&self) -> ConversionPair {
        self.function.pair
    }

    pub fn emits_public(&self) -> bool {
        self.state.emits_public()
    }
}

#[derive(Debug, Default)]
struct Diagnostics {
    field_errors: Vec<FieldError>,
    warnings: Vec<Warning>,
}

impl Diagnostics {
    fn error(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.field_errors.push(FieldError {
            location: location.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, location: impl Into<String>, message: impl Into<String>) {
        let warning = Warning {
            location: location.into(),
            message: message.into(),
        };
        tracing::warn!(location = %warning.location, "{}", warning.message);
        self.warnings.push(warning);
    }
}

/// A type as seen by dispatch: `id` keeps the declared identity (for names
/// and allocation) while `kind` may be the alias-unwrapped shape.
#[derive(Debug, Clone, Copy)]
struct Shape<'u> {
    id: TypeId,
    kind: &'u TypeKind,
}

impl<'u> Shape<'u> {
    fn declared(universe: &'u Universe, id: TypeId) -> Self {
        Self {
            id,
            kind: universe.kind(id),
        }
    }

    fn unwrapped(universe: &'u Universe, id: TypeId) -> Self {
        Self {
            id,
            kind: universe.kind(universe.unwrap_alias(id)),
        }
    }
}

/// Namespaces scanned for manual conversions on behalf of `home`: its peers
/// first, then itself.
pub fn discovery_namespaces(universe: &Universe, options: &Options, home: &str) -> Result<Vec<String>> {
    let namespace = universe
        .namespace(home)
        .ok_or_else(|| Error::UnknownNamespace(home.to_string()))?;
    let mut namespaces = TagReader::new(options).peer_namespaces(namespace);
    if !namespaces.iter().any(|path| path == home) {
        namespaces.push(home.to_string());
    }
    Ok(namespaces)
}

/// Index the manual conversions visible from `home`.
pub fn discover(
    universe: &Universe,
    options: &Options,
    tracker: &mut ManualConversionTracker,
    home: &str,
) -> Result<()> {
    let namespaces = discovery_namespaces(universe, options, home)?;
    tracker.discover(universe, &namespaces)
}

pub struct Generator<'a> {
    universe: &'a Universe,
    options: &'a Options,
    tags: TagReader<'a>,
    tracker: &'a ManualConversionTracker,
    home: String,
    peers: PeerResolver,
    layout: LayoutArbiter<'a>,
}

impl<'a> Generator<'a> {
    /// Bind a generator to `home`. Manual conversions of the home and peer
    /// namespaces are discovered first; malformed ones abort construction.
    pub fn new(
        universe: &'a Universe,
        options: &'a Options,
        tracker: &'a mut ManualConversionTracker,
        home: &str,
    ) -> Result<Self> {
        discover(universe, options, tracker, home)?;
        let tracker: &'a ManualConversionTracker = tracker;

        let tags = TagReader::new(options);
        let peer_namespaces = universe
            .namespace(home)
            .map(|namespace| tags.peer_namespaces(namespace))
            .unwrap_or_default();
        tracing::debug!(home, peers = ?peer_namespaces, "created generator");

        Ok(Self {
            universe,
            options,
            tags,
            tracker,
            home: home.to_string(),
            peers: PeerResolver::new(peer_namespaces),
            layout: LayoutArbiter::new(universe, tracker, options.unsafe_conversions_enabled()),
        })
    }

    pub fn home(&self) -> &str {
        &self.home
    }

    pub fn peer_namespaces(&self) -> &[String] {
        self.peers.namespaces()
    }

    pub fn tracker(&self) -> &ManualConversionTracker {
        self.tracker
    }

    pub fn peer_of(&mut self, source: TypeId) -> Option<TypeId> {
        let tags = self.tags;
        self.peers.resolve(self.universe, &tags, source)
    }

    /// The peer of `source` if conversions should be generated for it.
    pub fn filter(&mut self, source: TypeId) -> Option<TypeId> {
        let peer = self.peer_of(source)?;
        let universe = self.universe;
        self.convertible_within_home(Shape::declared(universe, source), Shape::declared(universe, peer))
            .then_some(peer)
    }

    /// Home types with an eligible peer, sorted by name.
    pub fn candidates(&mut self) -> Vec<(TypeId, TypeId)> {
        let Some(namespace) = self.universe.namespace(&self.home) else {
            return Vec::new();
        };
        let mut types: Vec<(&str, TypeId)> = namespace.types().collect();
        types.sort_by(|a, b| a.0.cmp(b.0));
        types
            .into_iter()
            .filter_map(|(_, id)| self.filter(id).map(|peer| (id, peer)))
            .collect()
    }

    /// Extra imports requested by the home namespace.
    pub fn extra_imports(&self) -> Vec<String> {
        self.universe
            .namespace(&self.home)
            .map(|namespace| self.tags.extra_imports(namespace))
            .unwrap_or_default()
    }

    /// Private function body for `source -> target`.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn generate_function(&mut self, source: TypeId, target: TypeId) -> GeneratedFunction {
        let universe = self.universe;
        let mut body = Block::new();
        let mut diagnostics = Diagnostics::default();
        self.generate_for(
            Shape::declared(universe, source),
            Shape::declared(universe, target),
            &mut body,
            &mut diagnostics,
        );
        GeneratedFunction {
            pair: ConversionPair::new(source, target),
            body,
            field_errors: diagnostics.field_errors,
            warnings: diagnostics.warnings,
        }
    }

    /// Private function plus the public wrapper decision.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn generate_conversion(&mut self, source: TypeId, target: TypeId) -> Conversion {
        let state = WrapperState::Generating;
        let function = self.generate_function(source, target);
        let state = state.private_emitted();
        let state = state.decide(self.suppress_reason(&function));

        if let WrapperState::PublicSuppressed(SuppressReason::FieldErrors(_)) = &state {
            tracing::warn!(
                source = %self.universe.name(source),
                target = %self.universe.name(target),
                "could not generate a public conversion function, manual conversions needed:"
            );
            for error in &function.field_errors {
                tracing::warn!("  - {error}");
            }
        }
        Conversion { function, state }
    }

    fn suppress_reason(&self, function: &GeneratedFunction) -> Option<SuppressReason> {
        let ConversionPair { source, target } = function.pair;
        if let Some(manual) = self
            .tracker
            .preexists(source, target)
            .filter(|manual| manual.is_exported())
        {
            return Some(SuppressReason::ManualConversion(manual.function.clone()));
        }
        for id in [source, target] {
            if self.tags.no_public(&self.universe.type_def(id).comment_lines) {
                return Some(SuppressReason::NoPublic(self.universe.name(id).clone()));
            }
        }
        if !function.field_errors.is_empty() {
            return Some(SuppressReason::FieldErrors(function.field_errors.len()));
        }
        None
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    fn generate_for(&mut self, from: Shape<'a>, to: Shape<'a>, out: &mut Block, diagnostics: &mut Diagnostics) {
        tracing::trace!(
            from = %self.universe.name(from.id),
            to = %self.universe.name(to.id),
            kind = from.kind.label(),
            "generating"
        );
        match (from.kind, to.kind) {
            (TypeKind::Builtin, TypeKind::Builtin) => self.do_builtin(from, to, out),
            (
                TypeKind::Associative { key, elem },
                TypeKind::Associative {
                    key: out_key,
                    elem: out_elem,
                },
            ) => self.do_associative(from, to, (*key, *elem), (*out_key, *out_elem), out, diagnostics),
            (TypeKind::Sequence { elem }, TypeKind::Sequence { elem: out_elem }) => {
                self.do_sequence(from, to, *elem, *out_elem, out, diagnostics)
            }
            (TypeKind::Record { members }, TypeKind::Record { members: out_members }) => {
                self.do_record(from, to, members, out_members, out, diagnostics)
            }
            (TypeKind::Pointer { elem }, TypeKind::Pointer { elem: out_elem }) => {
                self.do_pointer(from, *elem, *out_elem, out, diagnostics)
            }
            // Aliases, unknown shapes and mismatched kinds.
            _ => self.do_unknown(from, to, out, diagnostics),
        }
    }

    // ========================================================================
    // Shared decisions
    // ========================================================================

    /// Plain assignment works: an assignable source that is primitive or
    /// declared next to the target.
    fn directly_assignable(&self, from: TypeId, to: TypeId) -> bool {
        let universe = self.universe;
        universe.is_assignable(from) && (universe.is_primitive(from) || universe.same_namespace(from, to))
    }

    /// Whether the generated `Convert_` function for the pair can be called:
    /// the home-side type is a record not opted out, and the other side is
    /// exported.
    fn convertible_within_home(&self, from: Shape<'_>, to: Shape<'_>) -> bool {
        let in_home = |shape: &Shape<'_>| self.universe.name(shape.id).namespace == self.home;
        let (local, other) = if in_home(&from) { (from, to) } else { (to, from) };
        if !in_home(&local) {
            return false;
        }
        if self.tags.opted_out(&self.universe.type_def(local.id).comment_lines) {
            tracing::debug!(ty = %self.universe.name(local.id), "type opted out of conversion generation");
            return false;
        }
        matches!(local.kind, TypeKind::Record { .. }) && self.universe.name(other.id).is_exported()
    }

    fn can_reinterpret(&mut self, from: TypeId, to: TypeId) -> bool {
        self.layout.can_use_unsafe_conversion(from, to)
    }

    /// `if err := callee(from, to, extras...); err != nil { return err }`
    fn call(&self, callee: Callee, from: Expr, to: Expr) -> Stmt {
        let mut args = vec![from, to];
        args.extend(
            self.tracker
                .extra_params()
                .iter()
                .map(|param| Expr::var(&param.name)),
        );
        Stmt::Call { callee, args }
    }

    fn type_name(&self, id: TypeId) -> String {
        self.universe.name(id).to_string()
    }
}
