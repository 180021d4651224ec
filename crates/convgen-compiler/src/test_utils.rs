//! Shared fixtures for compiler tests.

use convgen_core::{Member, TypeId, Universe};

use crate::emit::Block;
use crate::options::Options;
use crate::render::{GoConfig, GoRenderer};
use crate::synth::{Conversion, Generator};
use crate::tracker::ManualConversionTracker;

pub const V1: &str = "example.com/api/v1";
pub const CORE: &str = "example.com/internal/core";

/// Universe with an empty `v1` namespace that peers with `core`.
pub fn peered_universe() -> Universe {
    let mut universe = Universe::new();
    universe
        .namespace_mut(V1)
        .comment_lines
        .push(format!("+conversion-gen={CORE}"));
    universe.namespace_mut(CORE);
    universe
}

/// Declare the same record in `v1` and `core`.
pub fn record_pair(universe: &mut Universe, name: &str, members: Vec<Member>) -> (TypeId, TypeId) {
    let v1 = universe.add_record(V1, name, members.clone());
    let core = universe.add_record(CORE, name, members);
    (v1, core)
}

/// Generate `source -> target` from a generator bound to `v1`.
pub fn convert(universe: &Universe, options: &Options, source: TypeId, target: TypeId) -> Conversion {
    let mut tracker = ManualConversionTracker::new(options).expect("options must be valid");
    let mut generator = Generator::new(universe, options, &mut tracker, V1).expect("generator must build");
    generator.generate_conversion(source, target)
}

/// Statements only, four-space indented, qualified relative to `v1`.
pub fn render_body(universe: &Universe, body: &Block) -> String {
    let config = GoConfig::new().indent("    ");
    GoRenderer::new(universe, &config, V1).render_body(body)
}

/// Generate and render the private body of `source -> target`.
pub fn body(universe: &Universe, options: &Options, source: TypeId, target: TypeId) -> String {
    let conversion = convert(universe, options, source, target);
    render_body(universe, &conversion.function.body)
}
