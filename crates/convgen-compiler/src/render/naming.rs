//! Conversion function names.
//!
//! `Convert_<in>_To_<out>` for public wrappers, `autoConvert_<in>_To_<out>`
//! for private functions. Each side is rendered as:
//! - named types: `<last namespace segment>_<Name>`
//! - `[]T`: `Slice_<T>`
//! - `map[K]V`: `Map_<K>_To_<V>`
//! - `*T`: `Pointer_<T>`
//! - builtins: their name

use convgen_core::{TypeId, TypeKind, Universe, last_segment};

use crate::ConversionPair;
use crate::tracker::CONVERSION_FUNCTION_PREFIX;

pub const PRIVATE_PREFIX: &str = "auto";

pub fn public_function_name(universe: &Universe, pair: ConversionPair) -> String {
    format!(
        "{CONVERSION_FUNCTION_PREFIX}{}_To_{}",
        type_segment(universe, pair.source),
        type_segment(universe, pair.target)
    )
}

pub fn private_function_name(universe: &Universe, pair: ConversionPair) -> String {
    format!("{PRIVATE_PREFIX}{}", public_function_name(universe, pair))
}

pub fn type_segment(universe: &Universe, id: TypeId) -> String {
    let name = universe.name(id);
    if !name.is_anonymous() {
        return format!(
            "{}_{}",
            identifier(last_segment(&name.namespace)),
            identifier(&name.name)
        );
    }
    match universe.kind(id) {
        TypeKind::Sequence { elem } => format!("Slice_{}", type_segment(universe, *elem)),
        TypeKind::Associative { key, elem } => format!(
            "Map_{}_To_{}",
            type_segment(universe, *key),
            type_segment(universe, *elem)
        ),
        TypeKind::Pointer { elem } => format!("Pointer_{}", type_segment(universe, *elem)),
        _ => identifier(&name.name),
    }
}

/// Keep identifier characters only (`interface{}` -> `interface`,
/// `go-client` -> `go_client`).
fn identifier(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            c if c.is_alphanumeric() || c == '_' => Some(c),
            '-' | '.' => Some('_'),
            _ => None,
        })
        .collect()
}
