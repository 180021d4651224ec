//! Peer type lookup.

use std::collections::HashMap;

use convgen_core::{TypeId, Universe};

use crate::tags::TagReader;

/// Finds the counterpart of a type in the peer namespaces.
///
/// The lookup name is the type's simple name unless overridden with
/// `+<tag>=peerName:Other`. Namespaces are searched in order and the first
/// hit wins. Results, misses included, are cached per simple name.
#[derive(Debug, Clone)]
pub struct PeerResolver {
    namespaces: Vec<String>,
    cache: HashMap<String, Option<TypeId>>,
}

impl PeerResolver {
    pub fn new(namespaces: Vec<String>) -> Self {
        Self {
            namespaces,
            cache: HashMap::new(),
        }
    }

    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    pub fn resolve(&mut self, universe: &Universe, tags: &TagReader<'_>, source: TypeId) -> Option<TypeId> {
        let def = universe.type_def(source);
        if let Some(cached) = self.cache.get(&def.name.name) {
            return *cached;
        }

        let lookup = tags.peer_name(&def.comment_lines).unwrap_or(&def.name.name);
        let peer = self
            .namespaces
            .iter()
            .find_map(|namespace| universe.lookup(namespace, lookup));
        match peer {
            Some(peer) => tracing::debug!(source = %def.name, peer = %universe.name(peer), "resolved peer"),
            None => tracing::debug!(source = %def.name, lookup, "no peer type"),
        }

        self.cache.insert(def.name.name.clone(), peer);
        peer
    }
}
