//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::{TypeDef, TypeId, Universe};

impl Universe {
    pub(crate) fn ensure_type(&self, id: TypeId) -> &TypeDef {
        self.get(id).unwrap_or_else(|| {
            panic!(
                "Universe: type id {} not found \
                 (ids must come from the universe they index)",
                id.index()
            )
        })
    }

    pub(crate) fn ensure_type_mut(&mut self, id: TypeId) -> &mut TypeDef {
        let len = self.len();
        self.types_mut().get_mut(id.index()).unwrap_or_else(|| {
            panic!(
                "Universe: type id {} out of bounds ({len} types)",
                id.index()
            )
        })
    }
}
