//! The analysis layer: an arena of type definitions plus the namespaces
//! that declare them.
//!
//! Named types are interned by qualified name, anonymous composites by
//! their structural name (`[]string`, `map[string]example.com/v1.Pod`), so
//! two occurrences of the same shape always share a `TypeId`.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::{Function, Member, Namespace, TypeDef, TypeId, TypeKind, TypeName};

/// Predeclared types, registered by `Universe::new`.
pub const BUILTINS: &[&str] = &[
    "bool",
    "byte",
    "complex64",
    "complex128",
    "error",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
];

#[derive(Debug, Clone, Default)]
pub struct Universe {
    types: Vec<TypeDef>,
    by_name: HashMap<TypeName, TypeId>,
    namespaces: IndexMap<String, Namespace>,
}

impl Universe {
    pub fn new() -> Self {
        let mut universe = Self::default();
        for name in BUILTINS {
            universe.builtin(name);
        }
        universe
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get(&self, id: TypeId) -> Option<&TypeDef> {
        self.types.get(id.index())
    }

    pub(crate) fn types_mut(&mut self) -> &mut [TypeDef] {
        &mut self.types
    }

    pub fn type_def(&self, id: TypeId) -> &TypeDef {
        self.ensure_type(id)
    }

    pub fn kind(&self, id: TypeId) -> &TypeKind {
        &self.ensure_type(id).kind
    }

    pub fn name(&self, id: TypeId) -> &TypeName {
        &self.ensure_type(id).name
    }

    pub fn lookup(&self, namespace: &str, name: &str) -> Option<TypeId> {
        self.by_name.get(&TypeName::new(namespace, name)).copied()
    }

    pub fn namespace(&self, path: &str) -> Option<&Namespace> {
        self.namespaces.get(path)
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.values()
    }

    /// Get or create the namespace at `path`.
    pub fn namespace_mut(&mut self, path: &str) -> &mut Namespace {
        self.namespaces
            .entry(path.to_string())
            .or_insert_with(|| Namespace::new(path))
    }

    // ------------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------------

    fn intern(&mut self, name: TypeName, kind: TypeKind) -> TypeId {
        if let Some(&id) = self.by_name.get(&name) {
            return id;
        }
        let id = TypeId::from_index(self.types.len());
        self.by_name.insert(name.clone(), id);
        self.types.push(TypeDef {
            name,
            kind,
            comment_lines: Vec::new(),
        });
        id
    }

    pub fn builtin(&mut self, name: &str) -> TypeId {
        self.intern(TypeName::anonymous(name), TypeKind::Builtin)
    }

    pub fn sequence(&mut self, elem: TypeId) -> TypeId {
        let name = format!("[]{}", self.name(elem));
        self.intern(TypeName::anonymous(name), TypeKind::Sequence { elem })
    }

    pub fn associative(&mut self, key: TypeId, elem: TypeId) -> TypeId {
        let name = format!("map[{}]{}", self.name(key), self.name(elem));
        self.intern(TypeName::anonymous(name), TypeKind::Associative { key, elem })
    }

    pub fn pointer(&mut self, elem: TypeId) -> TypeId {
        let name = format!("*{}", self.name(elem));
        self.intern(TypeName::anonymous(name), TypeKind::Pointer { elem })
    }

    /// Anonymous type without a known shape, such as `interface{}`.
    pub fn opaque(&mut self, name: &str) -> TypeId {
        self.intern(TypeName::anonymous(name), TypeKind::Unknown)
    }

    /// Get or create a named type. New types start out as `Unknown` until
    /// `define` gives them a shape, so declarations may reference each other
    /// in any order.
    pub fn declare(&mut self, namespace: &str, name: &str) -> TypeId {
        let id = self.intern(TypeName::new(namespace, name), TypeKind::Unknown);
        self.namespace_mut(namespace)
            .types
            .entry(name.to_string())
            .or_insert(id);
        id
    }

    pub fn define(&mut self, id: TypeId, kind: TypeKind) {
        self.ensure_type_mut(id).kind = kind;
    }

    pub fn set_type_comments(&mut self, id: TypeId, lines: Vec<String>) {
        self.ensure_type_mut(id).comment_lines = lines;
    }

    pub fn add_record(&mut self, namespace: &str, name: &str, members: Vec<Member>) -> TypeId {
        let id = self.declare(namespace, name);
        self.define(id, TypeKind::Record { members });
        id
    }

    pub fn add_alias(&mut self, namespace: &str, name: &str, underlying: TypeId) -> TypeId {
        let id = self.declare(namespace, name);
        self.define(id, TypeKind::Alias { underlying });
        id
    }

    pub fn add_function(&mut self, function: Function) {
        let namespace = function.name.namespace.clone();
        self.namespace_mut(&namespace).functions.push(function);
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Follow alias chains down to the first non-alias type.
    pub fn unwrap_alias(&self, id: TypeId) -> TypeId {
        let mut current = id;
        // A chain can't be longer than the arena; a longer walk is a cycle.
        for _ in 0..self.types.len() {
            match self.kind(current) {
                TypeKind::Alias { underlying } => current = *underlying,
                _ => return current,
            }
        }
        current
    }

    /// Builtins and aliases of builtins.
    pub fn is_primitive(&self, id: TypeId) -> bool {
        matches!(self.kind(self.unwrap_alias(id)), TypeKind::Builtin)
    }

    /// Whether a value can be copied with a plain assignment: primitives, and
    /// records made only of assignable members.
    pub fn is_assignable(&self, id: TypeId) -> bool {
        self.is_assignable_inner(id, &mut HashSet::new())
    }

    fn is_assignable_inner(&self, id: TypeId, visited: &mut HashSet<TypeId>) -> bool {
        if self.is_primitive(id) {
            return true;
        }
        let TypeKind::Record { members } = self.kind(id) else {
            return false;
        };
        // `visited` holds the records on the current path; shared records
        // are checked again on every path that reaches them.
        if !visited.insert(id) {
            return false;
        }
        let assignable = members
            .iter()
            .all(|member| self.is_assignable_inner(member.ty, visited));
        visited.remove(&id);
        assignable
    }

    pub fn same_namespace(&self, a: TypeId, b: TypeId) -> bool {
        self.name(a).namespace == self.name(b).namespace
    }
}
