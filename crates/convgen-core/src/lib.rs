#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Type graph model for convgen.
//!
//! Two layers:
//! - **Deserialization layer** (`raw`): 1:1 mapping to the JSON type graph
//! - **Analysis layer** (`Universe`): arena of types indexed by `TypeId`
//!
//! The conversion engine only ever talks to the analysis layer: namespaces by
//! path, types by id or qualified name, members, functions, and the comment
//! lines that carry `+tag=value` annotations.

use std::fmt;

use indexmap::IndexMap;

mod invariants;
mod raw;
mod tags;
mod type_expr;
mod universe;

#[cfg(test)]
mod tags_tests;

pub use raw::{
    RawFunction, RawMember, RawNamespace, RawParam, RawType, RawUniverse, load_universe,
    parse_universe,
};
pub use tags::{CommentTags, extract_comment_tags, tag_values};
pub use type_expr::{TypeExpr, parse_type_expr};
pub use universe::{BUILTINS, Universe};

/// Errors that can occur while building a type graph.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid type graph JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid type expression {expr:?}: {message}")]
    TypeExpr { expr: String, message: String },

    #[error("unknown type {name:?} referenced from namespace {namespace:?}")]
    UnknownType { namespace: String, name: String },

    #[error("type {0} is declared more than once")]
    DuplicateType(TypeName),
}

pub type Result<T> = std::result::Result<T, Error>;

// ============================================================================
// Common Types
// ============================================================================

/// Index of a type in its `Universe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Qualified type name. Builtins and anonymous composites (`[]T`, `*T`,
/// `map[K]V`) have an empty namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName {
    pub namespace: String,
    pub name: String,
}

impl TypeName {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn anonymous(name: impl Into<String>) -> Self {
        Self::new("", name)
    }

    pub fn is_anonymous(&self) -> bool {
        self.namespace.is_empty()
    }

    /// Exported names start with an uppercase letter.
    pub fn is_exported(&self) -> bool {
        self.name.chars().next().is_some_and(char::is_uppercase)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

/// Structural shape of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Builtin,
    Record { members: Vec<Member> },
    Sequence { elem: TypeId },
    Associative { key: TypeId, elem: TypeId },
    Pointer { elem: TypeId },
    /// A named type defined in terms of another one.
    Alias { underlying: TypeId },
    /// Interfaces, functions, channels and anything else without a
    /// statically known shape.
    Unknown,
}

impl TypeKind {
    pub fn label(&self) -> &'static str {
        match self {
            TypeKind::Builtin => "builtin",
            TypeKind::Record { .. } => "record",
            TypeKind::Sequence { .. } => "sequence",
            TypeKind::Associative { .. } => "associative",
            TypeKind::Pointer { .. } => "pointer",
            TypeKind::Alias { .. } => "alias",
            TypeKind::Unknown => "unknown",
        }
    }

    pub fn same_kind(&self, other: &TypeKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    pub fn members(&self) -> &[Member] {
        match self {
            TypeKind::Record { members } => members,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub ty: TypeId,
    pub comment_lines: Vec<String>,
}

impl Member {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            comment_lines: Vec::new(),
        }
    }

    pub fn with_comment(mut self, line: impl Into<String>) -> Self {
        self.comment_lines.push(line.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    pub name: TypeName,
    pub kind: TypeKind,
    pub comment_lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: TypeId,
}

/// A function declared in a namespace. Only its signature is modelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: TypeName,
    pub receiver: Option<TypeId>,
    pub params: Vec<Param>,
    pub results: Vec<TypeId>,
    pub comment_lines: Vec<String>,
}

impl Function {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: TypeName::new(namespace, name),
            receiver: None,
            params: Vec::new(),
            results: Vec::new(),
            comment_lines: Vec::new(),
        }
    }

    pub fn param(mut self, name: impl Into<String>, ty: TypeId) -> Self {
        self.params.push(Param {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn result(mut self, ty: TypeId) -> Self {
        self.results.push(ty);
        self
    }

    pub fn receiver(mut self, ty: TypeId) -> Self {
        self.receiver = Some(ty);
        self
    }

    pub fn with_comment(mut self, line: impl Into<String>) -> Self {
        self.comment_lines.push(line.into());
        self
    }
}

/// A package-like scope: named types, functions, and doc comment lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespace {
    pub path: String,
    pub comment_lines: Vec<String>,
    types: IndexMap<String, TypeId>,
    functions: Vec<Function>,
}

impl Namespace {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn type_id(&self, name: &str) -> Option<TypeId> {
        self.types.get(name).copied()
    }

    /// Declared types in declaration order.
    pub fn types(&self) -> impl Iterator<Item = (&str, TypeId)> {
        self.types.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// Last path segment (`example.com/api/v1` -> `v1`).
    pub fn last_segment(&self) -> &str {
        last_segment(&self.path)
    }
}

pub fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
