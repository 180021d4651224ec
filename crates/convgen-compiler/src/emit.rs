//! Structured emit operations.
//!
//! The synthesizer never writes text. It appends `Stmt`s to a `Block`, and a
//! backend (`render::go`) turns the tree into source code. Type references
//! stay `TypeId` slots so the backend decides how to qualify and import them.
//!
//! Variables follow a fixed convention: `in`/`out` are pointers to the
//! source and target values, and are rebound inside a `NilGuard` to point at
//! the guarded member.

use convgen_core::{TypeId, TypeName};

use crate::ConversionPair;

pub const IN: &str = "in";
pub const OUT: &str = "out";
pub const KEY: &str = "key";
pub const VALUE: &str = "val";
pub const INDEX: &str = "i";
pub const NEW_VALUE: &str = "newVal";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Var(String),
    Field(Box<Expr>, String),
    Deref(Box<Expr>),
    AddrOf(Box<Expr>),
    Index(Box<Expr>, Box<Expr>),
    /// Value conversion `T(x)`.
    Convert(TypeId, Box<Expr>),
    /// Raw memory reinterpretation. `by_value` reads through the pointer
    /// (`*(*T)(unsafe.Pointer(x))`); otherwise the pointer itself is cast
    /// (`(T)(unsafe.Pointer(x))`).
    Reinterpret {
        ty: TypeId,
        expr: Box<Expr>,
        by_value: bool,
    },
}

impl Expr {
    pub fn var(name: &str) -> Self {
        Expr::Var(name.to_string())
    }

    pub fn input() -> Self {
        Self::var(IN)
    }

    pub fn output() -> Self {
        Self::var(OUT)
    }

    pub fn field(self, name: &str) -> Self {
        Expr::Field(Box::new(self), name.to_string())
    }

    pub fn deref(self) -> Self {
        Expr::Deref(Box::new(self))
    }

    pub fn addr(self) -> Self {
        Expr::AddrOf(Box::new(self))
    }

    pub fn index(self, index: Expr) -> Self {
        Expr::Index(Box::new(self), Box::new(index))
    }

    pub fn convert(ty: TypeId, expr: Expr) -> Self {
        Expr::Convert(ty, Box::new(expr))
    }

    pub fn reinterpret(ty: TypeId, expr: Expr, by_value: bool) -> Self {
        Expr::Reinterpret {
            ty,
            expr: Box::new(expr),
            by_value,
        }
    }
}

/// Target of a conversion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callee {
    /// Hand-written function found by the tracker.
    Manual(TypeName),
    /// Public wrapper generated for a pair.
    Generated(ConversionPair),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Comment(String),
    /// Text written as-is by an extension handler, one line per `\n`.
    Verbatim(String),
    Assign {
        target: Expr,
        value: Expr,
    },
    /// `target = make(ty, len(len_of))`
    Make {
        target: Expr,
        ty: TypeId,
        len_of: Expr,
    },
    /// `target = new(elem)`
    Allocate {
        target: Expr,
        elem: TypeId,
    },
    /// `name := new(elem)`
    Declare {
        name: String,
        elem: TypeId,
    },
    BulkCopy {
        target: Expr,
        source: Expr,
    },
    /// Call that propagates a non-nil error.
    Call {
        callee: Callee,
        args: Vec<Expr>,
    },
    /// Runs `body` with `in`/`out` rebound to `&source`/`&target` when
    /// `source` is non-nil, and sets `target` to nil otherwise.
    NilGuard {
        source: Expr,
        target: Expr,
        body: Block,
    },
    ForEachIndex {
        index: String,
        source: Expr,
        body: Block,
    },
    ForEachEntry {
        key: String,
        value: String,
        source: Expr,
        body: Block,
    },
    /// Marked, non-functional loop left where keys can't be converted.
    UnsupportedKeys {
        source: Expr,
        key: TypeId,
    },
    Discard(Expr),
}

impl Stmt {
    pub fn assign(target: Expr, value: Expr) -> Self {
        Stmt::Assign { target, value }
    }
}

/// Append-only sequence of statements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    stmts: Vec<Stmt>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stmt: Stmt) {
        self.stmts.push(stmt);
    }

    pub fn comment(&mut self, text: impl Into<String>) {
        self.push(Stmt::Comment(text.into()));
    }

    pub fn verbatim(&mut self, text: impl Into<String>) {
        self.push(Stmt::Verbatim(text.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }
}

impl<'a> IntoIterator for &'a Block {
    type Item = &'a Stmt;
    type IntoIter = std::slice::Iter<'a, Stmt>;

    fn into_iter(self) -> Self::IntoIter {
        self.stmts.iter()
    }
}
