//! Type expressions used by the JSON type graph and the CLI.
//!
//! # Syntax
//!
//! - `string`, `int64`, ... - builtin
//! - `Pod` - type declared in the enclosing namespace
//! - `example.com/api/v1.Pod` - qualified type (split at the last `.`)
//! - `*T`, `[]T`, `map[K]V` - pointer, sequence, associative
//! - `interface{}` - opaque
//!
//! # Example
//!
//! ```text
//! map[string]*example.com/api/v1.Pod
//! ```

use logos::Logos;

use crate::{BUILTINS, Error, Result, TypeId, Universe};

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
enum Token<'src> {
    #[token("*")]
    Star,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("map")]
    Map,

    #[token("interface{}")]
    Interface,

    #[regex(r"[A-Za-z_][A-Za-z0-9_./\-]*", |lex| lex.slice())]
    Path(&'src str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr<'src> {
    Named {
        namespace: Option<&'src str>,
        name: &'src str,
    },
    Sequence(Box<TypeExpr<'src>>),
    Associative(Box<TypeExpr<'src>>, Box<TypeExpr<'src>>),
    Pointer(Box<TypeExpr<'src>>),
    Interface,
}

struct Parser<'src> {
    tokens: Vec<Token<'src>>,
    pos: usize,
    input: &'src str,
}

impl<'src> Parser<'src> {
    fn new(input: &'src str) -> Result<Self> {
        let mut tokens = Vec::new();
        for (result, span) in Token::lexer(input).spanned() {
            match result {
                Ok(token) => tokens.push(token),
                Err(_) => {
                    return Err(Self::error_in(
                        input,
                        format!("unexpected character {:?}", &input[span]),
                    ));
                }
            }
        }
        Ok(Self {
            tokens,
            pos: 0,
            input,
        })
    }

    fn error_in(input: &str, message: impl Into<String>) -> Error {
        Error::TypeExpr {
            expr: input.to_string(),
            message: message.into(),
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Self::error_in(self.input, message)
    }

    fn advance(&mut self) -> Option<Token<'src>> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token<'src>) -> Result<()> {
        match self.advance() {
            Some(t) if t == expected => Ok(()),
            Some(t) => Err(self.error(format!("expected {expected:?}, got {t:?}"))),
            None => Err(self.error(format!("expected {expected:?}, got end of input"))),
        }
    }

    fn parse(&mut self) -> Result<TypeExpr<'src>> {
        match self.advance() {
            Some(Token::Star) => Ok(TypeExpr::Pointer(Box::new(self.parse()?))),
            Some(Token::LBracket) => {
                self.expect(Token::RBracket)?;
                Ok(TypeExpr::Sequence(Box::new(self.parse()?)))
            }
            Some(Token::Map) => {
                self.expect(Token::LBracket)?;
                let key = self.parse()?;
                self.expect(Token::RBracket)?;
                let elem = self.parse()?;
                Ok(TypeExpr::Associative(Box::new(key), Box::new(elem)))
            }
            Some(Token::Interface) => Ok(TypeExpr::Interface),
            Some(Token::Path(path)) => self.named(path),
            Some(Token::RBracket) => Err(self.error("unexpected ']'")),
            None => Err(self.error("expected a type")),
        }
    }

    fn named(&self, path: &'src str) -> Result<TypeExpr<'src>> {
        let (namespace, name) = match path.rsplit_once('.') {
            Some((namespace, name)) => (Some(namespace), name),
            None => (None, path),
        };
        if name.is_empty() || namespace.is_some_and(str::is_empty) {
            return Err(self.error(format!("malformed type name {path:?}")));
        }
        Ok(TypeExpr::Named { namespace, name })
    }
}

pub fn parse_type_expr(input: &str) -> Result<TypeExpr<'_>> {
    let mut parser = Parser::new(input)?;
    let expr = parser.parse()?;
    if parser.pos != parser.tokens.len() {
        return Err(parser.error("trailing input after type"));
    }
    Ok(expr)
}

impl Universe {
    /// Resolve a type expression. Bare names are builtins or types declared
    /// in `namespace`.
    pub fn resolve_type_expr(&mut self, namespace: &str, input: &str) -> Result<TypeId> {
        let expr = parse_type_expr(input)?;
        self.resolve(namespace, &expr)
    }

    fn resolve(&mut self, namespace: &str, expr: &TypeExpr<'_>) -> Result<TypeId> {
        match expr {
            TypeExpr::Named {
                namespace: None,
                name,
            } if BUILTINS.iter().any(|builtin| builtin == name) => Ok(self.builtin(name)),
            TypeExpr::Named {
                namespace: qualifier,
                name,
            } => {
                let qualifier = qualifier.unwrap_or(namespace);
                self.lookup(qualifier, name)
                    .ok_or_else(|| Error::UnknownType {
                        namespace: namespace.to_string(),
                        name: format!("{qualifier}.{name}"),
                    })
            }
            TypeExpr::Sequence(elem) => {
                let elem = self.resolve(namespace, elem)?;
                Ok(self.sequence(elem))
            }
            TypeExpr::Associative(key, elem) => {
                let key = self.resolve(namespace, key)?;
                let elem = self.resolve(namespace, elem)?;
                Ok(self.associative(key, elem))
            }
            TypeExpr::Pointer(elem) => {
                let elem = self.resolve(namespace, elem)?;
                Ok(self.pointer(elem))
            }
            TypeExpr::Interface => Ok(self.opaque("interface{}")),
        }
    }
}
