//! Deserialization layer: 1:1 mapping to the JSON type graph.
//!
//! Building a `Universe` is two-phase. Every named type is declared first,
//! then kinds, members, and function signatures are resolved, so declarations
//! may refer to each other (and to themselves) in any order.

use crate::{Error, Function, Member, Param, Result, TypeKind, TypeName, Universe};

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct RawUniverse {
    #[serde(default)]
    pub namespaces: Vec<RawNamespace>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct RawNamespace {
    pub path: String,
    #[serde(default)]
    pub comments: Vec<String>,
    #[serde(default)]
    pub types: Vec<RawType>,
    #[serde(default)]
    pub functions: Vec<RawFunction>,
}

/// Named type declaration, tagged by `kind`.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RawType {
    Record {
        name: String,
        #[serde(default)]
        comments: Vec<String>,
        #[serde(default)]
        members: Vec<RawMember>,
    },
    Alias {
        name: String,
        #[serde(default)]
        comments: Vec<String>,
        underlying: String,
    },
    Unknown {
        name: String,
        #[serde(default)]
        comments: Vec<String>,
    },
}

impl RawType {
    pub fn name(&self) -> &str {
        match self {
            RawType::Record { name, .. }
            | RawType::Alias { name, .. }
            | RawType::Unknown { name, .. } => name,
        }
    }

    pub fn comments(&self) -> &[String] {
        match self {
            RawType::Record { comments, .. }
            | RawType::Alias { comments, .. }
            | RawType::Unknown { comments, .. } => comments,
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct RawMember {
    pub name: String,
    #[serde(rename = "type")]
    pub type_expr: String,
    #[serde(default)]
    pub comments: Vec<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct RawFunction {
    pub name: String,
    #[serde(default)]
    pub receiver: Option<String>,
    #[serde(default)]
    pub params: Vec<RawParam>,
    #[serde(default)]
    pub results: Vec<String>,
    #[serde(default)]
    pub comments: Vec<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct RawParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub type_expr: String,
}

/// Parse the JSON type graph into raw declarations.
pub fn parse_universe(json: &str) -> Result<RawUniverse> {
    Ok(serde_json::from_str(json)?)
}

/// Parse and build in one step.
pub fn load_universe(json: &str) -> Result<Universe> {
    parse_universe(json)?.build()
}

impl RawUniverse {
    pub fn build(&self) -> Result<Universe> {
        let mut universe = Universe::new();

        let mut declared = Vec::new();
        for namespace in &self.namespaces {
            universe
                .namespace_mut(&namespace.path)
                .comment_lines
                .extend(namespace.comments.iter().cloned());
            for raw in &namespace.types {
                if universe.lookup(&namespace.path, raw.name()).is_some() {
                    return Err(Error::DuplicateType(TypeName::new(
                        &namespace.path,
                        raw.name(),
                    )));
                }
                let id = universe.declare(&namespace.path, raw.name());
                universe.set_type_comments(id, raw.comments().to_vec());
                declared.push(id);
            }
        }

        let mut ids = declared.into_iter();
        for namespace in &self.namespaces {
            let path = namespace.path.as_str();
            for (raw, id) in namespace.types.iter().zip(ids.by_ref()) {
                let kind = match raw {
                    RawType::Record { members, .. } => TypeKind::Record {
                        members: members
                            .iter()
                            .map(|m| build_member(&mut universe, path, m))
                            .collect::<Result<_>>()?,
                    },
                    RawType::Alias { underlying, .. } => TypeKind::Alias {
                        underlying: universe.resolve_type_expr(path, underlying)?,
                    },
                    RawType::Unknown { .. } => TypeKind::Unknown,
                };
                universe.define(id, kind);
            }
            for raw in &namespace.functions {
                let function = build_function(&mut universe, path, raw)?;
                universe.add_function(function);
            }
        }

        Ok(universe)
    }
}

fn build_member(universe: &mut Universe, namespace: &str, raw: &RawMember) -> Result<Member> {
    Ok(Member {
        name: raw.name.clone(),
        ty: universe.resolve_type_expr(namespace, &raw.type_expr)?,
        comment_lines: raw.comments.clone(),
    })
}

fn build_function(universe: &mut Universe, namespace: &str, raw: &RawFunction) -> Result<Function> {
    let mut function = Function::new(namespace, &raw.name);
    function.comment_lines = raw.comments.clone();
    if let Some(receiver) = &raw.receiver {
        function.receiver = Some(universe.resolve_type_expr(namespace, receiver)?);
    }
    for param in &raw.params {
        function.params.push(Param {
            name: param.name.clone(),
            ty: universe.resolve_type_expr(namespace, &param.type_expr)?,
        });
    }
    for result in &raw.results {
        function.results.push(universe.resolve_type_expr(namespace, result)?);
    }
    Ok(function)
}
