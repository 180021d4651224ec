//! Interpretation of `+<tag>=value` annotations.
//!
//! Type and member tags:
//! - `+<tag>=false` - opted out of generation
//! - `+<tag>=no-public` - no public wrapper for this type
//! - `+<tag>=peerName:Other` - look the peer up as `Other`
//!
//! Function tags (manual conversions): `+<function-tag>=drop`,
//! `+<function-tag>=copy-only`.
//!
//! Namespace tags: `+<peer-tag>=ns1,ns2` and `+<extra-imports-tag>=path`.

use convgen_core::{Namespace, tag_values};

use crate::options::Options;
use crate::tracker::Directives;

const MARKER: &str = "+";

#[derive(Clone, Copy, Debug)]
pub struct TagReader<'o> {
    options: &'o Options,
}

impl<'o> TagReader<'o> {
    pub fn new(options: &'o Options) -> Self {
        Self { options }
    }

    fn values<'l>(&self, lines: &'l [String]) -> Vec<&'l str> {
        tag_values(MARKER, &self.options.tag_name, lines)
    }

    fn has_value(&self, lines: &[String], value: &str) -> bool {
        self.values(lines).contains(&value)
    }

    pub fn opted_out(&self, lines: &[String]) -> bool {
        self.has_value(lines, "false")
    }

    pub fn no_public(&self, lines: &[String]) -> bool {
        self.has_value(lines, "no-public")
    }

    pub fn peer_name<'l>(&self, lines: &'l [String]) -> Option<&'l str> {
        self.option(lines, "peerName")
    }

    /// Value of a `name:value` option; anything not split in exactly two
    /// parts is ignored.
    fn option<'l>(&self, lines: &'l [String], name: &str) -> Option<&'l str> {
        self.values(lines).into_iter().find_map(|value| {
            let parts: Vec<&str> = value.split(':').collect();
            match parts.as_slice() {
                [key, value] if *key == name => Some(*value),
                _ => None,
            }
        })
    }

    /// Tagged peer namespaces followed by the configured base ones.
    pub fn peer_namespaces(&self, namespace: &Namespace) -> Vec<String> {
        let mut peers =
            comma_list(tag_values(MARKER, &self.options.peer_namespaces_tag_name, &namespace.comment_lines));
        for base in &self.options.base_peer_namespaces {
            if !peers.contains(base) {
                peers.push(base.clone());
            }
        }
        peers
    }

    pub fn extra_imports(&self, namespace: &Namespace) -> Vec<String> {
        tag_values(MARKER, &self.options.extra_imports_tag_name, &namespace.comment_lines)
            .into_iter()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

pub(crate) fn function_directives(function_tag_name: &str, lines: &[String]) -> Directives {
    let values = tag_values(MARKER, function_tag_name, lines);
    Directives {
        drop: values.contains(&"drop"),
        copy_only: values.contains(&"copy-only"),
    }
}

fn comma_list(values: Vec<&str>) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
