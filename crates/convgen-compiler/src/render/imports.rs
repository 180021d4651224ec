//! Import tracking with collision-free local names.

use std::collections::{BTreeMap, HashSet};

/// Namespaces referenced by a rendered file, each with a unique local name.
///
/// The local name is the last path segment; on collision more segments are
/// joined (`k8s.io/api/core/v1` becomes `corev1`), and a numeric suffix is
/// the last resort.
#[derive(Debug, Clone, Default)]
pub struct ImportTracker {
    local: String,
    by_path: BTreeMap<String, String>,
    taken: HashSet<String>,
}

impl ImportTracker {
    /// `local` is the namespace being rendered; it is never imported.
    pub fn new(local: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            ..Self::default()
        }
    }

    pub fn is_local(&self, path: &str) -> bool {
        path == self.local
    }

    /// Local name for `path`, registering the import on first use. `None`
    /// for the local namespace.
    pub fn add(&mut self, path: &str) -> Option<String> {
        if self.is_local(path) {
            return None;
        }
        if let Some(name) = self.by_path.get(path) {
            return Some(name.clone());
        }
        let name = self.pick_name(path);
        self.taken.insert(name.clone());
        self.by_path.insert(path.to_string(), name.clone());
        Some(name)
    }

    pub fn local_name(&self, path: &str) -> Option<&str> {
        self.by_path.get(path).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Import specs sorted by path. The local name is spelled out only when
    /// it differs from the last segment.
    pub fn lines(&self) -> Vec<String> {
        self.by_path
            .iter()
            .map(|(path, name)| {
                if Some(name.as_str()) == path.rsplit('/').next() {
                    format!("{path:?}")
                } else {
                    format!("{name} {path:?}")
                }
            })
            .collect()
    }

    fn pick_name(&self, path: &str) -> String {
        let segments: Vec<String> = path
            .split('/')
            .rev()
            .map(sanitize)
            .filter(|segment| !segment.is_empty())
            .collect();

        let mut candidate = String::new();
        for segment in &segments {
            candidate = format!("{segment}{candidate}");
            if self.is_free(&candidate) {
                return candidate;
            }
        }

        let base = if candidate.is_empty() { "pkg".to_string() } else { candidate };
        let mut n = 2;
        loop {
            let name = format!("{base}{n}");
            if self.is_free(&name) {
                return name;
            }
            n += 1;
        }
    }

    fn is_free(&self, name: &str) -> bool {
        !self.taken.contains(name) && !name.starts_with(|c: char| c.is_ascii_digit())
    }
}

fn sanitize(segment: &str) -> String {
    segment
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
