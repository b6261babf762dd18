//! Selector resolution.
//!
//! A selector is decided once, when the mapping is built: text starting with
//! `.` or `/` is a [`Selector::StructuralPath`], anything else a
//! [`Selector::TagName`] matched against local names case-insensitively.
//! Structural paths that fail to parse or match nothing fall back to a
//! tag-name search derived from the path's last step.

use crate::document::{Document, ElementHandle};
use crate::error::PathError;
use crate::path::PathQuery;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Something that can pick elements out of a document.
pub trait NodeSelector {
    fn select(&self, document: &Document) -> Result<Vec<ElementHandle>, PathError>;
}

/// Namespace-agnostic, case-insensitive local-name match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagQuery {
    local_name: String,
}

impl TagQuery {
    pub fn new(name: &str) -> Self {
        Self {
            local_name: name.trim().to_lowercase(),
        }
    }

    /// Tag query used when a structural path cannot be applied.
    ///
    /// Strips leading and trailing `.`/`/`, keeps the last step, drops
    /// predicates and any namespace prefix: `.//c:Address[@x]` → `Address`.
    pub fn fallback_for(expr: &str) -> Self {
        let mut plain = String::with_capacity(expr.len());
        let mut depth = 0usize;
        for c in expr.trim().chars() {
            match c {
                '[' => depth += 1,
                ']' => depth = depth.saturating_sub(1),
                c if depth == 0 => plain.push(c),
                _ => {}
            }
        }
        let stripped = plain.trim_matches(|c| c == '.' || c == '/');
        let last = stripped.rsplit('/').next().unwrap_or(stripped);
        let local = last.split_once(':').map(|(_, l)| l).unwrap_or(last);
        Self::new(local)
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn find(&self, document: &Document) -> Vec<ElementHandle> {
        if self.local_name.is_empty() {
            return Vec::new();
        }
        document
            .elements()
            .into_iter()
            .filter(|(_, el)| el.local_name().to_lowercase() == self.local_name)
            .map(|(handle, _)| handle)
            .collect()
    }
}

impl NodeSelector for TagQuery {
    fn select(&self, document: &Document) -> Result<Vec<ElementHandle>, PathError> {
        Ok(self.find(document))
    }
}

/// A configured selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    StructuralPath(String),
    TagName(String),
}

impl Selector {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with('.') || raw.starts_with('/') {
            Selector::StructuralPath(raw.to_string())
        } else {
            Selector::TagName(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Selector::StructuralPath(s) | Selector::TagName(s) => s,
        }
    }

    /// Resolve to element handles in document order. Zero matches is not an error.
    pub fn resolve(&self, document: &Document) -> Vec<ElementHandle> {
        match self {
            Selector::TagName(name) => TagQuery::new(name).find(document),
            Selector::StructuralPath(expr) => {
                match PathQuery::parse(expr).and_then(|query| query.select(document)) {
                    Ok(handles) if !handles.is_empty() => handles,
                    Ok(_) => {
                        debug!("Path '{}' matched nothing, falling back to tag search", expr);
                        TagQuery::fallback_for(expr).find(document)
                    }
                    Err(e) => {
                        debug!("{}, falling back to tag search", e);
                        TagQuery::fallback_for(expr).find(document)
                    }
                }
            }
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical field key → selector, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorMapping {
    entries: BTreeMap<String, Selector>,
}

impl SelectorMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapping where every key selects elements with the same tag name.
    pub fn from_tag_names<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut mapping = Self::new();
        for key in keys {
            mapping.insert(key.as_ref(), key.as_ref());
        }
        mapping
    }

    /// Insert or replace the selector for `key`.
    pub fn insert(&mut self, key: &str, selector: &str) {
        self.entries
            .insert(key.trim().to_string(), Selector::parse(selector));
    }

    pub fn get(&self, key: &str) -> Option<&Selector> {
        self.entries.get(key)
    }

    /// Keys in the order used for uniqueness projections.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Selector)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of elements each key resolves to in `document`.
    pub fn match_counts(&self, document: &Document) -> BTreeMap<String, usize> {
        self.entries
            .iter()
            .map(|(key, selector)| (key.clone(), selector.resolve(document).len()))
            .collect()
    }
}
