//! Selector mapping parsing.

use anyhow::Context;
use std::collections::BTreeMap;
use variant_generator::CANONICAL_FIELDS;
use xml_template::SelectorMapping;

/// Mapping used when none is configured: each built-in field selects the
/// elements sharing its name.
pub fn default_mapping() -> SelectorMapping {
    SelectorMapping::from_tag_names(CANONICAL_FIELDS)
}

/// Parse `key=selector` pairs separated by commas.
///
/// Commas inside predicates or quotes belong to the selector, and only the
/// first `=` of an entry separates key from selector:
/// `name=.//Name[@lang='en'],date=Date`. A string without entries yields
/// [`default_mapping`].
pub fn parse_mapping(raw: &str) -> anyhow::Result<SelectorMapping> {
    let entries = split_entries(raw);
    if entries.is_empty() {
        return Ok(default_mapping());
    }
    let mut mapping = SelectorMapping::new();
    for entry in entries {
        let (key, selector) = entry
            .split_once('=')
            .with_context(|| format!("Invalid mapping entry '{entry}': expected key=selector"))?;
        insert_entry(&mut mapping, key, selector)?;
    }
    Ok(mapping)
}

/// Build a mapping from config file entries.
pub fn mapping_from_entries(entries: &BTreeMap<String, String>) -> anyhow::Result<SelectorMapping> {
    let mut mapping = SelectorMapping::new();
    for (key, selector) in entries {
        insert_entry(&mut mapping, key, selector)?;
    }
    Ok(mapping)
}

fn insert_entry(mapping: &mut SelectorMapping, key: &str, selector: &str) -> anyhow::Result<()> {
    let (key, selector) = (key.trim(), selector.trim());
    if key.is_empty() {
        anyhow::bail!("Mapping entry for selector '{selector}' has an empty key");
    }
    if selector.is_empty() {
        anyhow::bail!("Mapping entry '{key}' has an empty selector");
    }
    mapping.insert(key, selector);
    Ok(())
}

fn split_entries(raw: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (idx, c) in raw.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                entries.push(&raw[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    entries.push(&raw[start..]);

    entries
        .into_iter()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .collect()
}
