//! Variant building: clone the template, apply values, serialize.

use crate::document::{Document, Template};
use crate::error::DocumentError;
use crate::selector::SelectorMapping;
use std::collections::BTreeMap;
use tracing::debug;

/// A serialized variant and how many elements each key touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltVariant {
    pub xml: String,
    pub touched: BTreeMap<String, usize>,
}

impl BuiltVariant {
    /// Keys that had a value but matched no element.
    pub fn missed_keys(&self) -> impl Iterator<Item = &str> {
        self.touched
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(key, _)| key.as_str())
    }
}

/// Set the text of every element selected for each mapped key that has a value.
///
/// Keys without a value are skipped and not reported. Returns the number of
/// elements touched per reported key.
pub fn apply_values(
    document: &mut Document,
    mapping: &SelectorMapping,
    values: &BTreeMap<String, String>,
) -> BTreeMap<String, usize> {
    let mut touched = BTreeMap::new();

    for (key, selector) in mapping.iter() {
        let Some(value) = values.get(key) else {
            continue;
        };

        let handles = selector.resolve(document);
        // Reverse document order: editing an ancestor's leading text shifts
        // the child indices its descendants' handles rely on.
        for handle in handles.iter().rev() {
            if let Some(element) = document.element_mut(handle) {
                element.set_text(value);
            }
        }

        if handles.is_empty() {
            debug!("Selector '{}' for '{}' matched no elements", selector, key);
        }
        touched.insert(key.to_string(), handles.len());
    }

    touched
}

/// Build one variant from the template without touching the template itself.
pub fn build_variant(
    template: &Template,
    mapping: &SelectorMapping,
    values: &BTreeMap<String, String>,
) -> Result<BuiltVariant, DocumentError> {
    let mut document = template.clone_for_attempt();
    let touched = apply_values(&mut document, mapping, values);
    let xml = document.to_xml_string()?;
    Ok(BuiltVariant { xml, touched })
}
