//! XML template model for the xml-variants generator.
//!
//! This crate loads a reference document once, resolves logical field
//! selectors against per-attempt copies of it, and serializes the mutated
//! copies.
//!
//! # Architecture
//!
//! ```text
//! template.xml
//!      │
//!      ▼
//! ┌──────────────┐  clone_for_attempt()  ┌──────────────┐
//! │   Template   │ ────────────────────▶ │   Document   │
//! └──────────────┘                       └──────┬───────┘
//!                                               │ Selector::resolve
//!                                               ▼
//!                                  Vec<ElementHandle> ── set_text ──▶ XML text
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use xml_template::{build_variant, SelectorMapping, Template};
//!
//! let template = Template::from_xml("<Order><Name/><Date/></Order>").unwrap();
//! let mut mapping = SelectorMapping::new();
//! mapping.insert("name", "Name");
//! mapping.insert("date", ".//Date");
//!
//! let mut values = BTreeMap::new();
//! values.insert("name".to_string(), "Alex Smith".to_string());
//!
//! let built = build_variant(&template, &mapping, &values).unwrap();
//! assert!(built.xml.contains("<Name>Alex Smith</Name>"));
//! ```

pub mod builder;
pub mod document;
mod error;
pub mod path;
pub mod selector;

pub use builder::{apply_values, build_variant, BuiltVariant};
pub use document::{Document, Element, ElementHandle, Node, Template};
pub use error::{DocumentError, PathError};
pub use path::PathQuery;
pub use selector::{NodeSelector, Selector, SelectorMapping, TagQuery};
