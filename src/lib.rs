//! xml-variants library
//!
//! Generates many unique variants of one XML template by writing randomized
//! names, addresses, dates, times and custom values into the elements picked
//! out by a selector mapping. Every variant is written as its own file and
//! recorded in a CSV manifest.
//!
//! The work is split across workspace crates:
//!
//! - `xml_template` - owned XML document model, selectors and variant building
//! - `variant_generator` - seeded value generation
//! - `variant_populate` - the uniqueness-enforcing loop and the manifest
//!
//! This crate resolves configuration and wires them together for the CLI.
//!
//! # CLI Usage
//!
//! ```bash
//! # Ten variants of invoice.xml with the default mapping
//! xml-variants generate --input invoice.xml --out variants/
//!
//! # Reproducible run with varied date/time formats
//! xml-variants generate --input invoice.xml --out variants/ -n 200 \
//!   --seed 42 --until 2024-12-31 --vary-formats \
//!   --map "name=.//Customer/Name,date=.//IssueDate"
//!
//! # Check what each selector matches
//! xml-variants inspect --input invoice.xml --map "address=.//Address"
//! ```

pub mod commands;
pub mod config;

pub use commands::{generate, inspect, InspectReport};
pub use config::{FileConfig, GenerateSettings};
