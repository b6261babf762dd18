//! Variant generation loop and CSV manifest output.
//!
//! This crate drives the whole run: it draws value sets from a
//! [`variant_generator::ValueFactory`], rejects value tuples that were already
//! used, builds each accepted variant from an [`xml_template::Template`] and
//! writes it to disk together with a manifest row.
//!
//! # Example
//!
//! ```ignore
//! use variant_populate::{PopulateConfig, VariantPopulator};
//! use variant_generator::{ValueFactory, ValueFactoryConfig};
//! use xml_template::{SelectorMapping, Template};
//!
//! let template = Template::from_file("invoice.xml")?;
//! let mapping = SelectorMapping::from_tag_names(["name", "date"]);
//! let factory = ValueFactory::new(ValueFactoryConfig::default(), Some(42));
//! let config = PopulateConfig::new("out").with_count(100);
//!
//! let report = VariantPopulator::new(template, mapping, factory, config).populate()?;
//! println!("{} of {} variants", report.accepted, report.requested);
//! ```

pub mod args;
mod error;
mod manifest;
mod populator;

pub use args::{GenerateArgs, InspectArgs, LocaleArg, TemplateArgs};
pub use error::PopulateError;
pub use manifest::{ManifestWriter, VariantRecord, MANIFEST_COLUMNS};
pub use populator::{
    PopulateConfig, RunReport, VariantPopulator, DEFAULT_ATTEMPT_MULTIPLIER,
    DEFAULT_MANIFEST_NAME, DEFAULT_VARIANT_COUNT,
};
