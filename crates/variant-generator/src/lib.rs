//! Randomized field values for the xml-variants generator.
//!
//! This crate provides the [`ValueFactory`], which produces one [`ValueSet`]
//! per generation attempt. A seeded RNG makes the whole sequence of value
//! sets reproducible across runs.
//!
//! # Architecture
//!
//! ```text
//! ValueFactoryConfig ──┐
//!   (locale, pools,    │
//!    vary, window)     ▼
//!              ┌────────────────┐
//!              │  ValueFactory  │
//!              │                │
//!              │  - rng (StdRng)│
//!              │  - custom keys │
//!              └───────┬────────┘
//!                      │ generate()
//!                      ▼
//!     ValueSet { name, address, date, time, <custom>... }
//! ```
//!
//! # Example
//!
//! ```rust
//! use variant_generator::{ValueFactory, ValueFactoryConfig, CustomGenerator};
//!
//! let mut factory = ValueFactory::new(ValueFactoryConfig::default(), Some(42));
//! factory
//!     .register("order_id", CustomGenerator::Pattern { pattern: "ORD-{rand:6}".into() })
//!     .unwrap();
//!
//! let values = factory.generate();
//! assert!(values.get("name").is_some());
//! assert!(values.get("order_id").unwrap().starts_with("ORD-"));
//! ```
//!
//! # Built-in fields
//!
//! - `name` - five layouts over fixed first/last name pools
//! - `address` - four layouts over locale-specific pools (`generic`, `au`)
//! - `date` / `time` - a random instant rendered through strftime pattern pools,
//!   optionally with a `Z` or `±HH:MM` suffix on the time

mod error;
pub mod factory;
pub mod generators;

pub use error::FactoryError;
pub use factory::{ValueFactory, ValueFactoryConfig, ValueSet, CANONICAL_FIELDS};
pub use generators::address::Locale;
pub use generators::datetime::{
    parse_timestamp, DateWindow, FormatPool, DEFAULT_DATE_FORMATS, DEFAULT_TIME_FORMATS,
};
pub use generators::{CustomGenerator, FieldGenerator};
