//! Individual value generators.
//!
//! The built-in fields (`name`, `address`, `date`, `time`) have dedicated
//! generators. Any other key can be served by a [`FieldGenerator`], either a
//! closure registered in code or a [`CustomGenerator`] read from YAML.

pub mod address;
pub mod datetime;
pub mod name;
pub mod pattern;
pub mod uuid;

use crate::error::FactoryError;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Generator for a custom field key.
pub trait FieldGenerator: Send + Sync {
    /// Produce a value. `index` counts the value sets generated before this one.
    ///
    /// A mapped key whose value embeds `index` makes every attempt's tuple
    /// unique, so in a generation run it equals the variant id minus one.
    fn generate(&self, rng: &mut StdRng, index: u64) -> String;
}

impl<F> FieldGenerator for F
where
    F: Fn(&mut StdRng, u64) -> String + Send + Sync,
{
    fn generate(&self, rng: &mut StdRng, index: u64) -> String {
        self(rng, index)
    }
}

/// Declarative generator for a custom field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CustomGenerator {
    /// Random UUID v4
    UuidV4,

    /// Pattern with `{index}`, `{uuid}` and `{rand:N}` placeholders
    Pattern { pattern: String },

    /// Random integer in an inclusive range
    IntRange { min: i64, max: i64 },

    /// Uniform pick from a list
    OneOf { values: Vec<String> },

    /// Always the same value
    Static { value: String },
}

impl CustomGenerator {
    /// Reject definitions that cannot produce a value.
    pub fn validate(&self, key: &str) -> Result<(), FactoryError> {
        let reason = match self {
            CustomGenerator::IntRange { min, max } if min > max => {
                format!("int_range min {min} is greater than max {max}")
            }
            CustomGenerator::OneOf { values } if values.is_empty() => {
                "one_of needs at least one value".to_string()
            }
            _ => return Ok(()),
        };
        Err(FactoryError::InvalidGenerator {
            key: key.to_string(),
            reason,
        })
    }
}

impl FieldGenerator for CustomGenerator {
    fn generate(&self, rng: &mut StdRng, index: u64) -> String {
        match self {
            CustomGenerator::UuidV4 => uuid::generate_uuid_v4(rng).to_string(),
            CustomGenerator::Pattern { pattern } => pattern::generate_pattern(pattern, rng, index),
            CustomGenerator::IntRange { min, max } => rng.random_range(*min..=*max).to_string(),
            CustomGenerator::OneOf { values } => values
                .get(rng.random_range(0..values.len().max(1)))
                .cloned()
                .unwrap_or_default(),
            CustomGenerator::Static { value } => value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    #[test]
    fn test_deserialize_definitions() {
        let yaml = r#"
order_id:
  type: pattern
  pattern: "ORD-{rand:6}"
status:
  type: one_of
  values: [open, closed]
quantity:
  type: int_range
  min: 1
  max: 5
ref:
  type: uuid_v4
channel:
  type: static
  value: web
"#;
        let defs: BTreeMap<String, CustomGenerator> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(defs.len(), 5);
        assert_eq!(defs["ref"], CustomGenerator::UuidV4);
        assert_eq!(
            defs["quantity"],
            CustomGenerator::IntRange { min: 1, max: 5 }
        );
    }

    #[test]
    fn test_generate_custom_values() {
        let mut rng = StdRng::seed_from_u64(42);

        let quantity = CustomGenerator::IntRange { min: 1, max: 5 }.generate(&mut rng, 0);
        assert!((1..=5).contains(&quantity.parse::<i64>().unwrap()));

        let status = CustomGenerator::OneOf {
            values: vec!["open".to_string(), "closed".to_string()],
        }
        .generate(&mut rng, 0);
        assert!(status == "open" || status == "closed");

        let fixed = CustomGenerator::Static {
            value: "web".to_string(),
        };
        assert_eq!(fixed.generate(&mut rng, 3), "web");

        let pattern = CustomGenerator::Pattern {
            pattern: "row-{index}".to_string(),
        };
        assert_eq!(pattern.generate(&mut rng, 7), "row-7");
    }

    #[test]
    fn test_validate() {
        assert!(CustomGenerator::IntRange { min: 5, max: 1 }
            .validate("q")
            .is_err());
        assert!(CustomGenerator::OneOf { values: vec![] }
            .validate("s")
            .is_err());
        assert!(CustomGenerator::UuidV4.validate("id").is_ok());
    }

    #[test]
    fn test_closure_generator() {
        let generator = |_: &mut StdRng, index: u64| format!("SKU{index:04}");
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(generator.generate(&mut rng, 12), "SKU0012");
    }
}
