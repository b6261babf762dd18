//! YAML configuration file.
//!
//! Every field is optional; command-line flags take precedence over values
//! read from the file.
//!
//! ```yaml
//! count: 50
//! seed: 42
//! locale: au
//! vary_formats: true
//! until: "2024-12-31"
//! mapping:
//!   name: .//Customer/Name
//!   order_id: OrderId
//! date_formats: ["%Y-%m-%d", "%B %d, %Y"]
//! custom:
//!   order_id:
//!     type: pattern
//!     pattern: "ORD-{rand:6}"
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use variant_generator::{CustomGenerator, Locale};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Number of variants to generate
    pub count: Option<u64>,
    pub attempt_multiplier: Option<u64>,
    /// Manifest CSV path
    pub manifest: Option<PathBuf>,
    /// Logical key → selector
    pub mapping: BTreeMap<String, String>,
    pub date_formats: Vec<String>,
    pub time_formats: Vec<String>,
    pub vary_formats: Option<bool>,
    pub seed: Option<u64>,
    pub locale: Option<Locale>,
    /// Upper bound of the date window
    pub until: Option<String>,
    /// Generators for keys other than the built-in fields
    pub custom: BTreeMap<String, CustomGenerator>,
}

impl FileConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {path:?}"))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid config file {path:?}"))
    }

    /// Parse configuration from a YAML string. An empty document is the default config.
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load `path` if given, otherwise the default config.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
count: 50
seed: 7
locale: au
vary_formats: true
until: "2024-12-31"
mapping:
  name: .//Customer/Name
  sku: Sku
date_formats: ["%Y-%m-%d", "%B %d, %Y"]
custom:
  sku:
    type: pattern
    pattern: "SKU-{rand:4}"
"#;
        let config = FileConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.count, Some(50));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.locale, Some(Locale::Au));
        assert_eq!(config.vary_formats, Some(true));
        assert_eq!(config.mapping["name"], ".//Customer/Name");
        assert_eq!(config.date_formats[1], "%B %d, %Y");
        assert!(config.time_formats.is_empty());
        assert_eq!(
            config.custom["sku"],
            CustomGenerator::Pattern {
                pattern: "SKU-{rand:4}".to_string()
            }
        );
    }

    #[test]
    fn test_empty_and_unknown_fields() {
        assert_eq!(FileConfig::from_yaml("").unwrap(), FileConfig::default());
        assert!(FileConfig::from_yaml("colour: blue").is_err());
        assert!(FileConfig::from_yaml("locale: mars").is_err());
    }

    #[test]
    fn test_from_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "count: 3\nattempt_multiplier: 5\n").unwrap();

        let config = FileConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.count, Some(3));
        assert_eq!(config.attempt_multiplier, Some(5));

        let missing = FileConfig::from_file("/nonexistent/xml-variants.yaml").unwrap_err();
        assert!(format!("{missing:#}").contains("Failed to read config file"));
    }
}
