//! Value factory producing one [`ValueSet`] per generation attempt.

use crate::error::FactoryError;
use crate::generators::address::{generate_address, Locale};
use crate::generators::datetime::{generate_date_time, DateWindow, FormatPool};
use crate::generators::name::generate_name;
use crate::generators::{CustomGenerator, FieldGenerator};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

pub const NAME: &str = "name";
pub const ADDRESS: &str = "address";
pub const DATE: &str = "date";
pub const TIME: &str = "time";

/// The built-in field keys, in manifest column order.
pub const CANONICAL_FIELDS: [&str; 4] = [NAME, ADDRESS, DATE, TIME];

/// Generated values for one attempt, keyed by logical field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueSet {
    values: BTreeMap<String, String>,
}

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Values for `keys` in order, `""` where a key has no value.
    pub fn project<'a, I>(&self, keys: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        keys.into_iter()
            .map(|key| self.get(key).unwrap_or_default().to_string())
            .collect()
    }

    /// Drop every key not in `keys`.
    pub fn retain_keys<'a, I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let keep: Vec<&str> = keys.into_iter().collect();
        self.values.retain(|key, _| keep.contains(&key.as_str()));
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, String)> for ValueSet {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Settings for the built-in generators.
#[derive(Debug, Clone)]
pub struct ValueFactoryConfig {
    pub locale: Locale,
    pub date_formats: FormatPool,
    pub time_formats: FormatPool,
    /// Pick formats and timezone suffixes per value set instead of the first pattern
    pub vary_formats: bool,
    pub window: DateWindow,
}

impl Default for ValueFactoryConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            date_formats: FormatPool::default_dates(),
            time_formats: FormatPool::default_times(),
            vary_formats: false,
            window: DateWindow::default(),
        }
    }
}

/// Produces randomized value sets.
///
/// With a seed, the sequence of value sets is fully reproducible for the
/// same configuration and registered generators. Draw order per call is
/// name, address, date/time, then custom keys in key order.
pub struct ValueFactory {
    config: ValueFactoryConfig,
    rng: StdRng,
    custom: BTreeMap<String, Box<dyn FieldGenerator>>,
    generated: u64,
}

impl ValueFactory {
    /// Create a factory; without a seed the RNG is seeded from the OS.
    pub fn new(config: ValueFactoryConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            config,
            rng,
            custom: BTreeMap::new(),
            generated: 0,
        }
    }

    /// Register a generator for a custom key, replacing any previous one.
    ///
    /// Built-in keys cannot be overridden.
    pub fn register<G>(&mut self, key: &str, generator: G) -> Result<(), FactoryError>
    where
        G: FieldGenerator + 'static,
    {
        if CANONICAL_FIELDS.contains(&key) {
            return Err(FactoryError::InvalidGenerator {
                key: key.to_string(),
                reason: "built-in fields cannot be overridden".to_string(),
            });
        }
        self.custom.insert(key.to_string(), Box::new(generator));
        Ok(())
    }

    /// Register validated declarative generators.
    pub fn register_all(
        &mut self,
        definitions: &BTreeMap<String, CustomGenerator>,
    ) -> Result<(), FactoryError> {
        for (key, definition) in definitions {
            definition.validate(key)?;
            self.register(key, definition.clone())?;
        }
        Ok(())
    }

    /// Whether a value is produced for `key`.
    pub fn has_generator(&self, key: &str) -> bool {
        CANONICAL_FIELDS.contains(&key) || self.custom.contains_key(key)
    }

    pub fn config(&self) -> &ValueFactoryConfig {
        &self.config
    }

    /// Number of value sets produced so far.
    pub fn generated(&self) -> u64 {
        self.generated
    }

    /// Generate the next value set.
    ///
    /// Keys without a generator are absent from the result.
    pub fn generate(&mut self) -> ValueSet {
        let config = &self.config;
        let rng = &mut self.rng;
        let mut values = ValueSet::new();

        values.insert(NAME, generate_name(rng));
        values.insert(ADDRESS, generate_address(rng, config.locale));

        let date_time = generate_date_time(
            rng,
            &config.window,
            &config.date_formats,
            &config.time_formats,
            config.vary_formats,
        );
        values.insert(DATE, date_time.date);
        values.insert(TIME, date_time.time);

        for (key, generator) in &self.custom {
            values.insert(key.clone(), generator.generate(rng, self.generated));
        }

        self.generated += 1;
        values
    }
}

impl std::fmt::Debug for ValueFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueFactory")
            .field("config", &self.config)
            .field("custom", &self.custom.keys().collect::<Vec<_>>())
            .field("generated", &self.generated)
            .finish()
    }
}
