//! Configuration resolution.
//!
//! Settings come from three layers, highest precedence first: command-line
//! flags (and their environment variables), the YAML config file, built-in
//! defaults.

pub mod file;
pub mod mapping;

pub use file::FileConfig;
pub use mapping::{default_mapping, mapping_from_entries, parse_mapping};

use anyhow::Context;
use std::collections::BTreeMap;
use variant_generator::{
    parse_timestamp, CustomGenerator, DateWindow, FormatPool, ValueFactory, ValueFactoryConfig,
};
use variant_populate::{GenerateArgs, PopulateConfig, TemplateArgs};
use xml_template::SelectorMapping;

/// Fully resolved settings for a generate run.
#[derive(Debug, Clone)]
pub struct GenerateSettings {
    pub mapping: SelectorMapping,
    pub factory: ValueFactoryConfig,
    pub custom: BTreeMap<String, CustomGenerator>,
    /// `None` seeds from OS entropy
    pub seed: Option<u64>,
    pub populate: PopulateConfig,
}

impl GenerateSettings {
    pub fn resolve(args: &GenerateArgs) -> anyhow::Result<Self> {
        let file = FileConfig::load(args.template.config.as_deref())?;
        Self::merge(args, file)
    }

    /// Merge command-line arguments over a loaded config file.
    pub fn merge(args: &GenerateArgs, file: FileConfig) -> anyhow::Result<Self> {
        let mapping = resolve_mapping(&args.template, &file)?;

        let date_formats = match (&args.date_formats, file.date_formats.is_empty()) {
            (Some(list), _) => FormatPool::parse("date", list)?,
            (None, false) => FormatPool::new("date", &file.date_formats)?,
            (None, true) => FormatPool::default_dates(),
        };
        let time_formats = match (&args.time_formats, file.time_formats.is_empty()) {
            (Some(list), _) => FormatPool::parse("time", list)?,
            (None, false) => FormatPool::new("time", &file.time_formats)?,
            (None, true) => FormatPool::default_times(),
        };

        let window = match args.until.as_deref().or(file.until.as_deref()) {
            Some(until) => DateWindow::until(parse_timestamp(until)?)
                .with_context(|| format!("Invalid date window end '{until}'"))?,
            None => DateWindow::default(),
        };

        let factory = ValueFactoryConfig {
            locale: args.locale.map(Into::into).or(file.locale).unwrap_or_default(),
            date_formats,
            time_formats,
            vary_formats: args
                .vary_formats_flag()
                .or(file.vary_formats)
                .unwrap_or(false),
            window,
        };

        let mut populate = PopulateConfig::new(&args.out);
        if let Some(count) = args.n.or(file.count) {
            populate = populate.with_count(count);
        }
        if let Some(multiplier) = args.attempt_multiplier.or(file.attempt_multiplier) {
            if multiplier == 0 {
                anyhow::bail!("Attempt multiplier must be at least 1");
            }
            populate = populate.with_attempt_multiplier(multiplier);
        }
        if let Some(manifest) = args.csv.clone().or(file.manifest) {
            populate = populate.with_manifest_path(manifest);
        }

        Ok(Self {
            mapping,
            factory,
            custom: file.custom,
            seed: args.seed.or(file.seed),
            populate,
        })
    }

    /// Create the value factory with every custom generator registered.
    pub fn build_factory(&self) -> anyhow::Result<ValueFactory> {
        let mut factory = ValueFactory::new(self.factory.clone(), self.seed);
        factory
            .register_all(&self.custom)
            .context("Invalid custom generator")?;
        Ok(factory)
    }
}

/// `--map` replaces the config file mapping as a whole; without either the
/// built-in fields map to their own tag names.
pub fn resolve_mapping(args: &TemplateArgs, file: &FileConfig) -> anyhow::Result<SelectorMapping> {
    if let Some(raw) = &args.map {
        return parse_mapping(raw).context("Invalid --map");
    }
    if !file.mapping.is_empty() {
        return mapping_from_entries(&file.mapping).context("Invalid mapping in config file");
    }
    Ok(default_mapping())
}
