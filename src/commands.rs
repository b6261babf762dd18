//! Command implementations.

use crate::config::{resolve_mapping, FileConfig, GenerateSettings};
use anyhow::Context;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;
use variant_populate::{GenerateArgs, InspectArgs, RunReport, VariantPopulator};
use xml_template::Template;

/// Generate variants as configured by `args`.
///
/// Configuration and the template are validated before the output directory
/// or manifest is created, so bad input leaves nothing behind.
pub fn generate(args: &GenerateArgs) -> anyhow::Result<RunReport> {
    let settings = GenerateSettings::resolve(args)?;
    let template = load_template(&args.template.input)?;
    let factory = settings.build_factory()?;

    info!(
        "Mapping {} keys (seed={})",
        settings.mapping.len(),
        settings
            .seed
            .map_or_else(|| "random".to_string(), |s| s.to_string())
    );

    let mut populator =
        VariantPopulator::new(template, settings.mapping, factory, settings.populate);
    populator
        .populate()
        .with_context(|| format!("Failed to generate variants into {:?}", args.out))
}

/// Selector match counts for a template, as printed by `inspect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    pub template: String,
    pub root: String,
    pub elements: usize,
    pub matches: BTreeMap<String, usize>,
}

/// Resolve every mapped selector against the template without writing anything.
pub fn inspect(args: &InspectArgs) -> anyhow::Result<InspectReport> {
    let file = FileConfig::load(args.template.config.as_deref())?;
    let mapping = resolve_mapping(&args.template, &file)?;
    let template = load_template(&args.template.input)?;
    let document = template.document();

    Ok(InspectReport {
        template: template.stem(),
        root: document.root().name.clone(),
        elements: document.elements().len(),
        matches: mapping.match_counts(document),
    })
}

fn load_template(path: &Path) -> anyhow::Result<Template> {
    Template::from_file(path).with_context(|| format!("Failed to load template {path:?}"))
}
