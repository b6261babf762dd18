//! Uniqueness-enforcing generation loop.

use crate::error::PopulateError;
use crate::manifest::{ManifestWriter, VariantRecord};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use variant_generator::ValueFactory;
use xml_template::{build_variant, SelectorMapping, Template};

/// Default number of variants to generate.
pub const DEFAULT_VARIANT_COUNT: u64 = 10;

/// Default bound on attempts, as a multiple of the requested count.
pub const DEFAULT_ATTEMPT_MULTIPLIER: u64 = 20;

/// Default manifest file name inside the output directory.
pub const DEFAULT_MANIFEST_NAME: &str = "manifest.csv";

/// Settings for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulateConfig {
    pub count: u64,
    pub attempt_multiplier: u64,
    pub output_dir: PathBuf,
    /// Defaults to `<output_dir>/manifest.csv`
    pub manifest_path: Option<PathBuf>,
}

impl PopulateConfig {
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self {
            count: DEFAULT_VARIANT_COUNT,
            attempt_multiplier: DEFAULT_ATTEMPT_MULTIPLIER,
            output_dir: output_dir.into(),
            manifest_path: None,
        }
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    pub fn with_attempt_multiplier(mut self, multiplier: u64) -> Self {
        self.attempt_multiplier = multiplier;
        self
    }

    pub fn with_manifest_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.manifest_path = Some(path.into());
        self
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.manifest_path
            .clone()
            .unwrap_or_else(|| self.output_dir.join(DEFAULT_MANIFEST_NAME))
    }

    pub fn max_attempts(&self) -> u64 {
        self.count.saturating_mul(self.attempt_multiplier)
    }
}

/// Outcome and metrics of a generation run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub requested: u64,
    pub accepted: u64,
    pub attempts: u64,
    pub max_attempts: u64,
    /// Attempts rejected because their value tuple was already used
    pub duplicates: u64,
    /// The attempt bound was hit before `requested` variants were accepted
    pub exhausted: bool,
    pub files: Vec<PathBuf>,
    pub manifest_path: PathBuf,
    /// Per key, how many accepted variants had no element matched by its selector
    pub selector_misses: BTreeMap<String, u64>,
    pub total_duration: Duration,
    pub generation_duration: Duration,
    pub write_duration: Duration,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        self.accepted == self.requested
    }

    /// Calculate accepted variants per second.
    pub fn variants_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.accepted as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Drives value generation, deduplication, building and output for one run.
pub struct VariantPopulator {
    template: Template,
    mapping: SelectorMapping,
    factory: ValueFactory,
    config: PopulateConfig,
}

impl VariantPopulator {
    pub fn new(
        template: Template,
        mapping: SelectorMapping,
        factory: ValueFactory,
        config: PopulateConfig,
    ) -> Self {
        Self {
            template,
            mapping,
            factory,
            config,
        }
    }

    pub fn config(&self) -> &PopulateConfig {
        &self.config
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Output file name for variant `id`.
    pub fn variant_filename(&self, id: u64) -> String {
        format!("{}_variant_{:03}.xml", self.template.stem(), id)
    }

    /// Generate up to `count` unique variants.
    ///
    /// Every attempt draws a fresh value set. Its projection onto the mapped
    /// keys must not have been seen before, otherwise the attempt is dropped
    /// without building or writing anything. The run stops once `count`
    /// variants are accepted or `count × attempt_multiplier` attempts are used;
    /// the latter is reported through [`RunReport::exhausted`].
    pub fn populate(&mut self) -> Result<RunReport, PopulateError> {
        let start_time = Instant::now();
        let keys: Vec<String> = self.mapping.keys().map(str::to_string).collect();
        let mut report = RunReport {
            requested: self.config.count,
            max_attempts: self.config.max_attempts(),
            manifest_path: self.config.manifest_path(),
            ..RunReport::default()
        };

        info!(
            "Generating {} variants of '{}' into '{}' (at most {} attempts)",
            report.requested,
            self.template.stem(),
            self.config.output_dir.display(),
            report.max_attempts
        );
        for key in keys.iter().filter(|k| !self.factory.has_generator(k)) {
            warn!("No generator for '{}'; its elements are left unchanged", key);
        }

        std::fs::create_dir_all(&self.config.output_dir).map_err(|source| {
            PopulateError::Write {
                path: self.config.output_dir.clone(),
                source,
            }
        })?;
        let mut manifest = ManifestWriter::create(&report.manifest_path)?;
        manifest.write_header()?;

        let mut seen: HashSet<Vec<String>> = HashSet::new();
        let mut generation_time = Duration::ZERO;
        let mut write_time = Duration::ZERO;

        while report.accepted < report.requested && report.attempts < report.max_attempts {
            report.attempts += 1;

            let gen_start = Instant::now();
            let mut values = self.factory.generate();
            values.retain_keys(keys.iter().map(String::as_str));
            let tuple = values.project(keys.iter().map(String::as_str));

            if !seen.insert(tuple) {
                report.duplicates += 1;
                generation_time += gen_start.elapsed();
                debug!("Attempt {} produced a duplicate value tuple", report.attempts);
                continue;
            }

            let built = build_variant(&self.template, &self.mapping, values.as_map())?;
            generation_time += gen_start.elapsed();
            for key in built.missed_keys() {
                *report.selector_misses.entry(key.to_string()).or_default() += 1;
            }

            let write_start = Instant::now();
            let id = report.accepted + 1;
            let record = VariantRecord {
                id,
                filename: self.variant_filename(id),
                values,
                xml: built.xml,
            };
            let path = self.config.output_dir.join(&record.filename);
            write_variant(&path, &record.xml)?;
            manifest.write_row(&record)?;
            write_time += write_start.elapsed();

            report.files.push(path);
            report.accepted = id;
            debug!("Accepted variant {} after {} attempts", id, report.attempts);
        }

        manifest.finish()?;

        report.exhausted = report.accepted < report.requested;
        report.total_duration = start_time.elapsed();
        report.generation_duration = generation_time;
        report.write_duration = write_time;

        if report.exhausted {
            warn!(
                "Stopped after {} attempts with {} of {} variants; the value space is too small \
                 for the requested count (enable format variation or lower the count)",
                report.attempts, report.accepted, report.requested
            );
        }
        info!(
            "Generated {} variants ({} duplicates rejected) in {:?} ({:.2} variants/sec)",
            report.accepted,
            report.duplicates,
            report.total_duration,
            report.variants_per_second()
        );

        Ok(report)
    }
}

fn write_variant(path: &Path, xml: &str) -> Result<(), PopulateError> {
    std::fs::write(path, xml).map_err(|source| PopulateError::Write {
        path: path.to_path_buf(),
        source,
    })
}
