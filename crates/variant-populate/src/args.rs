//! CLI argument definitions for the variant populator.
//!
//! Settings that a YAML config file can also provide are optional here so the
//! caller can tell an explicit flag apart from a default.

use clap::{Args, ValueEnum};
use std::path::PathBuf;
use variant_generator::Locale;

/// Address locale for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LocaleArg {
    Generic,
    Au,
}

impl From<LocaleArg> for Locale {
    fn from(arg: LocaleArg) -> Self {
        match arg {
            LocaleArg::Generic => Locale::Generic,
            LocaleArg::Au => Locale::Au,
        }
    }
}

/// Arguments shared by every command that reads a template.
#[derive(Args, Clone, Debug)]
pub struct TemplateArgs {
    /// Path to the XML template
    #[arg(long, short = 'i')]
    pub input: PathBuf,

    /// Selector mapping as comma-separated key=selector pairs
    /// (e.g. "name=.//Customer/Name,date=Date")
    #[arg(long)]
    pub map: Option<String>,

    /// Path to a YAML config file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
}

/// Arguments for the generate command.
#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub template: TemplateArgs,

    /// Output directory for variant XML files
    #[arg(long, short = 'o')]
    pub out: PathBuf,

    /// Number of variants to generate [default: 10]
    #[arg(long, short = 'n')]
    pub n: Option<u64>,

    /// Manifest CSV path [default: <out>/manifest.csv]
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Comma-separated strftime date patterns
    #[arg(long)]
    pub date_formats: Option<String>,

    /// Comma-separated strftime time patterns
    #[arg(long)]
    pub time_formats: Option<String>,

    /// Pick a random date/time format and timezone suffix per variant
    #[arg(long, overrides_with = "no_vary_formats")]
    pub vary_formats: bool,

    /// Use the first date/time pattern for every variant, even if the config
    /// file enables variation
    #[arg(long, overrides_with = "vary_formats")]
    pub no_vary_formats: bool,

    /// Random seed for deterministic generation (same seed = same variants)
    #[arg(long, env = "XML_VARIANTS_SEED")]
    pub seed: Option<u64>,

    /// Address locale
    #[arg(long, value_enum, env = "XML_VARIANTS_LOCALE")]
    pub locale: Option<LocaleArg>,

    /// Attempts allowed per requested variant before giving up [default: 20]
    #[arg(long)]
    pub attempt_multiplier: Option<u64>,

    /// Upper bound of the random date window (RFC 3339 or YYYY-MM-DD) [default: now]
    #[arg(long)]
    pub until: Option<String>,
}

impl GenerateArgs {
    /// Format variation as set on the command line; the last flag wins.
    pub fn vary_formats_flag(&self) -> Option<bool> {
        match (self.vary_formats, self.no_vary_formats) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        }
    }
}

/// Arguments for the inspect command.
#[derive(Args, Clone, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub template: TemplateArgs,
}
