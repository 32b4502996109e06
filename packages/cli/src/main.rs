#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for address normalization and OSM node import.

mod progress;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use nominatim_import_address::{AddressNormalizer, SuffixLexicon, expand_suffix};
use nominatim_import_address_models::AddressType;
use nominatim_import_entry::{ConfigError, EntryImporter, ImportConfig};
use nominatim_import_entry_models::EntryInput;
use serde::{Serialize, Serializer};

use crate::progress::{NodeBar, init_logger};

#[derive(Parser)]
#[command(
    name = "nominatim_import",
    about = "US address normalization and OSM node import"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Overrides applied on top of the config file.
#[derive(Args, Debug, Default)]
struct SettingsArgs {
    /// TOML config file (defaults are used for missing keys)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Minimum fuzzy score (0-100, exclusive) for suffix expansion
    #[arg(long)]
    threshold: Option<f64>,
    /// Keep street suffixes as written instead of expanding them
    #[arg(long)]
    no_expand: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize one address and print its components as JSON
    Normalize {
        /// Free-form address, e.g. "123 Test St, Testville, TX 12345"
        address: String,
        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Resolve a street suffix to its canonical USPS spelling
    ExpandSuffix {
        /// Suffix token, e.g. "blvd"
        token: String,
        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Import address records from a JSON file into an OSM XML file
    Import {
        /// JSON file holding one record object or an array of records
        #[arg(long)]
        input: PathBuf,
        /// Output filename (default: `<uuid>.osm.xml` in the current directory)
        #[arg(long)]
        output: Option<String>,
        /// Fail on addresses the tagger cannot classify
        #[arg(long)]
        reject_ambiguous: bool,
        #[command(flatten)]
        settings: SettingsArgs,
    },
}

fn load_settings(settings: &SettingsArgs) -> Result<ImportConfig, ConfigError> {
    let mut config = match settings.config.as_deref() {
        Some(path) => ImportConfig::load(path)?,
        None => ImportConfig::default(),
    };
    if let Some(threshold) = settings.threshold {
        config.normalization.suffix_threshold = threshold;
    }
    if settings.no_expand {
        config.normalization.expand_street_suffix = false;
    }
    config.validate()?;
    Ok(config)
}

#[derive(Serialize)]
struct NormalizeOutput {
    address_type: AddressType,
    #[serde(serialize_with = "ordered_map")]
    components: Vec<(String, String)>,
}

/// Serializes pairs as a JSON object, keeping their order.
fn ordered_map<S: Serializer>(pairs: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(pairs.iter().map(|(k, v)| (k, v)))
}

fn read_input(path: &Path) -> Result<EntryInput, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let input = serde_json::from_str(&contents)
        .map_err(|e| format!("Invalid address records in {}: {e}", path.display()))?;
    Ok(input)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Normalize { address, settings } => {
            let config = load_settings(&settings)?;
            let normalizer = AddressNormalizer::new(config.normalization);
            let (normalized, address_type) = normalizer.normalize(&address)?;

            let output = NormalizeOutput {
                address_type,
                components: normalized.to_flat_map(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::ExpandSuffix { token, settings } => {
            let config = load_settings(&settings)?;
            let expanded = expand_suffix(
                &token,
                SuffixLexicon::usps(),
                config.normalization.suffix_threshold,
            );
            println!("{expanded}");
        }
        Commands::Import {
            input,
            output,
            reject_ambiguous,
            settings,
        } => {
            let mut config = load_settings(&settings)?;
            config.reject_ambiguous |= reject_ambiguous;

            let records = read_input(&input)?;
            let filename = output.unwrap_or_else(|| config.default_filename());
            let bar = NodeBar::for_output(&multi, &filename);
            let importer = EntryImporter::new(config);

            let response = importer
                .create_new_entry_with_progress(records, Some(filename), bar)
                .await?;
            println!("{}", serde_json::to_string(&response)?);
        }
    }

    Ok(())
}
