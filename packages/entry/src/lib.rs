#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Address import service.
//!
//! Takes raw address records, normalizes each one, and writes a
//! `(primary, place)` node pair per record to an OSM XML file:
//!
//! 1. The record's street line is tagged and normalized through
//!    [`AddressNormalizer`]; city, state and postcode come from their own
//!    fields.
//! 2. [`assemble`] builds the node pair from the normalized street,
//!    unit, and the record's own postcode/city/state/country.
//! 3. [`EntryIdCounter`] hands out the pair's ids.
//! 4. An [`EntryWriter`] persists the nodes in order.
//!
//! Batches are all-or-nothing: the first failing record aborts the run
//! and the unfinished output file is removed.

pub mod assemble;
pub mod config;
pub mod ids;
pub mod progress;
pub mod writer;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use nominatim_import_address::{AddressNormalizer, NormalizeError};
use nominatim_import_address_models::{AddressType, RawAddressRecord};
use nominatim_import_entry_models::{EntryInput, ImportResponse};

pub use assemble::{AddressModel, assemble, resolve_location};
pub use config::{ConfigError, ImportConfig};
pub use ids::{EntryIdCounter, timestamp_now};
pub use progress::{NullProgress, ProgressCallback, null_progress};
pub use writer::{EntryWriter, OsmXmlWriter, VecWriter, WriteError};

/// Each record becomes a primary node and a place node.
const NODES_PER_RECORD: u64 = 2;

/// Errors from an import run.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// A record's address could not be normalized.
    #[error("Normalization error: {0}")]
    Normalize(#[from] NormalizeError),

    /// Output could not be written.
    #[error("Write error: {0}")]
    Write(#[from] WriteError),

    /// Config could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The tagger could not classify the address and ambiguous records
    /// are configured to be rejected.
    #[error("Could not parse address {address:?} (classified as {address_type})")]
    UnparseableAddress {
        /// The one-line address that was tagged.
        address: String,
        /// The classification it received.
        address_type: AddressType,
    },

    /// The blocking write task panicked or was cancelled.
    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Normalizes records and writes their node pairs.
#[derive(Debug, Clone)]
pub struct EntryImporter {
    normalizer: AddressNormalizer,
    config: ImportConfig,
}

impl Default for EntryImporter {
    fn default() -> Self {
        Self::new(ImportConfig::default())
    }
}

impl EntryImporter {
    #[must_use]
    pub fn new(config: ImportConfig) -> Self {
        Self {
            normalizer: AddressNormalizer::new(config.normalization),
            config,
        }
    }

    /// Replaces the normalizer, e.g. to plug in a different tagger.
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: AddressNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Normalizes one record into its taggable values.
    ///
    /// # Errors
    ///
    /// * [`ImportError::Normalize`] if the street line lacks a street or
    ///   house number, or the record's state is missing or unknown
    /// * [`ImportError::UnparseableAddress`] if the tagger could not
    ///   classify it and `reject_ambiguous` is set
    pub fn model_for(&self, record: &RawAddressRecord) -> Result<AddressModel, ImportError> {
        self.classify(record).map(|(model, _)| model)
    }

    fn classify(
        &self,
        record: &RawAddressRecord,
    ) -> Result<(AddressModel, AddressType), ImportError> {
        let (normalized, address_type) = self.normalizer.normalize_record(record)?;

        if address_type == AddressType::Ambiguous {
            let address = record.full_address_string();
            if self.config.reject_ambiguous {
                return Err(ImportError::UnparseableAddress {
                    address,
                    address_type,
                });
            }
            log::warn!("Ambiguous address {address:?}, importing tagged components as-is");
        }

        Ok((
            AddressModel::from_normalized(record, &normalized),
            address_type,
        ))
    }

    /// Writes a `(primary, place)` pair per record, in input order.
    ///
    /// Returns the number of nodes written. Progress is counted in nodes,
    /// so a full batch reaches `2 * records.len()`. Stops at the first
    /// failing record; nodes already handed to `writer` are not rolled
    /// back, so file-backed writers must discard their output on error (as
    /// [`OsmXmlWriter`] does when dropped unfinished).
    ///
    /// # Errors
    ///
    /// Returns the first [`ImportError`] raised by normalization or the
    /// writer.
    pub fn write_entries<W: EntryWriter + ?Sized>(
        &self,
        records: &[RawAddressRecord],
        ids: &mut EntryIdCounter,
        writer: &mut W,
        progress: &dyn ProgressCallback,
    ) -> Result<u64, ImportError> {
        progress.set_total(NODES_PER_RECORD * records.len() as u64);

        let mut written = 0_u64;
        for (index, record) in records.iter().enumerate() {
            let (model, address_type) = self.classify(record).inspect_err(|e| {
                log::warn!("Record {index} ({:?}) rejected: {e}", record.full_address_string());
            })?;

            let (base_id, _) = ids.next_pair();
            let (primary, place) = assemble(&model, base_id, &self.config.user, &timestamp_now());
            writer.add_node(&primary)?;
            writer.add_node(&place)?;
            written += NODES_PER_RECORD;

            log::debug!(
                "Record {index}: nodes {} / {} for {:?}",
                primary.id,
                place.id,
                model.street
            );
            progress.set_message(format!("#{index} {address_type}: {}", model.street));
            progress.inc(NODES_PER_RECORD);
        }

        progress.finish(format!("{written} nodes for {} records", records.len()));
        Ok(written)
    }

    /// Imports `records` into an OSM XML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError`] if any record fails or the file cannot be
    /// written. No output file is left behind on error.
    pub fn import_to_path(
        &self,
        records: &[RawAddressRecord],
        path: &Path,
        progress: &dyn ProgressCallback,
    ) -> Result<PathBuf, ImportError> {
        log::info!(
            "Importing {} records into {}",
            records.len(),
            path.display()
        );

        let mut writer = OsmXmlWriter::create(path)?;
        let mut ids = EntryIdCounter::from_clock();
        let written = self.write_entries(records, &mut ids, &mut writer, progress)?;
        let path = writer.finish()?;

        log::info!("Wrote {written} nodes to {}", path.display());
        Ok(path)
    }

    /// Imports a single record or a batch, writing to `filename` or to a
    /// fresh `<uuid>.<extension>` name.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError`] if any record fails, the file cannot be
    /// written, or the blocking task fails to complete.
    pub async fn create_new_entry(
        &self,
        input: EntryInput,
        filename: Option<String>,
    ) -> Result<ImportResponse, ImportError> {
        self.create_new_entry_with_progress(input, filename, null_progress())
            .await
    }

    /// [`Self::create_new_entry`] with progress reporting.
    ///
    /// # Errors
    ///
    /// See [`Self::create_new_entry`].
    pub async fn create_new_entry_with_progress(
        &self,
        input: EntryInput,
        filename: Option<String>,
        progress: Arc<dyn ProgressCallback>,
    ) -> Result<ImportResponse, ImportError> {
        let filename = filename.unwrap_or_else(|| self.config.default_filename());
        let records = input.into_records();
        let importer = self.clone();
        let path = PathBuf::from(&filename);

        tokio::task::spawn_blocking(move || {
            importer.import_to_path(&records, &path, progress.as_ref())
        })
        .await??;

        Ok(ImportResponse::ok(filename))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};

    use nominatim_import_address::{AddressTagger, NormalizationConfig, RuleTagger};
    use nominatim_import_address_models::TaggedAddress;

    use super::*;

    fn record(housenumber: &str, street: &str) -> RawAddressRecord {
        RawAddressRecord::new(
            housenumber,
            street,
            "12345",
            "Testville",
            "TX",
            30.27,
            -97.74,
        )
    }

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("nominatim_import_entry_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn writes_two_nodes_per_record_in_order() {
        let importer = EntryImporter::default();
        let mut ids = EntryIdCounter::new(1000);
        let mut writer = VecWriter::new();

        let written = importer
            .write_entries(
                &[record("123", "Test St"), record("9", "Elm Ave Apt 2")],
                &mut ids,
                &mut writer,
                &NullProgress,
            )
            .unwrap();
        assert_eq!(written, 4);

        let entries = writer.into_entries();
        let ids: Vec<i64> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1000, 1001, 1002, 1003]);

        assert_eq!(entries[0].tag("addr:street"), Some("Test Street"));
        assert_eq!(entries[0].tag("addr:housenumber"), Some("123"));
        assert_eq!(entries[0].tag("addr:postcode"), Some("12345"));
        assert_eq!(entries[0].tag("addr:city"), Some("Testville"));
        assert_eq!(entries[0].tag("addr:state"), Some("TX"));
        assert_eq!(entries[0].tag("addr:country"), Some("US"));
        assert_eq!(entries[0].tag("addr:unit"), None);
        assert_eq!(entries[1].tag("addr:place"), Some("Test Street"));
        assert_eq!(entries[1].tag("addr:street"), None);

        assert_eq!(entries[2].tag("addr:street"), Some("Elm Avenue"));
        assert_eq!(entries[2].tag("addr:unit"), Some("Apt 2"));
        assert_eq!(entries[3].tag("addr:place"), Some("Elm Avenue"));

        assert!(entries.iter().all(|e| e.user == "osm_imports" && e.version == 1));
    }

    #[test]
    fn first_failure_aborts_batch() {
        let importer = EntryImporter::default();
        let mut ids = EntryIdCounter::new(1);
        let mut writer = VecWriter::new();

        let mut bad = record("5", "Oak St");
        bad.state = "Atlantis".to_string();

        let err = importer
            .write_entries(
                &[record("1", "Main St"), bad, record("2", "Main St")],
                &mut ids,
                &mut writer,
                &NullProgress,
            )
            .unwrap_err();
        match err {
            ImportError::Normalize(NormalizeError::UnrecognizedState { state }) => {
                assert_eq!(state, "Atlantis");
            }
            other => panic!("unexpected error: {other}"),
        }
        // Only the first record's pair made it out.
        assert_eq!(writer.entries().len(), 2);
    }

    #[test]
    fn city_never_leaks_into_street() {
        let importer = EntryImporter::default();
        for (street, city) in [
            ("Broadway", "Park City"),
            ("Broadway", "Fort Worth"),
            ("Main", "Mountain View"),
        ] {
            let rec = RawAddressRecord::new("1", street, "84060", city, "UT", 40.64, -111.49);
            let model = importer.model_for(&rec).unwrap();
            assert_eq!(model.street, street);
            assert_eq!(model.city, city);
        }
    }

    /// Records every update so tests can check what the importer reported.
    #[derive(Default)]
    struct RecordingProgress {
        total: AtomicU64,
        position: AtomicU64,
        messages: Mutex<Vec<String>>,
    }

    impl ProgressCallback for RecordingProgress {
        fn set_total(&self, total: u64) {
            self.total.store(total, Ordering::SeqCst);
        }

        fn inc(&self, delta: u64) {
            self.position.fetch_add(delta, Ordering::SeqCst);
        }

        fn set_message(&self, msg: String) {
            self.messages.lock().unwrap().push(msg);
        }

        fn finish(&self, msg: String) {
            self.messages.lock().unwrap().push(msg);
        }
    }

    #[test]
    fn reports_progress_in_nodes() {
        let progress = RecordingProgress::default();
        let written = EntryImporter::default()
            .write_entries(
                &[record("123", "Test St"), record("4", "Oak Blvd")],
                &mut EntryIdCounter::new(1),
                &mut VecWriter::new(),
                &progress,
            )
            .unwrap();

        assert_eq!(written, 4);
        assert_eq!(progress.total.load(Ordering::SeqCst), 4);
        assert_eq!(progress.position.load(Ordering::SeqCst), 4);
        assert_eq!(
            *progress.messages.lock().unwrap(),
            vec![
                "#0 Street Address: Test Street".to_string(),
                "#1 Street Address: Oak Boulevard".to_string(),
                "4 nodes for 2 records".to_string(),
            ]
        );
    }

    /// Tags like [`RuleTagger`] but always reports an ambiguous result.
    struct UnsureTagger;

    impl AddressTagger for UnsureTagger {
        fn tag(&self, text: &str) -> TaggedAddress {
            TaggedAddress {
                address_type: AddressType::Ambiguous,
                ..RuleTagger.tag(text)
            }
        }
    }

    fn unsure_importer(reject_ambiguous: bool) -> EntryImporter {
        let config = ImportConfig {
            reject_ambiguous,
            ..ImportConfig::default()
        };
        let normalizer =
            AddressNormalizer::new(config.normalization).with_tagger(Arc::new(UnsureTagger));
        EntryImporter::new(config).with_normalizer(normalizer)
    }

    #[test]
    fn rejects_ambiguous_when_configured() {
        let err = unsure_importer(true)
            .model_for(&record("1", "Main St"))
            .unwrap_err();
        match err {
            ImportError::UnparseableAddress {
                address,
                address_type,
            } => {
                assert_eq!(address, "1 Main St, Testville, TX, US 12345");
                assert_eq!(address_type, AddressType::Ambiguous);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn imports_ambiguous_by_default() {
        let model = unsure_importer(false)
            .model_for(&record("1", "Main St"))
            .unwrap();
        assert_eq!(model.street, "Main Street");
    }

    #[test]
    fn uses_configured_user_and_threshold() {
        let config = ImportConfig {
            user: "county_import".to_string(),
            normalization: NormalizationConfig {
                expand_street_suffix: false,
                ..NormalizationConfig::default()
            },
            ..ImportConfig::default()
        };
        let importer = EntryImporter::new(config);
        let mut writer = VecWriter::new();
        importer
            .write_entries(
                &[record("1", "Main St")],
                &mut EntryIdCounter::new(7),
                &mut writer,
                &NullProgress,
            )
            .unwrap();
        let entries = writer.into_entries();
        assert_eq!(entries[0].user, "county_import");
        assert_eq!(entries[0].tag("addr:street"), Some("Main St"));
    }

    #[test]
    fn failed_import_leaves_no_file() {
        let dir = test_dir("failed");
        let path = dir.join("out.osm.xml");

        let mut bad = record("1", "Main St");
        bad.state = "ZZ".to_string();

        let result = EntryImporter::default().import_to_path(&[bad], &path, &NullProgress);
        assert!(matches!(
            result,
            Err(ImportError::Normalize(NormalizeError::UnrecognizedState { .. }))
        ));
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn create_new_entry_writes_file_and_reports_filename() {
        let dir = test_dir("create");
        let filename = dir.join("batch.osm.xml").display().to_string();

        let input = EntryInput::from(vec![record("123", "Test St"), record("4", "Oak Blvd")]);
        let response = EntryImporter::default()
            .create_new_entry(input, Some(filename.clone()))
            .await
            .unwrap();

        assert_eq!(response, ImportResponse::ok(filename.clone()));
        let xml = std::fs::read_to_string(&filename).unwrap();
        assert_eq!(xml.matches("<node ").count(), 4);
        assert!(xml.contains(r#"<tag k="addr:street" v="Test Street"/>"#));
        assert!(xml.contains(r#"<tag k="addr:place" v="Oak Boulevard"/>"#));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn create_new_entry_accepts_single_record() {
        let dir = test_dir("single");
        let filename = dir.join("one.osm.xml").display().to_string();

        let response = EntryImporter::default()
            .create_new_entry(record("123", "Test St").into(), Some(filename.clone()))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        let xml = std::fs::read_to_string(&filename).unwrap();
        assert_eq!(xml.matches("<node ").count(), 2);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn create_new_entry_fails_whole_batch() {
        let dir = test_dir("create_failed");
        let filename = dir.join("bad.osm.xml").display().to_string();

        let mut bad = record("1", "Main St");
        bad.state = "Atlantis".to_string();

        let result = EntryImporter::default()
            .create_new_entry(vec![record("2", "Main St"), bad].into(), Some(filename.clone()))
            .await;
        assert!(result.is_err());
        assert!(!Path::new(&filename).exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
