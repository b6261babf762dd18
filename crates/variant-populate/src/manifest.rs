//! CSV manifest of accepted variants.

use crate::error::PopulateError;
use csv::Writer;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use variant_generator::{ValueSet, CANONICAL_FIELDS};

/// Default buffer size for manifest writing.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Manifest header, in column order.
pub const MANIFEST_COLUMNS: [&str; 7] = [
    "variant_id",
    "xml_filename",
    "name",
    "address",
    "date",
    "time",
    "xml_content",
];

/// One accepted variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRecord {
    /// Sequential id, starting at 1, gapless over accepted variants
    pub id: u64,
    pub filename: String,
    pub values: ValueSet,
    pub xml: String,
}

impl VariantRecord {
    /// Manifest row: id, filename, the canonical fields (`""` when absent) and the XML.
    pub fn to_csv_record(&self) -> Vec<String> {
        let mut record = Vec::with_capacity(MANIFEST_COLUMNS.len());
        record.push(self.id.to_string());
        record.push(self.filename.clone());
        record.extend(self.values.project(CANONICAL_FIELDS));
        record.push(self.xml.clone());
        record
    }
}

/// Append-only manifest writer.
///
/// The file is flushed by [`ManifestWriter::finish`], or on drop if the run
/// ends early.
pub struct ManifestWriter {
    path: PathBuf,
    writer: Option<Writer<BufWriter<File>>>,
    rows_written: u64,
}

impl ManifestWriter {
    /// Create (or truncate) the manifest file, creating its parent directory.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, PopulateError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(&path).map_err(|source| PopulateError::Write {
            path: path.clone(),
            source,
        })?;
        let buf_writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);
        Ok(Self {
            path,
            writer: Some(Writer::from_writer(buf_writer)),
            rows_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub fn write_header(&mut self) -> Result<(), PopulateError> {
        self.writer_mut()?.write_record(MANIFEST_COLUMNS)?;
        Ok(())
    }

    pub fn write_row(&mut self, record: &VariantRecord) -> Result<(), PopulateError> {
        self.writer_mut()?.write_record(record.to_csv_record())?;
        self.rows_written += 1;
        Ok(())
    }

    /// Flush and close the manifest, returning the number of rows written.
    pub fn finish(mut self) -> Result<u64, PopulateError> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        debug!(
            "Manifest '{}' closed with {} rows",
            self.path.display(),
            self.rows_written
        );
        Ok(self.rows_written)
    }

    fn writer_mut(&mut self) -> Result<&mut Writer<BufWriter<File>>, PopulateError> {
        self.writer.as_mut().ok_or_else(|| {
            PopulateError::Io(std::io::Error::other("manifest writer already closed"))
        })
    }
}

impl Drop for ManifestWriter {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            if let Err(e) = writer.flush() {
                warn!("Failed to flush manifest '{}': {}", self.path.display(), e);
            }
        }
    }
}
