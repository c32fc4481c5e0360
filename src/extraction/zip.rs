use crate::error::Result;
use crate::types::ExtractedFile;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{language_code_from_entry, output_file_name};

/// Writes the entries of a Lokalise ZIP bundle as prefixed `.properties` files
#[derive(Clone, Debug)]
pub struct BundleExtractor {
    output_dir: PathBuf,
    file_prefix: String,
}

impl BundleExtractor {
    /// Create an extractor writing into `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>, file_prefix: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            file_prefix: file_prefix.into(),
        }
    }

    /// Directory receiving the extracted files
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Read the archive in `reader` and write each file entry to disk.
    ///
    /// Entries are taken from the central directory in archive order, so sizes
    /// recorded in trailing data descriptors are honored and an archive with no
    /// entries writes nothing. Directory entries are skipped and nested paths
    /// are flattened to their file name. Existing files are truncated; a later
    /// entry mapping to the same name overwrites an earlier one.
    pub fn extract<R: Read + Seek>(&self, reader: R) -> Result<Vec<ExtractedFile>> {
        std::fs::create_dir_all(&self.output_dir)?;

        let mut archive = zip::ZipArchive::new(reader)?;
        let mut extracted = Vec::new();

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                debug!(name = entry.name(), "skipping directory entry");
                continue;
            }

            let language = language_code_from_entry(entry.name())?;
            let path = self
                .output_dir
                .join(output_file_name(&self.file_prefix, &language));

            let mut outfile = std::fs::File::create(&path)?;
            std::io::copy(&mut entry, &mut outfile)?;
            drop(outfile);

            let path = std::path::absolute(&path).unwrap_or(path);
            info!("Saved: {}", path.display());
            extracted.push(ExtractedFile { language, path });
        }

        debug!(
            output_dir = ?self.output_dir,
            extracted_count = extracted.len(),
            "bundle extraction finished"
        );
        Ok(extracted)
    }
}
