use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::RuleTables;
use crate::utils::listing::{file_name, files_with_extension};

/// Extension of the bundled archives unpacked inside tool folders.
pub const ARCHIVE_EXTENSION: &str = "7z";

/// Extracts every entry of an archive into a directory.
pub trait ArchiveExtractor {
    fn extract(&self, archive_path: &Path, dest_dir: &Path) -> Result<()>;
}

/// Production extractor backed by `sevenz-rust`.
pub struct SevenZipExtractor;

impl SevenZipExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SevenZipExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveExtractor for SevenZipExtractor {
    fn extract(&self, archive_path: &Path, dest_dir: &Path) -> Result<()> {
        sevenz_rust::decompress_file(archive_path, dest_dir)
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| {
                format!(
                    "Failed to extract {} into {}",
                    archive_path.display(),
                    dest_dir.display()
                )
            })
    }
}

/// What happened to one archive found in a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnpackOutcome {
    Extracted { archive: PathBuf, destination: PathBuf },
    Skipped { archive: PathBuf },
}

/// Unpacks the archives sitting directly inside a folder.
pub struct ArchiveUnpacker<'a> {
    extractor: &'a dyn ArchiveExtractor,
    rules: &'a RuleTables,
}

impl<'a> ArchiveUnpacker<'a> {
    pub fn new(extractor: &'a dyn ArchiveExtractor, rules: &'a RuleTables) -> Self {
        Self { extractor, rules }
    }

    /// Extracts and removes every non-denylisted archive in `folder`.
    ///
    /// Archives are processed in name order. A lone archive is extracted in
    /// place; when the folder holds anything else it goes into a sub-folder
    /// named after the archive stem. The archive is deleted only after a
    /// successful extraction and any failure aborts the whole call.
    pub fn unpack_folder(&self, folder: &Path) -> Result<Vec<UnpackOutcome>> {
        let archives = files_with_extension(folder, ARCHIVE_EXTENSION)?;
        let mut outcomes = Vec::with_capacity(archives.len());

        for archive in archives {
            if self.rules.is_unpack_disabled(&file_name(&archive)) {
                debug!("leaving {} packed", archive.display());
                outcomes.push(UnpackOutcome::Skipped { archive });
                continue;
            }

            let destination = self.destination_for(folder, &archive)?;
            debug!(
                "extracting {} into {}",
                archive.display(),
                destination.display()
            );
            self.extractor.extract(&archive, &destination)?;

            fs::remove_file(&archive)
                .with_context(|| format!("Failed to remove {}", archive.display()))?;
            outcomes.push(UnpackOutcome::Extracted {
                archive,
                destination,
            });
        }

        Ok(outcomes)
    }

    fn destination_for(&self, folder: &Path, archive: &Path) -> Result<PathBuf> {
        let entry_count = fs::read_dir(folder)
            .with_context(|| format!("Failed to list {}", folder.display()))?
            .count();
        if entry_count <= 1 {
            return Ok(folder.to_path_buf());
        }

        let stem = archive
            .file_stem()
            .with_context(|| format!("Archive without a name: {}", archive.display()))?;
        let destination = folder.join(stem);
        fs::create_dir_all(&destination)
            .with_context(|| format!("Failed to create {}", destination.display()))?;
        Ok(destination)
    }
}
