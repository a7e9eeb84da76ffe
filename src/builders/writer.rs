use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Extension of the generated section files.
pub const DEFAULT_EXTENSION: &str = "iss";

/// Default directory receiving the generated section files.
pub const DEFAULT_OUTPUT_DIR: &str = "sections";

/// Persists the lines accumulated for one category.
pub trait FragmentWriter {
    /// Writes `lines` under `section_id` and returns where they went.
    fn write_section(&self, section_id: &str, lines: &[String]) -> Result<PathBuf>;
}

/// Writes one `<section_id>.<extension>` file per category into a directory,
/// replacing whatever a previous run left there.
pub struct DirectoryWriter {
    output_dir: PathBuf,
    extension: String,
}

impl DirectoryWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn section_path(&self, section_id: &str) -> PathBuf {
        self.output_dir
            .join(format!("{section_id}.{}", self.extension))
    }
}

impl FragmentWriter for DirectoryWriter {
    fn write_section(&self, section_id: &str, lines: &[String]) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create output directory {}",
                self.output_dir.display()
            )
        })?;

        let path = self.section_path(section_id);
        fs::write(&path, lines.join("\n"))
            .with_context(|| format!("Failed to write section {}", path.display()))?;
        Ok(path)
    }
}
