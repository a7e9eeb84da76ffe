use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};

use crate::builders::classifier::{BinaryInspector, PeHeaderInspector};
use crate::builders::reporter::{ConsoleReporter, Diagnostic, ProgressReporter};
use crate::builders::resolver::{ToolContext, ToolResolver};
use crate::builders::unpacker::{ArchiveExtractor, SevenZipExtractor};
use crate::builders::writer::FragmentWriter;
use crate::core::category::Category;
use crate::core::config::RuleTables;
use crate::utils::listing::{file_name, subdirectories};

/// Blank lines appended after every tool of a section.
const TOOL_SEPARATOR_LINES: usize = 2;

/// Summary of one generated section file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionReport {
    pub category: String,
    pub section_id: String,
    pub tool_count: usize,
    pub target_count: usize,
    pub path: PathBuf,
}

/// Walks a toolkit tree and writes one installer section per category.
pub struct SectionEngine {
    rules: RuleTables,
    extractor: Box<dyn ArchiveExtractor>,
    inspector: Box<dyn BinaryInspector>,
    reporter: Box<dyn ProgressReporter>,
    writer: Box<dyn FragmentWriter>,
}

impl SectionEngine {
    /// Engine with the production collaborators: 7z extraction, PE header
    /// inspection and colored console output.
    pub fn new(rules: RuleTables, writer: Box<dyn FragmentWriter>) -> Self {
        Self {
            rules,
            extractor: Box::new(SevenZipExtractor::new()),
            inspector: Box::new(PeHeaderInspector::new()),
            reporter: Box::new(ConsoleReporter::new()),
            writer,
        }
    }

    pub fn with_extractor(mut self, extractor: Box<dyn ArchiveExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_inspector(mut self, inspector: Box<dyn BinaryInspector>) -> Self {
        self.inspector = inspector;
        self
    }

    pub fn with_reporter(mut self, reporter: Box<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Generates every section found under `root`.
    ///
    /// A root that is not a directory is reported and yields no sections. An
    /// extraction failure stops the run: the tree may be half unpacked and
    /// must not be classified further.
    pub fn run(&self, root: &Path) -> Result<Vec<SectionReport>> {
        if !root.is_dir() {
            self.reporter.report(Diagnostic::InvalidRoot {
                path: root.to_path_buf(),
            });
            return Ok(Vec::new());
        }

        let mut reports = Vec::new();
        for dir in subdirectories(root)? {
            let Some(category) = Category::from_dir(&dir) else {
                debug!("ignoring {}", dir.display());
                continue;
            };
            reports.push(self.generate_section(root, &category)?);
        }

        Ok(reports)
    }

    /// Builds and writes the section of one category.
    pub fn generate_section(&self, root: &Path, category: &Category) -> Result<SectionReport> {
        let resolver = ToolResolver::new(
            self.extractor.as_ref(),
            self.inspector.as_ref(),
            self.reporter.as_ref(),
        );

        let mut lines = Vec::new();
        let mut tool_count = 0;
        let mut target_count = 0;

        for tool_dir in subdirectories(&category.path)? {
            let tool_name = file_name(&tool_dir);
            self.reporter.report(Diagnostic::Processing {
                tool: tool_name.clone(),
            });

            let ctx = ToolContext {
                root,
                category,
                tool_name: &tool_name,
                rules: &self.rules,
            };
            let fragment = resolver.resolve(&ctx, &tool_dir)?;

            tool_count += 1;
            target_count += fragment.targets.len();
            lines.extend(fragment.lines);
            lines.extend(std::iter::repeat_n(String::new(), TOOL_SEPARATOR_LINES));
        }

        let section_id = category.output_id();
        let path = self.writer.write_section(&section_id, &lines)?;
        self.reporter.report(Diagnostic::SectionWritten {
            category: category.display_name.clone(),
            path: path.clone(),
        });

        Ok(SectionReport {
            category: category.display_name.clone(),
            section_id,
            tool_count,
            target_count,
            path,
        })
    }
}
