use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};

use crate::builders::classifier::{BinaryInspector, LaunchLabel, classify};
use crate::builders::fragments::{self, IconEntry};
use crate::builders::reporter::{Diagnostic, ProgressReporter};
use crate::builders::sanitizer::component_path;
use crate::builders::unpacker::{ArchiveExtractor, ArchiveUnpacker, UnpackOutcome};
use crate::core::category::Category;
use crate::core::config::RuleTables;
use crate::utils::listing::{file_name, files_with_extension, relative_script_path, subdirectories};

pub const EXECUTABLE_EXTENSION: &str = "exe";
pub const PACKAGE_EXTENSION: &str = "jar";

/// Everything a tool resolution needs to know about where it is in the tree.
///
/// Built by the walker for each top-level tool and passed unchanged to nested
/// sub-units, so labels and override lookups always use the top-level name.
#[derive(Debug, Clone, Copy)]
pub struct ToolContext<'a> {
    pub root: &'a Path,
    pub category: &'a Category,
    pub tool_name: &'a str,
    pub rules: &'a RuleTables,
}

impl ToolContext<'_> {
    /// `<category>\<tool>` component identifier.
    pub fn component(&self) -> String {
        component_path(&self.category.display_name, self.tool_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    NativeExecutable,
    PackagedApplication,
}

/// One launcher exposed in the installer for a tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchTarget {
    pub path: PathBuf,
    pub working_dir: PathBuf,
    pub label: String,
    pub precondition: String,
    pub kind: TargetKind,
}

/// Lines and launch targets produced for one top-level tool, sub-units
/// included.
#[derive(Debug, Default, Clone)]
pub struct ToolFragment {
    pub lines: Vec<String>,
    pub targets: Vec<LaunchTarget>,
}

/// Decides which files of a tool folder become launchers and renders the
/// component, file and icon entries for it.
pub struct ToolResolver<'a> {
    extractor: &'a dyn ArchiveExtractor,
    inspector: &'a dyn BinaryInspector,
    reporter: &'a dyn ProgressReporter,
}

impl<'a> ToolResolver<'a> {
    pub fn new(
        extractor: &'a dyn ArchiveExtractor,
        inspector: &'a dyn BinaryInspector,
        reporter: &'a dyn ProgressReporter,
    ) -> Self {
        Self {
            extractor,
            inspector,
            reporter,
        }
    }

    /// Resolves a top-level tool folder.
    pub fn resolve(&self, ctx: &ToolContext<'_>, folder: &Path) -> Result<ToolFragment> {
        let mut fragment = ToolFragment::default();
        self.resolve_folder(ctx, folder, false, &mut fragment)?;
        Ok(fragment)
    }

    fn resolve_folder(
        &self,
        ctx: &ToolContext<'_>,
        folder: &Path,
        is_nested: bool,
        fragment: &mut ToolFragment,
    ) -> Result<()> {
        // Archives must be gone before the folder is classified.
        self.unpack(ctx, folder)?;

        if !is_nested {
            let component = ctx.component();
            fragment.lines.extend(fragments::component_block(
                ctx.tool_name,
                &component,
                ctx.rules.install_types(ctx.tool_name),
            ));
            fragment.lines.extend(fragments::files_block(
                &relative_script_path(ctx.root, folder),
                &ctx.category.display_name,
                ctx.tool_name,
                &component,
            ));
        }

        let executables = files_with_extension(folder, EXECUTABLE_EXTENSION)?;
        for exe in self.select_executables(ctx, folder, &executables) {
            let label = classify(ctx.tool_name, exe, self.inspector);
            self.add_target(ctx, exe, label, TargetKind::NativeExecutable, fragment);
        }

        let mut package_count = 0;
        if executables.is_empty() {
            let packages = files_with_extension(folder, PACKAGE_EXTENSION)?;
            package_count = packages.len();
            if let Some(first) = packages.first() {
                if packages.len() > 1 {
                    self.reporter.report(Diagnostic::AmbiguousPackages {
                        tool: ctx.tool_name.to_string(),
                        chosen: file_name(first),
                        count: packages.len(),
                    });
                }
                let label = LaunchLabel::plain(ctx.tool_name);
                self.add_target(ctx, first, label, TargetKind::PackagedApplication, fragment);
            }
        }

        if executables.is_empty() && package_count == 0 {
            for sub_folder in subdirectories(folder)? {
                self.reporter.report(Diagnostic::EnteringSubFolder {
                    path: sub_folder.clone(),
                });
                self.resolve_folder(ctx, &sub_folder, true, fragment)?;
            }
        }

        Ok(())
    }

    fn unpack(&self, ctx: &ToolContext<'_>, folder: &Path) -> Result<()> {
        let unpacker = ArchiveUnpacker::new(self.extractor, ctx.rules);
        for outcome in unpacker.unpack_folder(folder)? {
            let diagnostic = match outcome {
                UnpackOutcome::Extracted {
                    archive,
                    destination,
                } => Diagnostic::ArchiveExtracted {
                    archive,
                    destination,
                },
                UnpackOutcome::Skipped { archive } => Diagnostic::ArchiveSkipped { archive },
            };
            self.reporter.report(diagnostic);
        }
        Ok(())
    }

    /// Picks the launchers among the executables of one folder.
    ///
    /// A single executable is always taken. With several, the override entry
    /// of the tool decides; without one only the first (by name) is taken.
    fn select_executables<'e>(
        &self,
        ctx: &ToolContext<'_>,
        folder: &Path,
        executables: &'e [PathBuf],
    ) -> Vec<&'e PathBuf> {
        if executables.len() <= 1 {
            return executables.iter().collect();
        }

        match ctx.rules.override_for(ctx.tool_name) {
            Some(pinned) => {
                let selected: Vec<&PathBuf> = executables
                    .iter()
                    .filter(|exe| {
                        let name = file_name(exe).to_lowercase();
                        pinned.iter().any(|p| p.to_lowercase() == name)
                    })
                    .collect();
                if selected.is_empty() {
                    self.reporter.report(Diagnostic::NoOverrideMatch {
                        tool: ctx.tool_name.to_string(),
                        folder: folder.to_path_buf(),
                    });
                }
                selected
            }
            None => {
                let first = &executables[0];
                self.reporter.report(Diagnostic::AmbiguousExecutables {
                    tool: ctx.tool_name.to_string(),
                    chosen: file_name(first),
                    count: executables.len(),
                });
                vec![first]
            }
        }
    }

    fn add_target(
        &self,
        ctx: &ToolContext<'_>,
        path: &Path,
        label: LaunchLabel,
        kind: TargetKind,
        fragment: &mut ToolFragment,
    ) {
        self.reporter.report(Diagnostic::LaunchTargetAdded {
            file: file_name(path),
        });

        let working_dir = path.parent().unwrap_or(ctx.root).to_path_buf();
        let component = ctx.component();
        let filename = relative_script_path(ctx.root, path);
        let working_dir_rel = relative_script_path(ctx.root, &working_dir);
        debug!("{} -> {} ({:?})", ctx.tool_name, filename, kind);

        fragment.lines.extend(fragments::icons_block(&IconEntry {
            category: &ctx.category.display_name,
            label: &label.label,
            filename: &filename,
            working_dir: &working_dir_rel,
            component: &component,
            precondition: &label.precondition,
        }));
        fragment.targets.push(LaunchTarget {
            path: path.to_path_buf(),
            working_dir,
            label: label.label,
            precondition: label.precondition,
            kind,
        });
    }
}
