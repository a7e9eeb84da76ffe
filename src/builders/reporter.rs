use colored::Colorize;
use std::cell::RefCell;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

/// How loudly a diagnostic is surfaced to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Success,
    Error,
}

/// Progress events raised while a toolkit tree is walked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A top-level tool folder is about to be resolved.
    Processing { tool: String },
    /// A folder without launchers is descended into.
    EnteringSubFolder { path: PathBuf },
    ArchiveExtracted { archive: PathBuf, destination: PathBuf },
    ArchiveSkipped { archive: PathBuf },
    /// Several executables and no override entry; the first one was taken.
    AmbiguousExecutables { tool: String, chosen: String, count: usize },
    /// The override entry matched none of the executables present.
    NoOverrideMatch { tool: String, folder: PathBuf },
    /// Several packaged applications; the first one was taken.
    AmbiguousPackages { tool: String, chosen: String, count: usize },
    LaunchTargetAdded { file: String },
    SectionWritten { category: String, path: PathBuf },
    InvalidRoot { path: PathBuf },
}

impl Diagnostic {
    /// The severity bucket this diagnostic belongs to.
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::Processing { .. }
            | Diagnostic::ArchiveExtracted { .. }
            | Diagnostic::ArchiveSkipped { .. } => Severity::Info,
            Diagnostic::EnteringSubFolder { .. }
            | Diagnostic::AmbiguousExecutables { .. }
            | Diagnostic::NoOverrideMatch { .. }
            | Diagnostic::AmbiguousPackages { .. } => Severity::Warning,
            Diagnostic::LaunchTargetAdded { .. } | Diagnostic::SectionWritten { .. } => {
                Severity::Success
            }
            Diagnostic::InvalidRoot { .. } => Severity::Error,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Processing { tool } => write!(f, "[+] Process: {tool}"),
            Diagnostic::EnteringSubFolder { path } => {
                write!(f, "   [!] Iterate sub folder: \"{}\"", path.display())
            }
            Diagnostic::ArchiveExtracted {
                archive,
                destination,
            } => write!(
                f,
                "   [*] Unpacked: \"{}\" -> \"{}\"",
                archive.display(),
                destination.display()
            ),
            Diagnostic::ArchiveSkipped { archive } => {
                write!(f, "   [-] Keeping packed: \"{}\"", archive.display())
            }
            Diagnostic::AmbiguousExecutables { tool, chosen, count } => write!(
                f,
                "   [!!!] Find multiple exes ({count}) in {tool}. Grabbing the first: \"{chosen}\""
            ),
            Diagnostic::NoOverrideMatch { tool, folder } => write!(
                f,
                "   [!!!] None of the executables listed for {tool} exist in \"{}\"",
                folder.display()
            ),
            Diagnostic::AmbiguousPackages { tool, chosen, count } => write!(
                f,
                "   [!!!] Find multiple jars ({count}) in {tool}. Grabbing the first: \"{chosen}\""
            ),
            Diagnostic::LaunchTargetAdded { file } => write!(f, "   [*] Adding: \"{file}\""),
            Diagnostic::SectionWritten { category, path } => {
                write!(f, "[=] {category}: \"{}\"", path.display())
            }
            Diagnostic::InvalidRoot { path } => write!(
                f,
                "toolkit folder is not a valid folder: {}",
                path.display()
            ),
        }
    }
}

/// Receives the diagnostics raised during a run.
pub trait ProgressReporter {
    /// Handles one diagnostic as soon as it is raised.
    ///
    /// # Arguments
    /// * `diagnostic`: The event to surface. Its [`Diagnostic::severity`]
    ///   tells the implementation how loudly to do so.
    fn report(&self, diagnostic: Diagnostic);
}

/// Prints diagnostics to the console, colored by severity.
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }

    /// Renders a diagnostic as a single colored console line.
    ///
    /// # Arguments
    /// * `diagnostic`: The event to render.
    ///
    /// # Returns
    /// A `String` holding the `Display` text of the diagnostic, painted
    /// yellow for info, magenta for warnings, green for successes and bold
    /// red for errors.
    fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let text = diagnostic.to_string();
        match diagnostic.severity() {
            Severity::Info => text.yellow().to_string(),
            Severity::Warning => text.magenta().to_string(),
            Severity::Success => text.green().to_string(),
            Severity::Error => text.red().bold().to_string(),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for ConsoleReporter {
    fn report(&self, diagnostic: Diagnostic) {
        if diagnostic.severity() == Severity::Error {
            eprintln!("{}", self.format_diagnostic(&diagnostic));
        } else {
            println!("{}", self.format_diagnostic(&diagnostic));
        }
    }
}

/// Keeps every diagnostic in memory. Clones share the same log, so a test
/// can hand one clone to the engine and inspect another afterwards.
#[derive(Clone, Default)]
pub struct MemoryReporter {
    events: Rc<RefCell<Vec<Diagnostic>>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Diagnostic> {
        self.events.borrow().clone()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|d| d.severity() == severity)
            .count()
    }
}

impl ProgressReporter for MemoryReporter {
    fn report(&self, diagnostic: Diagnostic) {
        self.events.borrow_mut().push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_mapping() {
        let ambiguous = Diagnostic::AmbiguousExecutables {
            tool: "x".into(),
            chosen: "a.exe".into(),
            count: 2,
        };
        assert_eq!(ambiguous.severity(), Severity::Warning);
        assert_eq!(
            Diagnostic::LaunchTargetAdded { file: "a.exe".into() }.severity(),
            Severity::Success
        );
        assert_eq!(
            Diagnostic::Processing { tool: "x".into() }.severity(),
            Severity::Info
        );
    }

    #[test]
    fn test_display_keeps_console_markers() {
        assert_eq!(
            Diagnostic::Processing { tool: "DIE".into() }.to_string(),
            "[+] Process: DIE"
        );
        assert_eq!(
            Diagnostic::LaunchTargetAdded { file: "die.exe".into() }.to_string(),
            "   [*] Adding: \"die.exe\""
        );
    }

    #[test]
    fn test_memory_reporter_clones_share_events() {
        let reporter = MemoryReporter::new();
        let handle = reporter.clone();
        reporter.report(Diagnostic::Processing { tool: "a".into() });
        reporter.report(Diagnostic::LaunchTargetAdded { file: "a.exe".into() });

        assert_eq!(handle.events().len(), 2);
        assert_eq!(handle.count(Severity::Success), 1);
    }
}
