use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::builders::validator::{RulesValidator, StandardValidator};

/// Version tag written into every rule tables file.
pub const RULES_VERSION: &str = "1.0";

/// Default file name used by `init-rules` when no output path is given.
pub const DEFAULT_RULES_FILE: &str = "toolkit-rules.toml";

/// The built-in rule tables, built once and shared for the whole process.
pub static DEFAULT_RULES: Lazy<RuleTables> = Lazy::new(RuleTables::default);

/// Static data that steers how tool folders are resolved.
///
/// Every name in these tables is compared case-insensitively, so the file on
/// disk may use whatever casing reads best. The tables are never mutated once
/// loaded.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RuleTables {
    pub version: String,
    /// Tools that belong to the installer's "compact" install type.
    #[serde(default)]
    pub compact_tools: Vec<String>,
    /// Archive file names that must never be unpacked automatically.
    #[serde(default)]
    pub disable_unpack: Vec<String>,
    /// Tool name -> executables to expose when a folder ships several.
    #[serde(default)]
    pub overrides: BTreeMap<String, Vec<String>>,
}

/// Tools that ship several executables, with the ones to expose.
const DEFAULT_OVERRIDES: &[(&str, &[&str])] = &[
    // pin the main executable
    ("[dotnet] dnspyex", &["dnspy.exe"]),
    ("ollydbg 1.10", &["ollydbg.exe"]),
    ("winhex", &["winhex.exe"]),
    ("astrogrep", &["astrogrep.exe"]),
    ("rl!depacker", &["rl!depacker.exe"]),
    // expose both 32 and 64 bit launchers
    ("hxd", &["hxd32.exe", "hxd64.exe"]),
    ("api monitor", &["apimonitor-x86.exe", "apimonitor-x64.exe"]),
    ("autoruns", &["autoruns.exe", "autoruns64.exe"]),
    ("process explorer", &["procexp.exe", "procexp64.exe"]),
    ("process hacker 2", &["processhacker.exe"]),
    ("process hacker 3", &["processhacker.exe"]),
    ("procmon", &["procmon.exe", "procmon64.exe"]),
    ("regshot", &["regshot-x86-ansi.exe", "regshot-x64-ansi.exe"]),
    ("sysanalyzer", &["sysanalyzer.exe", "hxd64.exe"]),
    ("tcpview", &["tcpview.exe", "tcpview64.exe"]),
    ("process-dump", &["pd32.exe", "pd64.exe"]),
    ("scylla", &["scylla_x86.exe", "scylla_x64.exe"]),
    ("strings", &["strings.exe", "strings64.exe"]),
    ("de4dot", &["de4dot.exe", "de4dot-x64.exe"]),
    ("netunpack", &["netunpack.exe", "netunpack-64.exe"]),
];

const DEFAULT_COMPACT_TOOLS: &[&str] = &[
    // analysis
    "die",
    "exeinfope",
    "pestudio",
    // decompilers
    "[android] jadx",
    "[java] recaf",
    "[dotnet] ilspy",
    // dissasembler
    "x64dbg",
    // hex editor
    "hxd",
    "imhex",
    // monitor
    "process hacker 3",
    "procmon",
    "tcpview",
    // other
    "hashcalc",
    "resource hacker",
    "virustotaluploader",
    // rootkits detector
    "gmer",
    "sysinspector",
    // unpacking
    "qunpack",
    "rl!depacker",
    "uniextract",
    "xvolkolak",
];

const DEFAULT_DISABLE_UNPACK: &[&str] = &[
    // decompilers
    "graywolf - 1.83.7z",
    // dissasembler
    "[++] w32dasm - 8.93.7z",
    "[10] w32dasm - 8.93.7z",
    "[original] w32dasm - 8.93.7z",
    // unpacking
    "qunpack - 2.2.7z",
    "qunpack - 3.4.7z",
    "qunpack - src.7z",
];

impl Default for RuleTables {
    fn default() -> Self {
        let overrides = DEFAULT_OVERRIDES
            .iter()
            .map(|(tool, exes)| {
                (
                    tool.to_string(),
                    exes.iter().map(|exe| exe.to_string()).collect(),
                )
            })
            .collect();

        Self {
            version: RULES_VERSION.to_string(),
            compact_tools: DEFAULT_COMPACT_TOOLS.iter().map(|t| t.to_string()).collect(),
            disable_unpack: DEFAULT_DISABLE_UNPACK.iter().map(|a| a.to_string()).collect(),
            overrides,
        }
    }
}

impl RuleTables {
    /// Whether the tool is part of the compact install type.
    pub fn is_compact(&self, tool_name: &str) -> bool {
        contains_ignore_case(&self.compact_tools, tool_name)
    }

    /// Whether an archive (by file name) must be left packed.
    pub fn is_unpack_disabled(&self, archive_name: &str) -> bool {
        contains_ignore_case(&self.disable_unpack, archive_name)
    }

    /// The executables pinned for a tool, if it has an override entry.
    ///
    /// # Arguments
    /// * `tool_name`: The tool folder name, matched case-insensitively.
    ///
    /// # Returns
    /// `Some` slice of executable file names to expose, or `None` when the
    /// tool has no entry and the first executable should be taken instead.
    pub fn override_for(&self, tool_name: &str) -> Option<&[String]> {
        let wanted = tool_name.to_lowercase();
        self.overrides
            .iter()
            .find(|(tool, _)| tool.to_lowercase() == wanted)
            .map(|(_, exes)| exes.as_slice())
    }

    /// Installer "Types" value for a tool component.
    pub fn install_types(&self, tool_name: &str) -> &'static str {
        if self.is_compact(tool_name) {
            "full compact"
        } else {
            "full"
        }
    }
}

fn contains_ignore_case(list: &[String], value: &str) -> bool {
    let wanted = value.to_lowercase();
    list.iter().any(|entry| entry.to_lowercase() == wanted)
}

/// The `RulesProvider` trait defines where rule tables come from and where
/// they are written back.
pub trait RulesProvider {
    /// Loads the rule tables this provider serves.
    ///
    /// # Returns
    /// A `Result<RuleTables>`; reading or parsing failures carry the offending
    /// path in their context.
    fn load_rules(&self) -> Result<RuleTables>;

    /// Serializes `rules` as TOML.
    ///
    /// # Arguments
    /// * `rules`: The tables to write.
    /// * `path`: Destination file, replaced if it already exists.
    fn save_rules(&self, rules: &RuleTables, path: &Path) -> Result<()>;

    /// The file backing this provider, if any.
    fn get_rules_path(&self) -> Option<&Path>;
}

/// Loads, writes and exports rule tables files.
///
/// Without an explicit path the manager serves [`DEFAULT_RULES`].
pub struct RulesManager {
    rules_path: Option<PathBuf>,
}

impl RulesManager {
    pub fn new(rules_path: Option<PathBuf>) -> Self {
        Self { rules_path }
    }

    /// Writes the built-in tables to `path` unless a file already exists there.
    ///
    /// Returns `true` when a new file was written.
    pub fn initialize(&self, path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }

        self.save_rules(&DEFAULT_RULES, path)?;
        Ok(true)
    }

    /// Loads the rules and returns the validation issues found in them.
    pub fn validate_rules(&self) -> Result<Vec<String>> {
        let rules = self.load_rules()?;
        let validator = StandardValidator::new();
        validator.validate_rules(&rules)
    }

    /// Writes the loaded rules in another serialization format.
    ///
    /// # Arguments
    /// * `file_path`: Destination of the exported tables.
    /// * `format`: One of `"toml"`, `"json"` or `"yaml"`.
    ///
    /// # Returns
    /// An error for any other format, or when loading or writing fails.
    pub fn export_rules(&self, file_path: &Path, format: &str) -> Result<()> {
        let rules = self.load_rules()?;

        let content = match format {
            "json" => {
                serde_json::to_string_pretty(&rules).context("Failed to serialize to JSON")?
            }
            "yaml" => serde_yaml::to_string(&rules).context("Failed to serialize to YAML")?,
            "toml" => toml::to_string_pretty(&rules).context("Failed to serialize to TOML")?,
            other => anyhow::bail!("Unsupported export format: {other}"),
        };

        fs::write(file_path, content).context("Failed to write export file")?;

        Ok(())
    }
}

impl RulesProvider for RulesManager {
    fn load_rules(&self) -> Result<RuleTables> {
        let Some(path) = &self.rules_path else {
            return Ok(DEFAULT_RULES.clone());
        };

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read rules file {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse rules file {}", path.display()))
    }

    fn save_rules(&self, rules: &RuleTables, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(rules).context("Failed to serialize rules")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write rules file {}", path.display()))?;

        Ok(())
    }

    fn get_rules_path(&self) -> Option<&Path> {
        self.rules_path.as_deref()
    }
}
