use anyhow::Result;
use std::collections::HashSet;

use crate::builders::resolver::EXECUTABLE_EXTENSION;
use crate::builders::unpacker::ARCHIVE_EXTENSION;
use crate::core::config::{RULES_VERSION, RuleTables};

/// The `RulesValidator` trait defines the public interface for checking a
/// rule tables file before it is used for a run.
pub trait RulesValidator {
    /// Performs a full validation of the `RuleTables` and returns a list of
    /// issues found.
    ///
    /// # Arguments
    /// * `rules`: The rule tables to check, usually freshly loaded from disk.
    ///
    /// # Returns
    /// A `Result<Vec<String>>` with one human-readable line per issue. An empty
    /// list means the tables are usable as-is.
    fn validate_rules(&self, rules: &RuleTables) -> Result<Vec<String>>;
}

/// The `StandardValidator` catches the mistakes that silently turn a rule
/// into a no-op: wrong extensions, duplicates that differ only by case, and
/// empty override lists.
pub struct StandardValidator;

impl StandardValidator {
    pub fn new() -> Self {
        Self
    }

    /// Reports entries of `list` that repeat an earlier one, ignoring case.
    ///
    /// Lookups in `RuleTables` are case-insensitive, so `HxD` and `hxd` are
    /// the same rule and the second one can never take effect.
    ///
    /// # Arguments
    /// * `table`: Name of the table, used as the prefix of each message.
    /// * `list`: The entries of that table, in file order.
    ///
    /// # Returns
    /// A `Vec<String>` with one message per repeated entry. The first
    /// occurrence is never reported.
    fn check_duplicates(&self, table: &str, list: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        list.iter()
            .filter(|entry| !seen.insert(entry.to_lowercase()))
            .map(|entry| format!("Duplicate {table} entry: {entry}"))
            .collect()
    }

    /// Checks that `entry` names a file with the expected extension.
    ///
    /// # Arguments
    /// * `table`: Name of the table the entry came from.
    /// * `entry`: The file name to check.
    /// * `extension`: The extension without its leading dot (e.g. `"exe"`).
    ///
    /// # Returns
    /// `None` when the entry ends in `.<extension>` (ignoring case), otherwise
    /// `Some` message describing the mismatch.
    fn check_extension(&self, table: &str, entry: &str, extension: &str) -> Option<String> {
        let suffix = format!(".{extension}");
        if entry.to_lowercase().ends_with(&suffix) {
            None
        } else {
            Some(format!("{table} entry '{entry}' does not end in {suffix}"))
        }
    }
}

impl Default for StandardValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl RulesValidator for StandardValidator {
    fn validate_rules(&self, rules: &RuleTables) -> Result<Vec<String>> {
        let mut issues = Vec::new();

        if rules.version != RULES_VERSION {
            issues.push(format!("Unsupported rules version: {}", rules.version));
        }

        issues.extend(self.check_duplicates("compact_tools", &rules.compact_tools));
        issues.extend(self.check_duplicates("disable_unpack", &rules.disable_unpack));
        issues.extend(
            rules
                .disable_unpack
                .iter()
                .filter_map(|a| self.check_extension("disable_unpack", a, ARCHIVE_EXTENSION)),
        );

        let tools: Vec<String> = rules.overrides.keys().cloned().collect();
        issues.extend(self.check_duplicates("overrides", &tools));

        for (tool, executables) in &rules.overrides {
            if executables.is_empty() {
                issues.push(format!("Override for '{tool}' lists no executables"));
            }
            let table = format!("overrides.{tool}");
            issues.extend(self.check_duplicates(&table, executables));
            issues.extend(
                executables
                    .iter()
                    .filter_map(|exe| self.check_extension(&table, exe, EXECUTABLE_EXTENSION)),
            );
        }

        Ok(issues)
    }
}
