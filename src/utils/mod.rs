use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::builders::writer::DirectoryWriter;
use crate::core::config::{RulesManager, RulesProvider};
use crate::core::engine::SectionEngine;

pub mod listing;

/// Options of the `generate` command.
pub struct GenerateOptions {
    pub folder: PathBuf,
    pub output: PathBuf,
    pub rules: Option<PathBuf>,
    pub extension: String,
}

pub fn generate_sections(options: GenerateOptions) -> Result<()> {
    let rules = RulesManager::new(options.rules).load_rules()?;
    let writer = DirectoryWriter::new(options.output).with_extension(&options.extension);
    let engine = SectionEngine::new(rules, Box::new(writer));

    let reports = engine.run(&options.folder)?;
    if reports.is_empty() {
        return Ok(());
    }

    let tools: usize = reports.iter().map(|r| r.tool_count).sum();
    let targets: usize = reports.iter().map(|r| r.target_count).sum();
    println!(
        "{}",
        format!(
            "✓ Generated {} sections ({tools} tools, {targets} launchers)",
            reports.len()
        )
        .green()
        .bold()
    );
    Ok(())
}

pub fn initialize_rules(output: &Path) -> Result<()> {
    let manager = RulesManager::new(Some(output.to_path_buf()));
    if manager.initialize(output)? {
        println!("✓ Wrote default rule tables to {}", output.display());
        println!("Pass it to 'toolkit-sections generate --rules' after editing");
    } else {
        println!("Rule tables already exist at {}", output.display());
    }
    Ok(())
}

pub fn validate_rules(rules: &Path) -> Result<()> {
    let manager = RulesManager::new(Some(rules.to_path_buf()));
    let issues = manager.validate_rules()?;

    if issues.is_empty() {
        println!("✓ Rule tables are valid.");
        Ok(())
    } else {
        println!("⚠️  Found issues in rule tables:");
        for issue in issues {
            println!("  - {issue}");
        }
        anyhow::bail!("Rule tables validation failed.");
    }
}

pub fn export_rules(rules: Option<PathBuf>, output: &Path, format: &str) -> Result<()> {
    let manager = RulesManager::new(rules);
    manager.export_rules(output, format)?;
    let source = manager
        .get_rules_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in tables".to_string());
    println!("✓ Exported {source} to {} ({format})", output.display());
    Ok(())
}
