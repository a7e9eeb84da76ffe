/// Walks a toolkit folder (`<root>/<category>/<tool>/...`) and writes the
/// Inno Setup sections the installer build includes: one component, one
/// recursive file copy and a pair of shortcuts per launcher for every tool.
/// Bundled `.7z` archives are unpacked in place on the way.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;
use toolkit_sections::builders::writer::{DEFAULT_EXTENSION, DEFAULT_OUTPUT_DIR};
use toolkit_sections::core::config::DEFAULT_RULES_FILE;
use toolkit_sections::utils::{self, GenerateOptions};

#[derive(Parser)]
#[command(name = "toolkit-sections")]
#[command(about = "Generate installer sections from a toolkit folder tree")]
struct Cli {
    /// Print debug traces
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one section file per category
    Generate {
        /// Path to the toolkit folder
        #[arg(short, long)]
        folder: PathBuf,
        /// Directory receiving the section files
        #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
        output: PathBuf,
        /// Rule tables file (defaults to the built-in tables)
        #[arg(short, long)]
        rules: Option<PathBuf>,
        /// Extension of the section files
        #[arg(long, default_value = DEFAULT_EXTENSION)]
        extension: String,
    },
    /// Write the built-in rule tables to a file for editing
    InitRules {
        #[arg(short, long, default_value = DEFAULT_RULES_FILE)]
        output: PathBuf,
    },
    /// Check a rule tables file for mistakes
    ValidateRules {
        #[arg(short, long)]
        rules: PathBuf,
    },
    /// Export rule tables as toml, json or yaml
    ExportRules {
        #[arg(short, long)]
        rules: Option<PathBuf>,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value = "toml")]
        format: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    match cli.command {
        Commands::Generate {
            folder,
            output,
            rules,
            extension,
        } => utils::generate_sections(GenerateOptions {
            folder,
            output,
            rules,
            extension,
        }),
        Commands::InitRules { output } => utils::initialize_rules(&output),
        Commands::ValidateRules { rules } => utils::validate_rules(&rules),
        Commands::ExportRules {
            rules,
            output,
            format,
        } => utils::export_rules(rules, &output, &format),
    }
}
