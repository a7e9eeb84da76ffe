// This file is the module declaration file for the `core` module.
// It declares the submodules that hold the run-level pieces of the generator
// and exposes them to the rest of the crate.

// `category` module:
// The fixed enumeration of toolkit categories and the `Category` value built
// for each category folder found under the toolkit root.
pub mod category;

// `config` module:
// The rule tables (override table, compact allowlist, unpack denylist), their
// built-in defaults, and the `RulesManager` that loads, writes and exports
// them as TOML/JSON/YAML.
pub mod config;

// `engine` module:
// The `SectionEngine`, which walks category folders, resolves every tool in
// them and hands each category's lines to the fragment writer.
pub mod engine;
