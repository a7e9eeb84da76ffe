//! Generates Inno Setup section files from a toolkit folder tree.
//!
//! The toolkit is laid out as `<root>/<category>/<tool>/...`. Every tool
//! becomes an installer component with a recursive file copy and one pair of
//! shortcuts per launcher; every category becomes one `.iss` section file.
pub mod builders;
pub mod core;
pub mod utils;

#[cfg(test)]
mod tests;
