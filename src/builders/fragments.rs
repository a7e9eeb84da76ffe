//! Inno Setup line templates emitted for each tool.
//!
//! The syntax is fixed by the installer project that consumes the generated
//! sections, including the trailing `"; "` after the last field.

/// Preprocessor constants defined by the installer script.
pub const SRC_DIR: &str = "{#MySrcDir}";
pub const TOOLS_FOLDER: &str = "{#MyAppToolsFolder}";
pub const BINS_FOLDER: &str = "{#MyAppBinsFolder}";
pub const APP_NAME: &str = "{#MyAppName}";

/// One shortcut to emit for a launch target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconEntry<'a> {
    /// Category folder name as found on disk.
    pub category: &'a str,
    pub label: &'a str,
    /// Launcher path relative to the toolkit root, `\` separated.
    pub filename: &'a str,
    /// Working directory relative to the toolkit root, `\` separated.
    pub working_dir: &'a str,
    pub component: &'a str,
    pub precondition: &'a str,
}

/// `; <tool>` / `[Components]` block of a top-level tool.
pub fn component_block(tool_name: &str, component: &str, install_types: &str) -> Vec<String> {
    vec![
        format!("; {tool_name}"),
        "[Components]".to_string(),
        format!(
            "Name: \"{component}\"; Description: \"{tool_name}\"; Types: {install_types}; "
        ),
        String::new(),
    ]
}

/// `[Files]` block copying a whole tool folder.
pub fn files_block(
    source_dir: &str,
    category: &str,
    tool_name: &str,
    component: &str,
) -> Vec<String> {
    vec![
        "[Files]".to_string(),
        format!(
            "Source: \"{SRC_DIR}\\toolkit\\{source_dir}\\*\"; \
             DestDir: \"{TOOLS_FOLDER}\\{category}\\{tool_name}\"; \
             Components: \"{component}\"; \
             Flags: ignoreversion recursesubdirs createallsubdirs; "
        ),
        String::new(),
    ]
}

/// `[Icons]` block: program group shortcut plus the "send to" entry.
pub fn icons_block(entry: &IconEntry<'_>) -> Vec<String> {
    let target = format!(
        "Filename: \"{TOOLS_FOLDER}\\{}\"; WorkingDir: \"{TOOLS_FOLDER}\\{}\"; Components: \"{}\"; {}",
        entry.filename, entry.working_dir, entry.component, entry.precondition
    );

    vec![
        "[Icons]".to_string(),
        format!("Name: \"{{group}}\\{APP_NAME}\\{}\"; {target}", entry.label),
        format!(
            "Name: \"{BINS_FOLDER}\\sendto\\sendto\\{}\\{}\"; {target}",
            entry.category, entry.label
        ),
        String::new(),
    ]
}
