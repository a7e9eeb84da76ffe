use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Lists the direct children of `dir`, sorted by file name.
///
/// Directory listing order differs between filesystems; every traversal step
/// goes through here so "the first executable" means the same file on every
/// machine.
pub fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to read an entry of {}", dir.display()))?;

    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(entries)
}

/// Sorted sub-directories of `dir`.
pub fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(sorted_entries(dir)?
        .into_iter()
        .filter(|path| path.is_dir())
        .collect())
}

/// Sorted regular files of `dir` whose extension matches `extension`,
/// ignoring case.
pub fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    Ok(sorted_entries(dir)?
        .into_iter()
        .filter(|path| path.is_file() && has_extension(path, extension))
        .collect())
}

pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
}

/// File name of `path` as an owned string (lossy on invalid UTF-8).
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Renders `path` relative to `root` with `\` separators, the only separator
/// the installer script understands.
pub fn relative_script_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("\\")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_entries_are_sorted_by_name() {
        let dir = tempdir().unwrap();
        for name in ["b.exe", "a.exe", "C.EXE", "notes.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("sub")).unwrap();

        let exes: Vec<String> = files_with_extension(dir.path(), "exe")
            .unwrap()
            .iter()
            .map(|p| file_name(p))
            .collect();
        assert_eq!(exes, vec!["C.EXE", "a.exe", "b.exe"]);

        let dirs = subdirectories(dir.path()).unwrap();
        assert_eq!(dirs.len(), 1);
        assert_eq!(file_name(&dirs[0]), "sub");
    }

    #[test]
    fn test_relative_script_path_uses_backslashes() {
        let root = Path::new("/data/toolkit");
        let exe = root.join("hex editor").join("HxD").join("HxD64.exe");
        assert_eq!(
            relative_script_path(root, &exe),
            "hex editor\\HxD\\HxD64.exe"
        );
    }
}
