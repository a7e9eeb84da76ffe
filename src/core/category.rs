use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// The fixed set of top-level groupings a toolkit tree may contain.
///
/// Folder names are matched case-insensitively; anything outside this list is
/// treated as intentionally excluded content and skipped by the walker.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    Analysis,
    Decompilers,
    Dissasembler,
    HexEditor,
    Monitor,
    Other,
    RootkitsDetector,
    Unpacking,
}

impl CategoryKind {
    pub const ALL: [CategoryKind; 8] = [
        CategoryKind::Analysis,
        CategoryKind::Decompilers,
        CategoryKind::Dissasembler,
        CategoryKind::HexEditor,
        CategoryKind::Monitor,
        CategoryKind::Other,
        CategoryKind::RootkitsDetector,
        CategoryKind::Unpacking,
    ];

    /// The canonical (lowercase) folder name for this category.
    pub fn folder_name(&self) -> &'static str {
        match self {
            CategoryKind::Analysis => "analysis",
            CategoryKind::Decompilers => "decompilers",
            CategoryKind::Dissasembler => "dissasembler",
            CategoryKind::HexEditor => "hex editor",
            CategoryKind::Monitor => "monitor",
            CategoryKind::Other => "other",
            CategoryKind::RootkitsDetector => "rootkits detector",
            CategoryKind::Unpacking => "unpacking",
        }
    }

    /// Looks up the category matching a folder name, ignoring case.
    pub fn from_folder_name(name: &str) -> Option<Self> {
        let lowered = name.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.folder_name() == lowered)
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.folder_name())
    }
}

/// A category folder discovered under the toolkit root.
///
/// The display name keeps the casing found on disk because it is reused
/// verbatim in destination and "send to" paths of the generated script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub kind: CategoryKind,
    pub display_name: String,
    pub path: PathBuf,
}

impl Category {
    /// Builds a `Category` from a directory, or `None` when its name is not
    /// one of the recognised categories.
    pub fn from_dir(path: &Path) -> Option<Self> {
        let display_name = path.file_name()?.to_string_lossy().into_owned();
        let kind = CategoryKind::from_folder_name(&display_name)?;
        Some(Self {
            kind,
            display_name,
            path: path.to_path_buf(),
        })
    }

    /// Identifier of the output artifact: lowercase, spaces become hyphens.
    pub fn output_id(&self) -> String {
        self.display_name.to_lowercase().replace(' ', "-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_names_match_case_insensitively() {
        assert_eq!(
            CategoryKind::from_folder_name("Hex Editor"),
            Some(CategoryKind::HexEditor)
        );
        assert_eq!(
            CategoryKind::from_folder_name("ROOTKITS DETECTOR"),
            Some(CategoryKind::RootkitsDetector)
        );
        assert_eq!(CategoryKind::from_folder_name("drivers"), None);
        assert_eq!(CategoryKind::from_folder_name("hex-editor"), None);
    }

    #[test]
    fn test_output_id_keeps_words_hyphenated() {
        let category = Category::from_dir(Path::new("/toolkit/Rootkits Detector")).unwrap();
        assert_eq!(category.kind, CategoryKind::RootkitsDetector);
        assert_eq!(category.display_name, "Rootkits Detector");
        assert_eq!(category.output_id(), "rootkits-detector");
    }

    #[test]
    fn test_unknown_folder_is_not_a_category() {
        assert!(Category::from_dir(Path::new("/toolkit/drivers")).is_none());
    }
}
