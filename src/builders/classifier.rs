use anyhow::{Context, Result};
use log::debug;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Installer guard attached to entries that only make sense on 64-bit Windows.
pub const X64_PRECONDITION: &str = "Check: Is64BitInstallMode;";

/// Suffix appended to the display label of a 64-bit launcher.
pub const X64_SUFFIX: &str = " x64";

const DOS_MAGIC: &[u8; 2] = b"MZ";
const PE_SIGNATURE: &[u8; 4] = b"PE\0\0";
const E_LFANEW_OFFSET: usize = 0x3C;
const DOS_HEADER_LEN: usize = 0x40;

/// Target machine recorded in a PE/COFF header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Machine {
    I386,
    Amd64,
    Arm64,
    Ia64,
    Other(u16),
}

impl Machine {
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            0x014c => Machine::I386,
            0x8664 => Machine::Amd64,
            0xaa64 => Machine::Arm64,
            0x0200 => Machine::Ia64,
            other => Machine::Other(other),
        }
    }

    pub fn is_64bit(&self) -> bool {
        matches!(self, Machine::Amd64 | Machine::Arm64 | Machine::Ia64)
    }
}

/// Reports the target architecture of a native executable.
pub trait BinaryInspector {
    fn machine(&self, path: &Path) -> Result<Machine>;
}

/// Reads the machine type straight out of the PE header.
pub struct PeHeaderInspector;

impl PeHeaderInspector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PeHeaderInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryInspector for PeHeaderInspector {
    fn machine(&self, path: &Path) -> Result<Machine> {
        let mut file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

        let mut dos_header = [0u8; DOS_HEADER_LEN];
        file.read_exact(&mut dos_header)
            .context("File is too short for a DOS header")?;
        if &dos_header[..2] != DOS_MAGIC {
            anyhow::bail!("Missing MZ signature");
        }

        let mut lfanew = [0u8; 4];
        lfanew.copy_from_slice(&dos_header[E_LFANEW_OFFSET..E_LFANEW_OFFSET + 4]);
        let pe_offset = u32::from_le_bytes(lfanew);

        // signature followed by the COFF machine field
        let mut pe_header = [0u8; 6];
        file.seek(SeekFrom::Start(u64::from(pe_offset)))?;
        file.read_exact(&mut pe_header)
            .context("File is too short for a PE header")?;
        if &pe_header[..4] != PE_SIGNATURE {
            anyhow::bail!("Missing PE signature at offset {pe_offset:#x}");
        }

        Ok(Machine::from_raw(u16::from_le_bytes([
            pe_header[4],
            pe_header[5],
        ])))
    }
}

/// Display label and installer guard resolved for one launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchLabel {
    pub label: String,
    pub precondition: String,
}

impl LaunchLabel {
    /// Label for a launcher that needs no architecture guard.
    pub fn plain(tool_name: &str) -> Self {
        Self {
            label: tool_name.to_string(),
            precondition: String::new(),
        }
    }

    fn x64(tool_name: &str) -> Self {
        Self {
            label: format!("{tool_name}{X64_SUFFIX}"),
            precondition: X64_PRECONDITION.to_string(),
        }
    }
}

/// Resolves the label of a native executable.
///
/// Never fails: when the header cannot be read the executable is treated as
/// 32-bit so a broken sample cannot stop the tool from being packaged.
pub fn classify(tool_name: &str, exe_path: &Path, inspector: &dyn BinaryInspector) -> LaunchLabel {
    match inspector.machine(exe_path) {
        Ok(machine) if machine.is_64bit() => LaunchLabel::x64(tool_name),
        Ok(_) => LaunchLabel::plain(tool_name),
        Err(e) => {
            debug!(
                "could not read machine type of {}: {e:#}",
                exe_path.display()
            );
            LaunchLabel::plain(tool_name)
        }
    }
}

/// Builds a minimal PE image for the given machine. Test helper shared with
/// the resolver and engine tests.
#[cfg(test)]
pub(crate) fn fake_pe(machine: u16) -> Vec<u8> {
    let mut image = vec![0u8; DOS_HEADER_LEN];
    image[..2].copy_from_slice(DOS_MAGIC);
    image[E_LFANEW_OFFSET..E_LFANEW_OFFSET + 4].copy_from_slice(&(DOS_HEADER_LEN as u32).to_le_bytes());
    image.extend_from_slice(PE_SIGNATURE);
    image.extend_from_slice(&machine.to_le_bytes());
    image.extend_from_slice(&[0u8; 18]);
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_32bit_sample_is_unsuffixed() {
        let dir = tempdir().unwrap();
        let exe = dir.path().join("tool32.exe");
        fs::write(&exe, fake_pe(0x014c)).unwrap();

        let label = classify("HxD", &exe, &PeHeaderInspector::new());
        assert_eq!(label, LaunchLabel::plain("HxD"));
        assert!(label.precondition.is_empty());
    }

    #[test]
    fn test_64bit_sample_gets_suffix_and_guard() {
        let dir = tempdir().unwrap();
        let exe = dir.path().join("tool64.exe");
        fs::write(&exe, fake_pe(0x8664)).unwrap();

        let label = classify("HxD", &exe, &PeHeaderInspector::new());
        assert_eq!(label.label, "HxD x64");
        assert_eq!(label.precondition, X64_PRECONDITION);
    }

    #[test]
    fn test_arm64_counts_as_64bit() {
        let dir = tempdir().unwrap();
        let exe = dir.path().join("arm.exe");
        fs::write(&exe, fake_pe(0xaa64)).unwrap();

        assert_eq!(
            PeHeaderInspector::new().machine(&exe).unwrap(),
            Machine::Arm64
        );
    }

    #[test]
    fn test_unreadable_inputs_fall_back_to_plain() {
        let dir = tempdir().unwrap();
        let inspector = PeHeaderInspector::new();

        let missing = dir.path().join("missing.exe");
        assert_eq!(classify("tool", &missing, &inspector), LaunchLabel::plain("tool"));

        let text = dir.path().join("readme.exe");
        fs::write(&text, "this is not a portable executable, just some text").unwrap();
        assert!(inspector.machine(&text).is_err());
        assert_eq!(classify("tool", &text, &inspector), LaunchLabel::plain("tool"));

        let truncated = dir.path().join("truncated.exe");
        fs::write(&truncated, &fake_pe(0x8664)[..DOS_HEADER_LEN + 2]).unwrap();
        assert!(inspector.machine(&truncated).is_err());
        assert_eq!(classify("tool", &truncated, &inspector), LaunchLabel::plain("tool"));
    }
}
