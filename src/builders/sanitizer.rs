use once_cell::sync::Lazy;
use regex::Regex;

static UNSUPPORTED_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]").expect("sanitizer pattern is a valid regex"));

/// Turns a human-readable label into the token used for installer component
/// identifiers.
///
/// Everything outside `[A-Za-z0-9]` is dropped (spaces included) and the
/// result is lowercased, so `"RL!Depacker"` becomes `"rldepacker"`. Any
/// input is accepted and the function is idempotent.
pub fn component_name(label: &str) -> String {
    UNSUPPORTED_CHARS.replace_all(label, "").to_lowercase()
}

/// The `<category>\<tool>` identifier shared by the component, file and icon
/// entries of a tool.
pub fn component_path(category: &str, tool: &str) -> String {
    format!("{}\\{}", component_name(category), component_name(tool))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_punctuation_and_spaces() {
        assert_eq!(component_name("RL!Depacker"), "rldepacker");
        assert_eq!(component_name("[dotnet] dnSpyEx"), "dotnetdnspyex");
        assert_eq!(component_name("Rootkits Detector"), "rootkitsdetector");
        assert_eq!(component_name("process-dump"), "processdump");
        assert_eq!(component_name("ollydbg 1.10"), "ollydbg110");
    }

    #[test]
    fn test_output_alphabet_and_idempotence() {
        let samples = [
            "",
            "  ",
            "Hex Editor",
            "[++] W32Dasm - 8.93",
            "tab\tand\nnewline",
            "ünïcödé tool",
            "x64dbg",
        ];

        for sample in samples {
            let once = component_name(sample);
            assert!(
                once.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()),
                "unexpected character in {once:?}"
            );
            assert_eq!(component_name(&once), once);
        }
    }

    #[test]
    fn test_component_path_joins_with_backslash() {
        assert_eq!(component_path("Hex Editor", "HxD"), "hexeditor\\hxd");
    }
}
