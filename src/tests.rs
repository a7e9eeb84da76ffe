#[cfg(test)]
mod tests {
    use crate::builders::classifier::fake_pe;
    use crate::builders::reporter::{Diagnostic, MemoryReporter};
    use crate::builders::unpacker::tests::StubExtractor;
    use crate::builders::writer::DirectoryWriter;
    use crate::core::config::RuleTables;
    use crate::core::engine::SectionEngine;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    fn setup_engine(output: &Path) -> (SectionEngine, MemoryReporter) {
        let reporter = MemoryReporter::new();
        let engine = SectionEngine::new(
            RuleTables::default(),
            Box::new(DirectoryWriter::new(output)),
        )
        .with_extractor(Box::new(StubExtractor {
            files: vec![("unpacked.exe", fake_pe(0x8664))],
        }))
        .with_reporter(Box::new(reporter.clone()));
        (engine, reporter)
    }

    fn add_file(root: &Path, relative: &str, content: &[u8]) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn read_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .split('\n')
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_two_tools_line_count() {
        let toolkit = tempdir().unwrap();
        let output = tempdir().unwrap();
        add_file(toolkit.path(), "analysis/die/die.exe", &fake_pe(0x014c));
        add_file(toolkit.path(), "analysis/pestudio/pestudio.exe", &fake_pe(0x8664));

        let (engine, _) = setup_engine(output.path());
        let reports = engine.run(toolkit.path()).unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].tool_count, 2);
        assert_eq!(reports[0].target_count, 2);

        // 11 lines per single-launcher tool plus two separators each
        let lines = read_lines(&output.path().join("analysis.iss"));
        assert_eq!(lines.len(), 2 * (11 + 2));
        assert_eq!(lines[11], "");
        assert_eq!(lines[12], "");
        assert_eq!(lines[13], "; pestudio");
    }

    #[test]
    fn test_unknown_folders_are_ignored() {
        let toolkit = tempdir().unwrap();
        let output = tempdir().unwrap();
        add_file(toolkit.path(), "monitor/tcpview/tcpview.exe", b"");
        add_file(toolkit.path(), "drivers/secret/secret.exe", b"");
        add_file(toolkit.path(), "loose.exe", b"");

        let (engine, reporter) = setup_engine(output.path());
        let reports = engine.run(toolkit.path()).unwrap();

        assert_eq!(reports.len(), 1);
        let written: Vec<_> = fs::read_dir(output.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(written, vec!["monitor.iss"]);

        let content = fs::read_to_string(output.path().join("monitor.iss")).unwrap();
        assert!(!content.contains("drivers"));
        assert!(!content.contains("secret"));
        assert!(
            !reporter
                .events()
                .iter()
                .any(|d| matches!(d, Diagnostic::Processing { tool } if tool == "secret"))
        );
    }

    #[test]
    fn test_invalid_root_writes_nothing() {
        let toolkit = tempdir().unwrap();
        let output = tempdir().unwrap();
        let not_a_dir = add_file(toolkit.path(), "file.txt", b"");

        let (engine, reporter) = setup_engine(output.path());
        let reports = engine.run(&not_a_dir).unwrap();

        assert!(reports.is_empty());
        assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
        assert_eq!(
            reporter.events(),
            vec![Diagnostic::InvalidRoot { path: not_a_dir }]
        );
    }

    #[test]
    fn test_category_casing_is_kept_in_paths() {
        let toolkit = tempdir().unwrap();
        let output = tempdir().unwrap();
        add_file(toolkit.path(), "Hex Editor/HxD/HxD32.exe", &fake_pe(0x014c));
        add_file(toolkit.path(), "Hex Editor/HxD/HxD64.exe", &fake_pe(0x8664));

        let (engine, _) = setup_engine(output.path());
        engine.run(toolkit.path()).unwrap();

        let content = fs::read_to_string(output.path().join("hex-editor.iss")).unwrap();
        assert!(content.contains("Name: \"hexeditor\\hxd\"; Description: \"HxD\"; Types: full compact; "));
        assert!(content.contains("DestDir: \"{#MyAppToolsFolder}\\Hex Editor\\HxD\""));
        assert!(content.contains("Name: \"{#MyAppBinsFolder}\\sendto\\sendto\\Hex Editor\\HxD x64\""));
        assert_eq!(content.matches("Check: Is64BitInstallMode;").count(), 2);
        assert_eq!(content.matches("[Icons]").count(), 2);
    }

    #[test]
    fn test_empty_category_still_gets_a_section() {
        let toolkit = tempdir().unwrap();
        let output = tempdir().unwrap();
        fs::create_dir_all(toolkit.path().join("rootkits detector")).unwrap();

        let (engine, _) = setup_engine(output.path());
        let reports = engine.run(toolkit.path()).unwrap();

        assert_eq!(reports[0].section_id, "rootkits-detector");
        assert_eq!(
            fs::read_to_string(output.path().join("rootkits-detector.iss")).unwrap(),
            ""
        );
    }

    #[test]
    fn test_runs_are_deterministic() {
        let toolkit = tempdir().unwrap();
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        add_file(toolkit.path(), "other/multi/b.exe", b"");
        add_file(toolkit.path(), "other/multi/a.exe", b"");
        add_file(toolkit.path(), "other/nested/inner/run.exe", b"");
        add_file(toolkit.path(), "other/java/app.jar", b"");

        let (engine, _) = setup_engine(first.path());
        engine.run(toolkit.path()).unwrap();
        let (engine, _) = setup_engine(second.path());
        engine.run(toolkit.path()).unwrap();

        let a = fs::read_to_string(first.path().join("other.iss")).unwrap();
        let b = fs::read_to_string(second.path().join("other.iss")).unwrap();
        assert_eq!(a, b);
        assert!(a.contains("other\\multi\\a.exe"));
        assert!(!a.contains("other\\multi\\b.exe\""));
    }

    #[test]
    fn test_packed_tool_is_unpacked_then_listed() {
        let toolkit = tempdir().unwrap();
        let output = tempdir().unwrap();
        let archive = add_file(toolkit.path(), "unpacking/packed/packed.7z", b"7z");

        let (engine, reporter) = setup_engine(output.path());
        engine.run(toolkit.path()).unwrap();

        assert!(!archive.exists());
        let content = fs::read_to_string(output.path().join("unpacking.iss")).unwrap();
        assert!(content.contains("unpacking\\packed\\unpacked.exe"));
        assert!(content.contains("packed x64"));
        assert!(
            reporter
                .events()
                .iter()
                .any(|d| matches!(d, Diagnostic::ArchiveExtracted { .. }))
        );
    }

    #[test]
    fn test_extraction_failure_halts_the_run() {
        let toolkit = tempdir().unwrap();
        let output = tempdir().unwrap();
        add_file(toolkit.path(), "analysis/broken/broken.7z", b"corrupt");

        let (engine, _) = setup_engine(output.path());
        assert!(engine.run(toolkit.path()).is_err());
        assert!(!output.path().join("analysis.iss").exists());
    }
}
