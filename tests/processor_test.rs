use docwright_core::config::Config;
use docwright_core::error::{DocError, Result};
use docwright_core::generate::{Generation, Generator};
use docwright_core::model::{ChangeKind, DocstringStyle, FunctionRecord};
use docwright_core::parser;
use docwright_core::processor::{self, DocStatus, Processor};
use std::fs;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Answers with a complete Google-style docstring, failing for names containing "bad".
#[derive(Default)]
struct Scripted {
    calls: AtomicUsize,
}

impl Generator for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }

    fn generate(&self, record: &FunctionRecord, _style: DocstringStyle) -> Result<Generation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if record.name.contains("bad") {
            return Err(DocError::GenerationFailure {
                provider: "scripted".into(),
                message: "HTTP 500: boom".into(),
            });
        }
        Ok(Generation {
            content: format!(
                "Summary for {}.\n\nArgs:\n    value: Input.\n\nReturns:\n    The result.",
                record.name
            ),
            model: "scripted-1".into(),
            ..Generation::default()
        })
    }
}

fn config() -> Config {
    let mut config = Config::new();
    config.processing.backup_files = false;
    config
}

const MODULE: &str = "\
def add(a, b):
    return a + b


class Box:
    def size(self) -> int:
        \"Short\"
        return 1

    def _private(self):
        pass
";

#[test]
fn test_fix_source_adds_and_improves() {
    let config = config();
    let generator = Scripted::default();
    let processor = Processor::new(&config, &generator).unwrap();

    let fix = processor.fix_source(MODULE).unwrap();
    assert_eq!(fix.changes.len(), 2);
    assert_eq!(fix.changes[0].kind, ChangeKind::Add);
    assert_eq!(fix.changes[1].kind, ChangeKind::Modify);
    assert_eq!(fix.changes[1].original_text, "Short");
    assert!(fix.text.contains("def add(a, b):\n    \"\"\"Summary for add.\n"));
    assert!(fix.text.contains("    def size(self) -> int:\n        \"\"\"Summary for size.\n"));
    assert!(!fix.text.contains("\"Short\""));
    assert!(fix.text.contains("    def _private(self):\n        pass\n"));
    assert!(parser::parse(&fix.text).is_ok());
}

#[test]
fn test_second_pass_changes_nothing() {
    let config = config();
    let generator = Scripted::default();
    let processor = Processor::new(&config, &generator).unwrap();

    let first = processor.fix_source(MODULE).unwrap();
    let calls = generator.calls.load(Ordering::SeqCst);
    let second = processor.fix_source(&first.text).unwrap();

    assert!(second.changes.is_empty());
    assert_eq!(second.text, first.text);
    assert_eq!(generator.calls.load(Ordering::SeqCst), calls);
}

#[test]
fn test_documented_module_round_trips() {
    let source = "# header\r\n\r\nx = 1  \r\n";
    let config = config();
    let generator = Scripted::default();
    let processor = Processor::new(&config, &generator).unwrap();
    let fix = processor.fix_source(source).unwrap();
    assert_eq!(fix.text, source);
}

#[test]
fn test_generation_failure_is_isolated() {
    let source = "def bad_one(x):\n    return x\n\ndef good(x):\n    return x\n";
    let config = config();
    let generator = Scripted::default();
    let processor = Processor::new(&config, &generator).unwrap();

    let fix = processor.fix_source(source).unwrap();
    assert_eq!(fix.changes.len(), 1);
    assert!(fix.text.contains("def good(x):\n    \"\"\"Summary for good."));
    assert!(fix.text.contains("def bad_one(x):\n    return x"));
    assert_eq!(fix.warnings.len(), 1);
    assert!(fix.warnings[0].starts_with("Failed to generate docstring for bad_one"));
}

#[test]
fn test_header_inside_signature_is_skipped() {
    let source = "def f(a={\"k\":\n        1}):\n    return a\n\ndef g(x):\n    return x\n";
    let config = config();
    let generator = Scripted::default();
    let processor = Processor::new(&config, &generator).unwrap();

    let fix = processor.fix_source(source).unwrap();
    assert_eq!(fix.changes.len(), 1);
    assert!(fix.text.starts_with("def f(a={\"k\":\n        1}):\n    return a\n"));
    assert!(fix.text.contains("def g(x):\n    \"\"\"Summary for g."));
    assert_eq!(fix.warnings.len(), 1);
    assert!(fix.warnings[0].contains("ends inside the signature"));
}

#[test]
fn test_process_file_writes_with_backup() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("calc.py");
    fs::write(&path, "def add(a, b):\n    return a + b\n").unwrap();

    let mut config = config();
    config.processing.backup_files = true;
    let generator = Scripted::default();
    let processor = Processor::new(&config, &generator).unwrap();

    let result = processor.process_file(&path).unwrap();
    assert!(result.success());
    assert_eq!(result.docstrings_added, 1);
    assert_eq!(result.functions_found, 1);

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("\"\"\"Summary for add."));
    let backup = dir.path().join("calc.py.bak");
    assert_eq!(
        fs::read_to_string(backup).unwrap(),
        "def add(a, b):\n    return a + b\n"
    );
}

#[test]
fn test_dry_run_leaves_disk_alone() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("calc.py");
    let original = "def add(a, b):\n    return a + b\n";
    fs::write(&path, original).unwrap();

    let mut config = config();
    config.processing.dry_run = true;
    config.processing.backup_files = true;
    let generator = Scripted::default();
    let processor = Processor::new(&config, &generator).unwrap();

    let result = processor.process_file(&path).unwrap();
    assert_eq!(result.changes.len(), 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
    assert!(!dir.path().join("calc.py.bak").exists());
}

#[test]
fn test_file_level_rejections() {
    let dir = TempDir::new().unwrap();
    let text = dir.path().join("notes.txt");
    fs::write(&text, "def f():\n    pass\n").unwrap();
    let big = dir.path().join("big.py");
    fs::write(&big, "x = 1\n".repeat(100)).unwrap();

    let mut config = config();
    config.processing.max_file_size = 50;
    let generator = Scripted::default();
    let processor = Processor::new(&config, &generator).unwrap();

    assert!(matches!(
        processor.process_file(&text),
        Err(DocError::UnsupportedFile(_))
    ));
    assert!(matches!(
        processor.process_file(&big),
        Err(DocError::SizeLimitExceeded { size: 600, limit: 50 })
    ));
}

#[test]
fn test_directory_batch_honors_excludes() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("app.py"), "def run():\n    pass\n").unwrap();
    fs::create_dir(dir.path().join("tests")).unwrap();
    fs::write(dir.path().join("tests").join("helper.py"), "def util():\n    pass\n").unwrap();

    let config = config();
    let generator = Scripted::default();
    let processor = Processor::new(&config, &generator).unwrap();

    let batch = processor.process_directory(dir.path()).unwrap();
    assert_eq!(batch.total_files, 1);
    assert!(batch.results[0].file_path.ends_with("app.py"));
    assert_eq!(batch.successful_files, 1);
    assert_eq!(batch.total_changes, 1);
    assert_eq!(
        fs::read_to_string(dir.path().join("tests").join("helper.py")).unwrap(),
        "def util():\n    pass\n"
    );
}

#[test]
fn test_batch_records_broken_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("ok.py"), "def run():\n    pass\n").unwrap();
    fs::write(dir.path().join("broken.py"), "def run(:\n").unwrap();

    let config = config();
    let generator = Scripted::default();
    let processor = Processor::new(&config, &generator).unwrap();

    let batch = processor.process_directory(dir.path()).unwrap();
    assert_eq!(batch.total_files, 2);
    assert_eq!(batch.failed_files, 1);
    assert_eq!(batch.total_errors, 1);
    let broken = batch
        .results
        .iter()
        .find(|r| r.file_path.ends_with("broken.py"))
        .unwrap();
    assert!(broken.errors[0].starts_with("Parse failed"));
}

#[test]
fn test_missing_directory_is_an_error() {
    let config = config();
    let generator = Scripted::default();
    let processor = Processor::new(&config, &generator).unwrap();

    let err = processor
        .process_directory(std::path::Path::new("/definitely/not/here"))
        .unwrap_err();
    assert!(matches!(err, DocError::Io { .. }));
}

#[test]
fn test_cancelled_batch_starts_nothing() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("app.py"), "def run():\n    pass\n").unwrap();

    let config = config();
    let generator = Scripted::default();
    let flag = Arc::new(AtomicBool::new(true));
    let processor = Processor::new(&config, &generator)
        .unwrap()
        .with_cancel(flag);

    let batch = processor.process_directory(dir.path()).unwrap();
    assert_eq!(batch.total_files, 0);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_scan_classifies_without_generating() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mod.py");
    fs::write(&path, MODULE).unwrap();

    let entries = processor::scan_file(&path, 1_000_000).unwrap();
    let statuses: Vec<DocStatus> = entries.iter().map(|e| e.status).collect();
    assert_eq!(statuses, [DocStatus::Missing, DocStatus::NeedsImprovement]);
    assert!(entries.iter().all(|e| e.is_flagged()));
    assert_eq!(entries[0].record.module_name, "mod");
}
