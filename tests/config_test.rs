use docwright_core::config::{Config, OutputFormat, CONFIG_FILE};
use docwright_core::error::DocError;
use docwright_core::generate::ProviderKind;
use docwright_core::model::DocstringStyle;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_partial_file_keeps_defaults() {
    let config = Config::from_toml("[format]\nstyle = \"numpy\"\n\n[output]\nformat = \"json\"\n").unwrap();
    assert_eq!(config.format.style, DocstringStyle::Numpy);
    assert_eq!(config.output.format, OutputFormat::Json);
    assert_eq!(config.format.max_line_length, 88);
    assert_eq!(config.processing.max_file_size, 1_000_000);
    assert_eq!(config.processing.include_patterns, ["*.py"]);
    assert!(config.processing.backup_files);
    assert_eq!(config.llm.timeout_secs, 30);
}

#[test]
fn test_rst_alias() {
    let config = Config::from_toml("[format]\nstyle = \"rst\"\n").unwrap();
    assert_eq!(config.format.style, DocstringStyle::Restructuredtext);
}

#[test]
fn test_unknown_key_is_rejected() {
    let err = Config::from_toml("[llm]\nmodle = \"gpt-4\"\n").unwrap_err();
    assert!(matches!(err, DocError::ConfigInvalid(_)));
}

#[test]
fn test_validation() {
    let mut config = Config::new();
    config.llm.provider = ProviderKind::Ollama;
    assert!(config.validate().is_ok());

    config.llm.temperature = 2.5;
    assert!(matches!(config.validate(), Err(DocError::ConfigInvalid(_))));
    config.llm.temperature = 0.2;

    config.processing.exclude_patterns = vec!["[".into()];
    assert!(matches!(config.validate(), Err(DocError::ConfigInvalid(_))));
    config.processing.exclude_patterns.clear();

    config.llm.provider = ProviderKind::Anthropic;
    config.llm.api_key = Some(String::new());
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("API key required"));
}

#[test]
fn test_init_writes_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE);

    assert!(Config::write_default(&path).unwrap());
    fs::write(&path, "[llm]\nmodel = \"mine\"\n").unwrap();
    assert!(!Config::write_default(&path).unwrap());
    assert_eq!(fs::read_to_string(&path).unwrap(), "[llm]\nmodel = \"mine\"\n");
}

#[test]
fn test_load_from_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(CONFIG_FILE),
        "[llm]\nprovider = \"ollama\"\nmodel = \"codellama\"\n\n[processing]\ndry_run = true\n",
    )
    .unwrap();

    let config = Config::load(dir.path()).unwrap();
    assert_eq!(config.llm.provider, ProviderKind::Ollama);
    assert_eq!(config.llm.model, "codellama");
    assert!(config.processing.dry_run);
}

#[test]
fn test_malformed_file_names_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[llm\n").unwrap();
    let err = Config::load_file(&path).unwrap_err();
    assert!(err.to_string().contains("bad.toml"));
}
