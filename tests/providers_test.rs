use docwright_core::config::{FormatConfig, LlmConfig};
use docwright_core::error::DocError;
use docwright_core::generate::{self, ProviderKind};
use docwright_core::model::{DocstringStyle, FunctionRecord};
use docwright_core::parser;
use mockito::{Matcher, Server, ServerGuard};

fn record() -> FunctionRecord {
    parser::parse("def add(a: int, b: int) -> int:\n    return a + b\n")
        .unwrap()
        .remove(0)
}

fn llm(provider: ProviderKind, server: &ServerGuard) -> LlmConfig {
    LlmConfig {
        provider,
        model: "test-model".into(),
        api_key: Some("test-key".into()),
        base_url: Some(server.url()),
        ..LlmConfig::default()
    }
}

#[test]
fn test_openai_chat_completion() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJsonString(
            r#"{"model": "test-model"}"#.into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "model": "test-model-0613",
                "choices": [{
                    "message": {"role": "assistant", "content": "```python\n\"\"\"Add two integers.\n\n    Args:\n        a: Left.\n    \"\"\"\n```"},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 120, "completion_tokens": 30}
            }"#,
        )
        .create();

    let generator =
        generate::build_generator(&llm(ProviderKind::OpenAi, &server), &FormatConfig::default())
            .unwrap();
    let generation = generator.generate(&record(), DocstringStyle::Google).unwrap();

    assert_eq!(generation.content, "Add two integers.\n\nArgs:\n    a: Left.");
    assert_eq!(generation.model, "test-model-0613");
    assert_eq!(generation.finish_reason, "stop");
    assert_eq!(generation.usage.get("prompt_tokens"), Some(&120));
    assert_eq!(generation.usage.get("completion_tokens"), Some(&30));
    mock.assert();
}

#[test]
fn test_anthropic_messages() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/messages")
        .match_header("x-api-key", "test-key")
        .match_header("anthropic-version", "2023-06-01")
        .match_body(Matcher::PartialJsonString(
            r#"{"model": "test-model", "max_tokens": 1000}"#.into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "content": [{"type": "text", "text": "Add two integers."}],
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 90, "output_tokens": 6}
            }"#,
        )
        .create();

    let generator = generate::build_generator(
        &llm(ProviderKind::Anthropic, &server),
        &FormatConfig::default(),
    )
    .unwrap();
    let generation = generator.generate(&record(), DocstringStyle::Numpy).unwrap();

    assert_eq!(generation.content, "Add two integers.");
    assert_eq!(generation.model, "test-model");
    assert_eq!(generation.finish_reason, "end_turn");
    assert_eq!(generation.usage.get("output_tokens"), Some(&6));
    mock.assert();
}

#[test]
fn test_ollama_generate() {
    let mut server = Server::new();
    let tags = server
        .mock("GET", "/api/tags")
        .with_status(200)
        .with_body(r#"{"models": []}"#)
        .create();
    let mock = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::PartialJsonString(
            r#"{"model": "test-model", "stream": false}"#.into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"model": "test-model", "response": "\"\"\"Add two integers.\"\"\"", "done": true, "prompt_eval_count": 50, "eval_count": 9}"#,
        )
        .create();

    let mut config = llm(ProviderKind::Ollama, &server);
    config.api_key = None;
    let generator = generate::build_generator(&config, &FormatConfig::default()).unwrap();
    let generation = generator
        .generate(&record(), DocstringStyle::Restructuredtext)
        .unwrap();

    assert_eq!(generation.content, "Add two integers.");
    assert_eq!(generation.finish_reason, "stop");
    assert_eq!(generation.usage.get("prompt_tokens"), Some(&50));
    assert_eq!(generation.usage.get("completion_tokens"), Some(&9));
    tags.assert();
    mock.assert();
}

#[test]
fn test_ollama_unreachable_is_config_error() {
    let mut server = Server::new();
    let _tags = server.mock("GET", "/api/tags").with_status(503).create();

    let mut config = llm(ProviderKind::Ollama, &server);
    config.api_key = None;
    let err = generate::build_generator(&config, &FormatConfig::default())
        .err()
        .unwrap();
    assert!(matches!(err, DocError::ConfigInvalid(_)));
}

#[test]
fn test_error_status_becomes_generation_failure() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_body(r#"{"error": {"message": "rate limited"}}"#)
        .create();

    let generator =
        generate::build_generator(&llm(ProviderKind::OpenAi, &server), &FormatConfig::default())
            .unwrap();
    let err = generator
        .generate(&record(), DocstringStyle::Google)
        .unwrap_err();
    match err {
        DocError::GenerationFailure { provider, message } => {
            assert_eq!(provider, "openai");
            assert!(message.starts_with("HTTP 429"));
            assert!(message.contains("rate limited"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_empty_reply_is_generation_failure() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/messages")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"content": [{"type": "text", "text": "   "}]}"#)
        .create();

    let generator = generate::build_generator(
        &llm(ProviderKind::Anthropic, &server),
        &FormatConfig::default(),
    )
    .unwrap();
    assert!(matches!(
        generator.generate(&record(), DocstringStyle::Google),
        Err(DocError::GenerationFailure { .. })
    ));
}
