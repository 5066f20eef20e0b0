//! Chat-completions providers against a mock HTTP server.

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use toolwright::config::ToolwrightConfig;
use toolwright::error::ToolwrightError;
use toolwright::models::ollama::OllamaModel;
use toolwright::models::openai::OpenAiModel;
use toolwright::models::LanguageModel;
use toolwright::provider::ollama::OllamaProvider;
use toolwright::provider::openai::OpenAiProvider;
use toolwright::provider::{create_provider, ModelProvider, ProviderRequest, ToolDefinition};
use toolwright::types::{FinishReason, GenerationSettings, ModelMessage};

fn multiply_definition() -> ToolDefinition {
    ToolDefinition {
        name: "multiply".into(),
        description: "Multiply two numbers".into(),
        parameters: json!({
            "type": "object",
            "properties": {"a": {"type": "integer"}, "b": {"type": "integer"}},
            "required": ["a", "b"],
        }),
    }
}

fn completion(message: Value, finish_reason: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [{"index": 0, "message": message, "finish_reason": finish_reason}],
        "usage": {"prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19},
    })
}

#[tokio::test]
async fn openai_sends_tools_and_decodes_tool_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            json!({
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_abc",
                    "type": "function",
                    "function": {"name": "multiply", "arguments": "{\"a\":2,\"b\":4}"},
                }],
            }),
            "tool_calls",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(OpenAiModel::Gpt4oMini, "sk-test".into(), Some(server.uri()));
    let request = ProviderRequest::new(
        vec![ModelMessage::user("What is 2 times 4?")],
        GenerationSettings::default(),
    )
    .with_tools(vec![multiply_definition()]);

    let response = provider.generate_text(&request).await.unwrap();

    assert_eq!(response.tool_calls.len(), 1);
    assert_eq!(response.tool_calls[0].id, "call_abc");
    assert_eq!(response.tool_calls[0].arguments, json!({"a": 2, "b": 4}));
    assert_eq!(response.finish_reason, Some(FinishReason::ToolCalls));
    assert_eq!(response.usage.total_tokens, 19);

    let received = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["tools"][0]["function"]["name"], "multiply");
    assert_eq!(body["messages"][0]["role"], "user");
}

#[tokio::test]
async fn missing_tool_call_id_gets_one_generated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            json!({
                "role": "assistant",
                "tool_calls": [{"function": {"name": "market_status", "arguments": "{}"}}],
            }),
            "tool_calls",
        )))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(OpenAiModel::Gpt4oMini, "sk-test".into(), Some(server.uri()));
    let response = provider
        .generate_text(&ProviderRequest::new(
            vec![ModelMessage::user("Is the market open?")],
            GenerationSettings::default(),
        ))
        .await
        .unwrap();

    assert!(response.tool_calls[0].id.starts_with("call_"));
    assert_eq!(response.tool_calls[0].arguments, json!({}));
}

#[tokio::test]
async fn error_statuses_map_to_typed_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(OpenAiModel::Gpt4oMini, "sk-wrong".into(), Some(server.uri()));
    let err = provider
        .generate_text(&ProviderRequest::new(
            vec![ModelMessage::user("hi")],
            GenerationSettings::default(),
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, ToolwrightError::Authentication(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn ollama_uses_the_v1_endpoint_without_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            json!({"role": "assistant", "content": "Hello from llama"}),
            "stop",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(OllamaModel::Custom("llama3.2".into()), format!("{}/", server.uri()));
    let response = provider
        .generate_text(&ProviderRequest::new(
            vec![ModelMessage::user("hi")],
            GenerationSettings::default(),
        ))
        .await
        .unwrap();

    assert_eq!(response.text, "Hello from llama");
    assert_eq!(provider.provider_name(), "ollama");

    let received = server.received_requests().await.unwrap();
    assert!(received[0].headers.get("authorization").is_none());
}

#[test]
fn create_provider_requires_openai_key() {
    let model: LanguageModel = "openai:gpt-4o-mini".parse().unwrap();
    let result = create_provider(&model, &ToolwrightConfig::new());
    assert!(matches!(result, Err(ToolwrightError::Authentication(_))));

    let config = ToolwrightConfig::new();
    config.set_api_key("openai", "sk-test".into());
    let provider = create_provider(&model, &config).unwrap();
    assert_eq!(provider.model_id(), "gpt-4o-mini");
}

#[test]
fn create_provider_defaults_ollama_to_localhost() {
    let model: LanguageModel = "ollama:llama3.2".parse().unwrap();
    let provider = create_provider(&model, &ToolwrightConfig::new()).unwrap();
    assert_eq!(provider.provider_name(), "ollama");
    assert_eq!(provider.model_id(), "llama3.2");
}
