// ABOUTME: Tests for the OpenAI-compatible client - wire conversions and HTTP exchange.
// ABOUTME: Uses mockito to stand in for the chat-completions endpoint.

use std::sync::Arc;

use mockito::Matcher;
use serde_json::json;

use super::*;
use crate::agent::{Agent, AgentSettings};
use crate::error::{LlmError, ScoutError};
use crate::tool::Registry;

fn search_definition() -> ToolDefinition {
    ToolDefinition::new("web_search", "Search the web")
        .required_param("query", ParameterSpec::string("The query"))
}

#[test]
fn test_request_conversion() {
    let req = Request::new("llama-3.3-70b")
        .message(Message::system("Be helpful"))
        .message(Message::user("Hello"))
        .tools(vec![search_definition()])
        .tool_choice(ToolChoice::Auto)
        .max_tokens(4096)
        .temperature(0.0);

    let json = serde_json::to_value(OpenAIRequest::from(&req)).unwrap();
    assert_eq!(json["model"], "llama-3.3-70b");
    assert_eq!(json["messages"][0]["role"], "system");
    assert_eq!(json["messages"][0]["content"], "Be helpful");
    assert_eq!(json["messages"][1]["role"], "user");
    assert_eq!(json["max_tokens"], 4096);
    assert_eq!(json["temperature"], 0.0);
    assert_eq!(json["tool_choice"], "auto");
    assert_eq!(json["tools"][0]["type"], "function");
    assert_eq!(json["tools"][0]["function"]["name"], "web_search");
    assert_eq!(
        json["tools"][0]["function"]["parameters"]["required"],
        json!(["query"])
    );
}

#[test]
fn test_request_without_tools_omits_tool_choice() {
    let req = Request::new("llama")
        .message(Message::user("Hello"))
        .tool_choice(ToolChoice::Auto);

    let json = serde_json::to_value(OpenAIRequest::from(&req)).unwrap();
    assert!(json.get("tools").is_none());
    assert!(json.get("tool_choice").is_none());
}

#[test]
fn test_tool_messages_conversion() {
    let assistant = Message::Assistant {
        content: None,
        tool_calls: vec![ToolCallRequest::new(
            "call_1",
            "web_search",
            r#"{"query":"fusion"}"#,
        )],
    };
    let tool = Message::tool("call_1", "web_search", r#"[{"error":"x"}]"#);

    let assistant = serde_json::to_value(OpenAIMessage::from(&assistant)).unwrap();
    assert_eq!(assistant["role"], "assistant");
    assert!(assistant.get("content").is_none());
    assert_eq!(assistant["tool_calls"][0]["id"], "call_1");
    assert_eq!(assistant["tool_calls"][0]["type"], "function");
    assert_eq!(
        assistant["tool_calls"][0]["function"]["arguments"],
        r#"{"query":"fusion"}"#
    );

    let tool = serde_json::to_value(OpenAIMessage::from(&tool)).unwrap();
    assert_eq!(tool["role"], "tool");
    assert_eq!(tool["tool_call_id"], "call_1");
    assert_eq!(tool["name"], "web_search");
    assert_eq!(tool["content"], r#"[{"error":"x"}]"#);
}

#[test]
fn test_response_with_tool_calls() {
    let raw = json!({
        "id": "chatcmpl-1",
        "model": "llama",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_abc",
                    "type": "function",
                    "function": {"name": "web_search", "arguments": "{\"query\":\"rust\"}"}
                }]
            },
            "finish_reason": "tool_calls"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    });

    let resp = Response::try_from(serde_json::from_value::<OpenAIResponse>(raw).unwrap()).unwrap();
    assert_eq!(resp.id, "chatcmpl-1");
    assert!(resp.has_tool_calls());
    assert_eq!(resp.tool_calls[0].id, "call_abc");
    assert_eq!(resp.tool_calls[0].name, "web_search");
    assert_eq!(resp.tool_calls[0].arguments, "{\"query\":\"rust\"}");
    assert_eq!(resp.stop_reason, StopReason::ToolUse);
    assert_eq!(resp.usage.input_tokens, 10);
    assert_eq!(resp.usage.output_tokens, 5);
}

#[test]
fn test_response_without_choices() {
    let raw = json!({"id": "x", "model": "m", "choices": []});
    let result = Response::try_from(serde_json::from_value::<OpenAIResponse>(raw).unwrap());
    assert!(matches!(result, Err(LlmError::EmptyResponse)));
}

#[tokio::test]
async fn test_empty_choices_fail_the_run() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"id": "x", "model": "m", "choices": []}).to_string())
        .create_async()
        .await;

    let client = OpenAIClient::new("test-key").with_base_url(server.url());
    let agent = Agent::new(
        Arc::new(client),
        Arc::new(Registry::new()),
        AgentSettings::new("m"),
    );

    let err = agent
        .run("who is the prime minister?")
        .await
        .unwrap_err();
    assert!(matches!(err, ScoutError::Llm(LlmError::EmptyResponse)));
    assert!(err.to_string().contains("no choices"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_message_round_trip() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(json!({
            "model": "llama",
            "max_tokens": 4096,
            "tool_choice": "auto"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "chatcmpl-2",
                "model": "llama",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "Hi there!"},
                    "finish_reason": "stop"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = OpenAIClient::new("test-key").with_base_url(server.url());
    let req = Request::new("llama")
        .message(Message::user("hello"))
        .tools(vec![search_definition()])
        .tool_choice(ToolChoice::Auto)
        .max_tokens(4096);

    let resp = client.create_message(&req).await.unwrap();
    assert_eq!(resp.text(), "Hi there!");
    assert!(!resp.has_tool_calls());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_message_api_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":{"message":"Invalid API Key","type":"invalid_request_error"}}"#)
        .create_async()
        .await;

    let client = OpenAIClient::new("bad").with_base_url(format!("{}/", server.url()));
    let err = client
        .create_message(&Request::new("llama").message(Message::user("hi")))
        .await
        .unwrap_err();

    match err {
        LlmError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid API Key");
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_message_plain_text_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(503)
        .with_body("upstream unavailable")
        .create_async()
        .await;

    let client = OpenAIClient::new("key").with_base_url(server.url());
    let err = client
        .create_message(&Request::new("llama").message(Message::user("hi")))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LlmError::Api { status: 503, ref message } if message == "upstream unavailable"
    ));
}

#[tokio::test]
async fn test_agent_from_config_uses_configured_endpoint() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer groq-key")
        .match_body(Matcher::PartialJson(json!({
            "model": "llama-3.3-70b",
            "tool_choice": "auto"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "chatcmpl-3",
                "model": "llama-3.3-70b",
                "choices": [{
                    "message": {"content": "Hi there!"},
                    "finish_reason": "stop"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let url = server.url();
    let config = crate::config::Config::from_lookup(|key| match key {
        "GROQ_API_KEY" => Some("groq-key".to_string()),
        "GROQ_MODEL" => Some("llama-3.3-70b".to_string()),
        "GROQ_BASE_URL" => Some(url.clone()),
        _ => None,
    })
    .unwrap();

    let agent = Agent::from_config(&config).unwrap();
    assert_eq!(agent.run("hello").await.unwrap(), "Hi there!");
    mock.assert_async().await;
}
