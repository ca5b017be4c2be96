//! The model seam: a chat-completion abstraction, an HTTP client for
//! OpenAI-compatible endpoints, and a scripted model for tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::{ModelConfig, GITHUB_MODELS_BASE_URL};
use crate::error::{AgentError, Result};
use crate::message::{Message, Role, ToolCall};
use crate::tool::ToolDescription;

/// One turn of model output: a final text, tool calls to run, or both.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelCompletion {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

impl ModelCompletion {
    /// A plain text reply.
    pub fn reply(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    /// A single tool invocation request.
    pub fn tool_call(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            content: None,
            tool_calls: vec![ToolCall {
                id: None,
                name: name.into(),
                arguments,
            }],
        }
    }
}

/// Anything that can turn a conversation and a set of declared tools into a
/// completion.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolDescription],
    ) -> Result<ModelCompletion>;
}

/// HTTP client for OpenAI-compatible chat-completions endpoints, GitHub
/// Models included.
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    model: String,
    api_key: String,
    base_url: String,
    organization: Option<String>,
}

impl ChatClient {
    pub fn from_config(cfg: &ModelConfig) -> Result<Self> {
        let api_key = cfg.api_key.clone().ok_or_else(|| {
            AgentError::Config(
                "no API key configured; set WEATHER_AGENT_API_KEY or GITHUB_TOKEN".into(),
            )
        })?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|err| AgentError::Config(format!("could not build http client: {err}")))?;
        Ok(Self {
            http,
            model: cfg.model.clone(),
            api_key,
            base_url: cfg
                .base_url
                .clone()
                .unwrap_or_else(|| GITHUB_MODELS_BASE_URL.to_string()),
            organization: cfg.organization.clone(),
        })
    }

    fn request_body(&self, messages: &[Message], tools: &[ToolDescription]) -> Value {
        let messages: Vec<Value> = messages.iter().map(wire_message).collect();
        let mut body = json!({ "model": self.model, "messages": messages });
        if !tools.is_empty() {
            body["tools"] = Value::Array(tools.iter().map(wire_tool).collect());
            body["tool_choice"] = json!("auto");
        }
        body
    }
}

fn wire_message(message: &Message) -> Value {
    let role = match message.role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::Tool => "tool",
    };
    let mut wire = json!({ "role": role, "content": message.content });
    if let Some(call) = &message.tool_call {
        wire["tool_calls"] = json!([{
            "id": call.id,
            "type": "function",
            "function": { "name": call.name, "arguments": call.arguments.to_string() },
        }]);
    }
    if let Some(result) = &message.tool_result {
        wire["content"] = Value::String(result.output.to_string());
        if let Some(id) = &result.tool_call_id {
            wire["tool_call_id"] = json!(id);
        }
    }
    wire
}

fn wire_tool(tool: &ToolDescription) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": tool
                .parameters
                .clone()
                .unwrap_or_else(|| json!({ "type": "object", "properties": {} })),
        },
    })
}

#[async_trait]
impl LanguageModel for ChatClient {
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolDescription],
    ) -> Result<ModelCompletion> {
        let mut request = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.request_body(messages, tools));
        if let Some(org) = &self.organization {
            request = request.header("OpenAI-Organization", org);
        }

        let response = request.send().await.map_err(|err| {
            AgentError::Model(format!("request to {} failed: {err}", self.base_url))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                "rate limited"
            } else {
                "request rejected"
            };
            return Err(AgentError::Model(format!("{detail} ({status}): {body}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|err| AgentError::Model(format!("unexpected response shape: {err}")))?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Model("response contained no choices".into()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .into_iter()
            .map(|call| {
                // Providers send the arguments as a JSON-encoded string; a
                // string that fails to parse is passed through as-is.
                let arguments = serde_json::from_str(&call.function.arguments)
                    .unwrap_or(Value::String(call.function.arguments));
                ToolCall {
                    id: call.id,
                    name: call.function.name,
                    arguments,
                }
            })
            .collect();

        Ok(ModelCompletion {
            content: choice.message.content,
            tool_calls,
        })
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<WireToolCall>,
}

#[derive(Deserialize)]
struct WireToolCall {
    #[serde(default)]
    id: Option<String>,
    function: WireFunctionCall,
}

#[derive(Deserialize)]
struct WireFunctionCall {
    name: String,
    arguments: String,
}

/// A model that replays a fixed sequence of completions. For tests and demos.
pub struct ScriptedModel {
    turns: Mutex<VecDeque<ModelCompletion>>,
}

impl ScriptedModel {
    pub fn new(turns: impl IntoIterator<Item = ModelCompletion>) -> Arc<Self> {
        Arc::new(Self {
            turns: Mutex::new(turns.into_iter().collect()),
        })
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(
        &self,
        _messages: &[Message],
        _tools: &[ToolDescription],
    ) -> Result<ModelCompletion> {
        self.turns
            .lock()
            .expect("script lock poisoned")
            .pop_front()
            .ok_or_else(|| AgentError::Model("scripted model has no turns left".into()))
    }
}
