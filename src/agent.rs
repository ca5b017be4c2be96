//! The agent loop: hand the conversation to the model, run whatever tools it
//! asks for, and repeat until it produces a final reply.

use std::sync::Arc;

use crate::error::{AgentError, Result};
use crate::llm::LanguageModel;
use crate::message::{Message, Role, ToolCall, Transcript};
use crate::tool::ToolRegistry;

/// A named agent: instructions, a model, and the tools the model may use.
///
/// Tools reach the model through the request's tool declarations; the system
/// message carries only the instructions.
pub struct Agent<M: LanguageModel> {
    name: String,
    description: String,
    instructions: String,
    model: Arc<M>,
    tools: ToolRegistry,
    transcript: Transcript,
    max_steps: usize,
}

impl<M: LanguageModel> Agent<M> {
    pub fn new(model: Arc<M>) -> Self {
        Self {
            name: "agent".to_string(),
            description: String::new(),
            instructions: "You are a helpful agent.".to_string(),
            model,
            tools: ToolRegistry::new(),
            transcript: Transcript::default(),
            max_steps: 6,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn with_tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn tools_mut(&mut self) -> &mut ToolRegistry {
        &mut self.tools
    }

    pub fn transcript(&self) -> &[Message] {
        self.transcript.messages()
    }

    /// One exchange: record the user's message, then let the model either
    /// answer or invoke tools until it settles on a reply.
    pub async fn respond(&mut self, user_input: impl Into<String>) -> Result<String> {
        self.transcript.push(Message::user(user_input));

        for step in 0..self.max_steps {
            let completion = self
                .model
                .complete(&self.context(), &self.tools.describe())
                .await?;

            if completion.tool_calls.is_empty() {
                let content = completion.content.ok_or_else(|| {
                    AgentError::Exchange("model produced neither text nor tool calls".into())
                })?;
                self.transcript.push(Message::assistant(&content));
                return Ok(content);
            }

            self.run_tool_calls(completion.tool_calls, step).await?;
        }

        Err(AgentError::Exchange(format!(
            "no final reply after {} steps",
            self.max_steps
        )))
    }

    /// Instructions first, then the transcript so far.
    fn context(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.transcript.len() + 1);
        messages.push(Message::system(&self.instructions));
        messages.extend(self.transcript.messages().iter().cloned());
        messages
    }

    async fn run_tool_calls(&mut self, calls: Vec<ToolCall>, step: usize) -> Result<()> {
        for (index, mut call) in calls.into_iter().enumerate() {
            let call_id = call
                .id
                .get_or_insert_with(|| format!("call-{step}-{index}"))
                .clone();
            tracing::debug!(agent = %self.name, tool = %call.name, %call_id, "running tool call");

            self.transcript.push(Message {
                role: Role::Assistant,
                content: String::new(),
                tool_call: Some(call.clone()),
                tool_result: None,
            });

            let output = self.tools.call(&call.name, call.arguments).await?;
            self.transcript
                .push(Message::tool_output(call.name, output, Some(call_id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    use crate::llm::{ModelCompletion, ScriptedModel};
    use crate::tool::ToolDescription;
    use crate::tools::weather::weather_toolkit;

    #[tokio::test]
    async fn replies_directly_when_no_tool_is_called() {
        let model = ScriptedModel::new([ModelCompletion::reply("Hello!")]);
        let mut agent = Agent::new(model);

        let reply = agent.respond("hi").await.unwrap();

        assert_eq!(reply, "Hello!");
        assert_eq!(agent.transcript().len(), 2);
    }

    #[tokio::test]
    async fn runs_the_weather_tool_before_answering() {
        let model = ScriptedModel::new([
            ModelCompletion::tool_call("get_weather", json!({"city": "Tokyo"})),
            ModelCompletion::reply("Light rain in Tokyo, 18°C."),
        ]);
        let mut agent = Agent::new(model).with_tools(weather_toolkit());

        let reply = agent.respond("weather in Tokyo?").await.unwrap();

        assert_eq!(reply, "Light rain in Tokyo, 18°C.");
        // user, assistant tool call, tool result, assistant reply
        assert_eq!(agent.transcript().len(), 4);

        let tool_message = agent
            .transcript()
            .iter()
            .find(|m| m.role == Role::Tool)
            .expect("tool result recorded");
        let result = tool_message.tool_result.as_ref().unwrap();
        assert_eq!(result.name, "get_weather");
        assert_eq!(result.output["status"], "success");
        assert!(result.tool_call_id.is_some());
    }

    #[tokio::test]
    async fn unknown_tool_call_fails_the_exchange() {
        let model = ScriptedModel::new([ModelCompletion::tool_call(
            "get_time",
            json!({"city": "Tokyo"}),
        )]);
        let mut agent = Agent::new(model).with_tools(weather_toolkit());

        let err = agent.respond("what time is it?").await.unwrap_err();
        assert!(matches!(err, AgentError::UnknownTool(name) if name == "get_time"));
    }

    #[tokio::test]
    async fn tools_travel_as_declarations_not_prompt_text() {
        #[derive(Default)]
        struct RecordingModel {
            requests: Mutex<Vec<(String, Vec<ToolDescription>)>>,
        }

        #[async_trait]
        impl LanguageModel for RecordingModel {
            async fn complete(
                &self,
                messages: &[Message],
                tools: &[ToolDescription],
            ) -> crate::Result<ModelCompletion> {
                let system = messages
                    .first()
                    .map(|m| m.content.clone())
                    .unwrap_or_default();
                self.requests.lock().unwrap().push((system, tools.to_vec()));
                Ok(ModelCompletion::reply("ok"))
            }
        }

        let model = Arc::new(RecordingModel::default());
        let mut agent = Agent::new(model.clone())
            .with_instructions("Answer weather questions.")
            .with_tools(weather_toolkit());

        let _ = agent.respond("ping").await.unwrap();

        let requests = model.requests.lock().unwrap();
        let (system, tools) = requests.first().expect("request captured");

        assert_eq!(system, "Answer weather questions.");
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "get_weather");
        let schema = tools[0].parameters.as_ref().expect("schema declared");
        assert!(schema["properties"]["city"].is_object());
    }

    #[tokio::test]
    async fn step_budget_bounds_tool_call_loops() {
        let model = ScriptedModel::new([
            ModelCompletion::tool_call("get_weather", json!({"city": "Tokyo"})),
            ModelCompletion::tool_call("get_weather", json!({"city": "London"})),
        ]);
        let mut agent = Agent::new(model)
            .with_tools(weather_toolkit())
            .with_max_steps(2);

        let err = agent.respond("loop forever").await.unwrap_err();
        assert!(matches!(err, AgentError::Exchange(_)));
    }

    #[tokio::test]
    async fn empty_completion_is_an_exchange_error() {
        let model = ScriptedModel::new([ModelCompletion {
            content: None,
            tool_calls: Vec::new(),
        }]);
        let mut agent = Agent::new(model);

        let err = agent.respond("hi").await.unwrap_err();
        assert!(matches!(err, AgentError::Exchange(_)));
    }
}
