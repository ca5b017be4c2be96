//! Ready-made agent configurations.
//!
//! Two variants ship with the crate: a weather agent wired to the
//! `get_weather` tool and a tool-less general-purpose assistant. They are
//! alternative entry points; nothing selects between them at runtime.

use std::sync::Arc;

use crate::agent::Agent;
use crate::llm::LanguageModel;
use crate::tools::weather::weather_toolkit;

pub const WEATHER_AGENT_INSTRUCTIONS: &str = "You are a helpful agent who can answer user \
    questions about the weather in a city. When the user asks for the weather in a specific \
    city, use the 'get_weather' tool to find the information. If the tool returns an error, \
    inform the user politely. If the tool is successful, present the weather report clearly.";

/// The tool-enabled configuration: registers the weather toolkit.
pub fn weather_agent<M: LanguageModel>(model: Arc<M>) -> Agent<M> {
    Agent::new(model)
        .with_name("root_agent")
        .with_description("Agent to answer questions about the weather in a city.")
        .with_instructions(WEATHER_AGENT_INSTRUCTIONS)
        .with_tools(weather_toolkit())
}

/// The tool-less configuration: a generic assistant.
pub fn assistant_agent<M: LanguageModel>(model: Arc<M>) -> Agent<M> {
    Agent::new(model)
        .with_name("assistant")
        .with_description("General-purpose assistant.")
        .with_instructions(
            "You are a helpful assistant. Answer the user's questions clearly and concisely.",
        )
}
