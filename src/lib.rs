//! Building blocks for a minimal tool-calling conversational agent.
//!
//! The crate provides:
//! - A language model abstraction (`LanguageModel`) with a client for
//!   OpenAI-compatible chat-completions endpoints such as GitHub Models.
//! - A tool interface (`Tool`, `ToolRegistry`) and a mock city-to-weather
//!   lookup exposed as the `get_weather` tool.
//! - An `Agent` that loops between the model and its registered tools.
//! - Preset agent configurations (`presets::weather_agent`,
//!   `presets::assistant_agent`).

mod agent;
mod config;
mod error;
mod llm;
mod message;
pub mod presets;
mod tool;
pub mod tools;

pub use agent::Agent;
pub use config::{AppConfig, ModelConfig, GITHUB_MODELS_BASE_URL};
pub use error::{AgentError, Result};
pub use llm::{ChatClient, LanguageModel, ModelCompletion, ScriptedModel};
pub use message::{Message, Role, ToolCall, ToolResult, Transcript};
pub use tool::{Tool, ToolDescription, ToolRegistry};
pub use tools::weather::{
    lookup_weather, normalize_city, weather_toolkit, GetWeatherTool, WeatherReport,
};
