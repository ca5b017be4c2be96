use thiserror::Error;

pub type Result<T> = std::result::Result<T, AgentError>;

/// Failure modes of the agent runtime.
///
/// An unknown city is deliberately absent: the weather tool reports it as
/// data in its result, and the agent relays it to the user.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("model error: {0}")]
    Model(String),

    #[error("no tool named `{0}` is registered")]
    UnknownTool(String),

    #[error("bad arguments for tool `{tool}`: {reason}")]
    BadToolArguments { tool: String, reason: String },

    #[error("tool `{name}` failed: {source}")]
    ToolFailed {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("conversation error: {0}")]
    Exchange(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
