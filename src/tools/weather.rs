//! Mock weather toolkit.
//!
//! Backs the `get_weather` capability with a fixed in-memory table covering
//! New York, London, and Tokyo. The lookup is pure and total: unknown cities
//! come back as the `error` branch of [`WeatherReport`], never as a failure.

use std::collections::HashMap;
use std::sync::OnceLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AgentError, Result};
use crate::tool::{Tool, ToolRegistry};

/// Outcome of a weather lookup, tagged by `status` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum WeatherReport {
    Success { report: String },
    Error { error_message: String },
}

/// The table is keyed by normalized city names and never written after init.
fn weather_table() -> &'static HashMap<&'static str, &'static str> {
    static TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| {
        HashMap::from([
            (
                "newyork",
                "The weather in New York is sunny with a temperature of 25°C.",
            ),
            (
                "london",
                "It's cloudy in London with a temperature of 15°C.",
            ),
            (
                "tokyo",
                "Tokyo is experiencing light rain and a temperature of 18°C.",
            ),
        ])
    })
}

/// Lowercase a city name and strip all whitespace. Idempotent.
pub fn normalize_city(city: &str) -> String {
    city.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Look up the weather report for a city.
///
/// The error branch echoes the caller's original text verbatim, so the agent
/// can relay it to the user as-is.
pub fn lookup_weather(city: &str) -> WeatherReport {
    tracing::info!(city, "get_weather called");
    match weather_table().get(normalize_city(city).as_str()) {
        Some(report) => WeatherReport::Success {
            report: (*report).to_string(),
        },
        None => WeatherReport::Error {
            error_message: format!("Sorry, I don't have weather information for '{city}'."),
        },
    }
}

/// Create a toolkit exposing the weather lookup.
pub fn weather_toolkit() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(GetWeatherTool);
    registry
}

pub struct GetWeatherTool;

#[async_trait]
impl Tool for GetWeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Retrieve the current weather report for a specified city. Expects {\"city\": string}."
    }

    fn parameters(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "The name of the city (e.g., \"New York\", \"London\", \"Tokyo\").",
                }
            },
            "required": ["city"],
        }))
    }

    async fn call(&self, input: Value) -> Result<Value> {
        let city = input
            .get("city")
            .and_then(Value::as_str)
            .ok_or_else(|| AgentError::BadToolArguments {
                tool: "get_weather".into(),
                reason: "missing string field `city`".into(),
            })?;

        Ok(serde_json::to_value(lookup_weather(city))?)
    }
}
