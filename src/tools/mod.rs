//! Tools module - deterministic capabilities agents can expose to the model.

pub mod weather;

pub use weather::{lookup_weather, normalize_city, weather_toolkit, GetWeatherTool, WeatherReport};
