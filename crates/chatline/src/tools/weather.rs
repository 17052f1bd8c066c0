use std::future::ready;

use chatline_core::RunContext;
use chatline_core::tool::{Tool, ToolResult};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;

/// The unit reported when the model doesn't pick one.
pub const DEFAULT_UNIT: &str = "C";

/// Input of [`WeatherTool`].
#[derive(Deserialize, JsonSchema)]
pub struct WeatherToolParameters {
    #[schemars(description = "The city or place to report on.")]
    location: String,
    #[serde(default = "default_unit")]
    #[schemars(description = "Temperature unit, `C` or `F`.")]
    unit: String,
}

fn default_unit() -> String {
    DEFAULT_UNIT.to_owned()
}

/// Describes the weather at a location.
///
/// The reading is canned: every location is at 22 degrees.
pub fn get_weather(location: &str, unit: Option<&str>) -> String {
    let unit = unit.unwrap_or(DEFAULT_UNIT);
    format!("The weather in {location} is 22 degrees {unit}.")
}

/// A tool for fetching the weather at a location.
pub struct WeatherTool {
    parameter_schema: Value,
}

impl WeatherTool {
    /// Creates a new weather tool.
    #[inline]
    pub fn new() -> Self {
        WeatherTool {
            parameter_schema: schema_for!(WeatherToolParameters).to_value(),
        }
    }
}

impl Default for WeatherTool {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Send + Sync + 'static> Tool<C> for WeatherTool {
    type Input = WeatherToolParameters;

    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Fetch the weather for a given location, returning a short description."
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    fn execute(
        &self,
        _context: RunContext<C>,
        input: WeatherToolParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        debug!("weather lookup for {}", input.location);
        ready(Ok(get_weather(&input.location, Some(&input.unit))))
    }
}
