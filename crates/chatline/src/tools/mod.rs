//! Tools the assistant can call.

mod greeting;
mod weather;

pub use greeting::{GreetTool, GreetToolParameters, greet_user};
pub use weather::{DEFAULT_UNIT, WeatherTool, WeatherToolParameters, get_weather};
