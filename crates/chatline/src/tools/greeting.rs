use std::future::ready;

use chatline_core::RunContext;
use chatline_core::tool::{Tool, ToolResult};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;

use crate::UserContext;

/// Input of [`GreetTool`].
#[derive(Deserialize, JsonSchema)]
pub struct GreetToolParameters {
    #[schemars(description = "What the user said to greet the assistant.")]
    greeting: String,
}

/// Greets the user in `context`, echoing what they said.
pub fn greet_user(context: &UserContext, greeting: &str) -> String {
    format!("Hello {}, you said: {greeting}", context.user_id)
}

/// A tool for greeting the current user.
pub struct GreetTool {
    parameter_schema: Value,
}

impl GreetTool {
    /// Creates a new greeting tool.
    #[inline]
    pub fn new() -> Self {
        GreetTool {
            parameter_schema: schema_for!(GreetToolParameters).to_value(),
        }
    }
}

impl Default for GreetTool {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Tool<UserContext> for GreetTool {
    type Input = GreetToolParameters;

    fn name(&self) -> &str {
        "greet_user"
    }

    fn description(&self) -> &str {
        "Greet the current user by name, echoing what they said."
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    fn execute(
        &self,
        context: RunContext<UserContext>,
        input: GreetToolParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        ready(Ok(greet_user(&context, &input.greeting)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greet_user() {
        let context = UserContext::new("Sam");
        assert_eq!(greet_user(&context, "hi"), "Hello Sam, you said: hi");
    }

    #[tokio::test]
    async fn test_execute_reads_context() {
        let tool = GreetTool::new();
        let input = GreetToolParameters {
            greeting: "good morning".to_owned(),
        };
        let output = tool
            .execute(RunContext::new(UserContext::placeholder()), input)
            .await
            .unwrap();
        assert_eq!(output, "Hello Ahmed, you said: good morning");
    }
}
