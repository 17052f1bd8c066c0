use std::pin::Pin;

use chatline_model::ModelTool;
use serde_json::Value;

use super::{Error, Tool, ToolResult};
use crate::RunContext;

pub(crate) type ToolFuture = Pin<Box<dyn Future<Output = ToolResult> + Send>>;

/// Object-safe view of a [`Tool`], taking untyped JSON arguments.
pub(crate) trait ToolObject<C>: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn definition(&self) -> ModelTool;

    fn execute(&self, context: RunContext<C>, arguments: Value) -> ToolFuture;
}

pub(crate) struct AnyTool<T>(pub T);

impl<C, T: Tool<C>> ToolObject<C> for AnyTool<T> {
    #[inline]
    fn name(&self) -> &str {
        self.0.name()
    }

    fn definition(&self) -> ModelTool {
        ModelTool {
            name: self.0.name().to_owned(),
            description: self.0.description().trim().to_owned(),
            parameters: self.0.parameter_schema().clone(),
        }
    }

    fn execute(&self, context: RunContext<C>, arguments: Value) -> ToolFuture {
        let input: T::Input = match serde_json::from_value(arguments) {
            Ok(input) => input,
            Err(err) => {
                let reason = format!("{err}");
                return Box::pin(std::future::ready(ToolResult::Err(
                    Error::invalid_input().with_reason(reason),
                )));
            }
        };
        Box::pin(self.0.execute(context, input))
    }
}
