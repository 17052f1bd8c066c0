use std::fmt::{self, Debug};

use chatline_model::{ModelTool, ToolCallRequest};

use super::Tool;
use super::object::{AnyTool, ToolFuture, ToolObject};
use crate::RunContext;

/// The set of tools an agent offers to the model, in registration order.
pub struct Registry<C: 'static> {
    tools: Vec<Box<dyn ToolObject<C>>>,
}

impl<C: 'static> Registry<C> {
    /// Creates an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Registers a tool. A tool with the same name registered earlier is
    /// replaced, keeping its position.
    pub fn register<T: Tool<C>>(&mut self, tool: T) {
        let tool: Box<dyn ToolObject<C>> = Box::new(AnyTool(tool));
        match self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            Some(slot) => {
                debug!("replacing tool: {}", tool.name());
                *slot = tool;
            }
            None => self.tools.push(tool),
        }
    }

    /// Returns the definitions sent to the model.
    pub fn definitions(&self) -> Vec<ModelTool> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }

    /// Returns the names of the registered tools.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|tool| tool.name())
    }

    /// Returns `true` if a tool with this name is registered.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }

    /// Returns the number of registered tools.
    #[inline]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` if no tool is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Resolves a call request to the future running it, or `None` if no
    /// tool has the requested name.
    pub(crate) fn call(
        &self,
        req: &ToolCallRequest,
        context: RunContext<C>,
    ) -> Option<ToolFuture> {
        let Some(tool) = self.tools.iter().find(|t| t.name() == req.name) else {
            warn!("tool not found: {}", req.name);
            return None;
        };
        trace!("calling a tool ({}) with args: {:?}", req.id, req.arguments);
        Some(tool.execute(context, req.arguments.clone()))
    }
}

impl<C: 'static> Default for Registry<C> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<C: 'static> Debug for Registry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::future::ready;

    use serde::Deserialize;
    use serde_json::{Value, json};

    use super::*;
    use crate::tool::{ErrorKind, ToolResult};

    static EMPTY_SCHEMA: Value = Value::Null;

    #[derive(Deserialize)]
    struct EchoInput {
        text: String,
    }

    struct EchoTool(&'static str);

    impl Tool<String> for EchoTool {
        type Input = EchoInput;

        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            self.0
        }

        fn parameter_schema(&self) -> &Value {
            &EMPTY_SCHEMA
        }

        fn execute(
            &self,
            context: RunContext<String>,
            input: EchoInput,
        ) -> impl Future<Output = ToolResult> + Send + 'static {
            ready(Ok(format!("{}: {}", context.context(), input.text)))
        }
    }

    fn request(name: &str, arguments: Value) -> ToolCallRequest {
        ToolCallRequest {
            id: "call_0".to_owned(),
            name: name.to_owned(),
            arguments,
        }
    }

    #[tokio::test]
    async fn test_call() {
        let mut registry = Registry::new();
        registry.register(EchoTool("Echoes text."));
        let context = RunContext::new("ctx".to_owned());

        let fut = registry
            .call(&request("echo", json!({ "text": "hi" })), context.clone())
            .unwrap();
        assert_eq!(fut.await.unwrap(), "ctx: hi");

        let err = registry
            .call(&request("echo", json!({ "txt": "hi" })), context.clone())
            .unwrap()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        assert!(registry.call(&request("shout", json!({})), context).is_none());
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = Registry::new();
        registry.register(EchoTool("first"));
        registry.register(EchoTool("second"));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("echo"));
        assert_eq!(registry.definitions()[0].description, "second");
    }
}
