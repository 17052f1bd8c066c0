//! Tool call supports.
//!
//! A tool is registered with an agent under a unique name, together with a
//! typed input and the JSON schema the model sees for it. When the model
//! asks for a call, the arguments are deserialized into the input type and
//! the tool runs with the per-run context.

mod error;
mod object;
mod registry;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::RunContext;
pub use error::{Error, ErrorKind};
pub use registry::Registry;

/// The result of a tool call.
pub type ToolResult = Result<String, Error>;

/// A tool that can be called by the model.
///
/// `C` is the type of the per-run context the tool can read. Tools that
/// don't need it can implement `Tool<C>` for every `C`.
///
/// Implementations should not keep mutable state between calls; anything a
/// call needs should come from its input or the context.
pub trait Tool<C>: Send + Sync + 'static {
    /// The type of input that the tool accepts.
    type Input: DeserializeOwned;

    /// Returns the name of the tool.
    fn name(&self) -> &str;

    /// Returns the description of the tool.
    fn description(&self) -> &str;

    /// Returns the parameter schema of the tool.
    fn parameter_schema(&self) -> &Value;

    /// Executes the tool with the given input.
    ///
    /// This method must return a future that is fully independent of `self`.
    fn execute(
        &self,
        context: RunContext<C>,
        input: Self::Input,
    ) -> impl Future<Output = ToolResult> + Send + 'static;
}
