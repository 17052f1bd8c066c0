use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::OpaqueMessage;

/// The reason why a model response has finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelFinishReason {
    /// The model needs to call a tool.
    ToolCalls,
    /// The model has finished generating text.
    Stop,
    /// The output was truncated by the token limit.
    Length,
}

/// Describes a tool call request from the model.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// The unique identifier for the tool call request.
    pub id: String,
    /// The name of the tool to call.
    pub name: String,
    /// The arguments to pass to the tool, usually a JSON object.
    pub arguments: Value,
}

/// A complete response from the model provider.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ModelResponse {
    /// The text generated by the model. Empty if the model only requested
    /// tool calls.
    pub content: String,
    /// Tool calls requested by the model, in the order they were issued.
    pub tool_calls: Vec<ToolCallRequest>,
    /// The reason the model finished generating, if reported.
    pub finish_reason: Option<ModelFinishReason>,
    /// The response message in the provider's own format.
    ///
    /// Providers that need extra fields to continue a conversation (tool
    /// call ids, for example) should set this, and callers should put it in
    /// the history instead of a plain [`crate::ModelMessage::Assistant`].
    pub opaque: Option<OpaqueMessage>,
}

impl ModelResponse {
    /// Creates a text-only response that finished normally.
    #[inline]
    pub fn text<S: Into<String>>(content: S) -> Self {
        Self {
            content: content.into(),
            finish_reason: Some(ModelFinishReason::Stop),
            ..Default::default()
        }
    }

    /// Returns `true` if the model asked for at least one tool call.
    #[inline]
    pub fn wants_tools(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}
