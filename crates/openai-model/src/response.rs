use chatline_model::{
    ErrorKind, ModelFinishReason, ModelResponse, OpaqueMessage, ToolCallRequest,
};
use serde_json::Value;

use crate::Error;
use crate::proto::{ChatCompletion, Message, ToolCall};

/// Converts a decoded completion into the provider-neutral response.
///
/// Only the first choice is used, since requests never ask for more.
pub fn into_model_response(completion: ChatCompletion) -> Result<ModelResponse, Error> {
    let ChatCompletion { id, choices } = completion;
    let Some(choice) = choices.into_iter().next() else {
        return Err(Error::new("response has no choices", ErrorKind::InvalidResponse));
    };

    let finish_reason = match choice.finish_reason.as_deref() {
        Some("content_filter") => {
            return Err(Error::new(
                "response was blocked by the content filter",
                ErrorKind::Moderated,
            ));
        }
        Some("tool_calls") => Some(ModelFinishReason::ToolCalls),
        Some("length") => Some(ModelFinishReason::Length),
        Some(_) => Some(ModelFinishReason::Stop),
        None => None,
    };

    let raw_calls = choice.message.tool_calls.unwrap_or_default();
    let tool_calls: Vec<_> = raw_calls.iter().map(parse_tool_call).collect();
    let content = choice.message.content.unwrap_or_default();

    // The history needs the original tool calls so the server can match the
    // tool results against them.
    let opaque = (!raw_calls.is_empty()).then(|| {
        let id = id.unwrap_or_else(|| raw_calls[0].id.clone());
        OpaqueMessage::new(
            id,
            Message::Assistant {
                content: (!content.is_empty()).then(|| content.clone()),
                tool_calls: Some(raw_calls.clone()),
            },
        )
    });

    Ok(ModelResponse {
        content,
        tool_calls,
        finish_reason,
        opaque,
    })
}

/// Malformed arguments are passed through as a JSON string, so the tool
/// rejects them and the model gets a chance to retry.
fn parse_tool_call(call: &ToolCall) -> ToolCallRequest {
    let raw = &call.function.arguments;
    let arguments = if raw.trim().is_empty() {
        Value::Object(Default::default())
    } else {
        serde_json::from_str(raw).unwrap_or_else(|err| {
            warn!("invalid arguments for `{}`: {err}", call.function.name);
            Value::String(raw.clone())
        })
    };
    ToolCallRequest {
        id: call.id.clone(),
        name: call.function.name.clone(),
        arguments,
    }
}
