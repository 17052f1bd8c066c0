use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::future::ready;

use chatline_model::{
    ErrorKind, ModelFinishReason, ModelMessage, ModelProvider,
    ModelProviderError, ModelRequest, ModelResponse, ToolCallRequest,
};
use serde_json::json;

#[derive(Debug)]
struct EchoError(ErrorKind);

impl Display for EchoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "echo model failed: {}", self.0)
    }
}

impl Error for EchoError {}

impl ModelProviderError for EchoError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Echoes the last user message, or asks for the weather tool when the
/// message mentions the weather and no tool result is in the history yet.
struct EchoModelProvider;

impl ModelProvider for EchoModelProvider {
    type Error = EchoError;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static
    {
        let last_user = req.messages.iter().rev().find_map(|msg| match msg {
            ModelMessage::User(text) => Some(text.clone()),
            _ => None,
        });
        let tool_output = req.messages.iter().find_map(|msg| match msg {
            ModelMessage::Tool(result) => Some(result.content.clone()),
            _ => None,
        });

        let result = match (last_user, tool_output) {
            (None, _) => Err(EchoError(ErrorKind::InvalidResponse)),
            (Some(_), Some(output)) => Ok(ModelResponse::text(output)),
            (Some(text), None) if text.contains("weather") => {
                Ok(ModelResponse {
                    tool_calls: vec![ToolCallRequest {
                        id: "call_0".to_owned(),
                        name: "get_weather".to_owned(),
                        arguments: json!({ "location": "Lahore" }),
                    }],
                    finish_reason: Some(ModelFinishReason::ToolCalls),
                    ..Default::default()
                })
            }
            (Some(text), None) => Ok(ModelResponse::text(format!("You said {text}"))),
        };
        ready(result)
    }
}

#[tokio::test]
async fn test_text_completion() {
    let req = ModelRequest {
        messages: vec![
            ModelMessage::System("Be brief.".to_owned()),
            ModelMessage::User("Good morning".to_owned()),
        ],
        tools: vec![],
    };
    let resp = EchoModelProvider.send_request(&req).await.unwrap();
    assert_eq!(resp.content, "You said Good morning");
    assert_eq!(resp.finish_reason, Some(ModelFinishReason::Stop));
    assert!(!resp.wants_tools());
}

#[tokio::test]
async fn test_tool_round_trip() {
    let mut req = ModelRequest {
        messages: vec![ModelMessage::User("what's the weather?".to_owned())],
        tools: vec![],
    };
    let resp = EchoModelProvider.send_request(&req).await.unwrap();
    assert!(resp.wants_tools());
    assert_eq!(resp.tool_calls[0].name, "get_weather");

    req.messages.push(ModelMessage::Tool(chatline_model::ToolCallResult {
        id: resp.tool_calls[0].id.clone(),
        content: "22 degrees".to_owned(),
    }));
    let resp = EchoModelProvider.send_request(&req).await.unwrap();
    assert_eq!(resp.content, "22 degrees");
}

#[tokio::test]
async fn test_error() {
    let req = ModelRequest::default();
    let err = EchoModelProvider.send_request(&req).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidResponse);
    assert_eq!(err.to_string(), "echo model failed: invalid response");
}
