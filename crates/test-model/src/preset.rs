use chatline_model::{ErrorKind, ToolCallRequest};
use serde::{Deserialize, Serialize};

/// One scripted answer of the test model.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PresetResponse {
    /// Answer with plain text.
    Text {
        /// The assistant text.
        content: String,
    },
    /// Ask for one or more tool calls, with optional text alongside.
    ToolCalls {
        /// Text sent together with the tool calls, usually empty.
        #[serde(default)]
        content: String,
        /// The requested calls, in order.
        calls: Vec<ToolCallRequest>,
    },
    /// Fail the request.
    Failure {
        /// The error message.
        message: String,
        /// The kind reported by the error.
        #[serde(with = "error_kind")]
        kind: ErrorKind,
    },
}

impl PresetResponse {
    /// Creates a text answer.
    #[inline]
    pub fn text<S: Into<String>>(content: S) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// Creates an answer that requests the given tool calls.
    #[inline]
    pub fn tool_calls(calls: impl Into<Vec<ToolCallRequest>>) -> Self {
        Self::ToolCalls {
            content: String::new(),
            calls: calls.into(),
        }
    }

    /// Creates a failing answer.
    #[inline]
    pub fn failure<S: Into<String>>(message: S, kind: ErrorKind) -> Self {
        Self::Failure {
            message: message.into(),
            kind,
        }
    }
}

// `ErrorKind` lives in the model crate, which stays free of serde impls for
// it, so scripts spell kinds out as strings.
mod error_kind {
    use chatline_model::ErrorKind;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        kind: &ErrorKind,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match kind {
            ErrorKind::Authentication => "authentication",
            ErrorKind::RateLimitExceeded => "rate_limit_exceeded",
            ErrorKind::Moderated => "moderated",
            ErrorKind::InvalidResponse => "invalid_response",
            ErrorKind::Other => "other",
        })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<ErrorKind, D::Error> {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "authentication" => Ok(ErrorKind::Authentication),
            "rate_limit_exceeded" => Ok(ErrorKind::RateLimitExceeded),
            "moderated" => Ok(ErrorKind::Moderated),
            "invalid_response" => Ok(ErrorKind::InvalidResponse),
            "other" => Ok(ErrorKind::Other),
            _ => Err(D::Error::custom(format!("unknown error kind: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_script_from_json() {
        let script: Vec<PresetResponse> = serde_json::from_value(json!([
            {
                "type": "tool_calls",
                "calls": [{
                    "id": "call_0",
                    "name": "get_weather",
                    "arguments": { "location": "Paris" }
                }]
            },
            { "type": "text", "content": "It is 22 degrees C in Paris." },
            { "type": "failure", "message": "quota", "kind": "rate_limit_exceeded" }
        ]))
        .unwrap();

        assert_eq!(
            script,
            vec![
                PresetResponse::tool_calls([ToolCallRequest {
                    id: "call_0".to_owned(),
                    name: "get_weather".to_owned(),
                    arguments: json!({ "location": "Paris" }),
                }]),
                PresetResponse::text("It is 22 degrees C in Paris."),
                PresetResponse::failure("quota", ErrorKind::RateLimitExceeded),
            ]
        );
    }
}
