//! A model provider for OpenAI-compatible chat-completions APIs.
//!
//! Any vendor that speaks the `/chat/completions` protocol works, including
//! Google's Gemini endpoint at
//! `https://generativelanguage.googleapis.com/v1beta/openai`.

#[macro_use]
extern crate tracing;

mod config;
mod proto;
mod response;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use chatline_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
};
use mime::Mime;
use reqwest::{Client, StatusCode, header};

pub use config::{DEFAULT_BASE_URL, DEFAULT_MODEL, OpenAIConfig, OpenAIConfigBuilder};
use proto::{ChatCompletion, ErrorBody};

/// Error type for [`OpenAIProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// OpenAI-compatible model provider.
#[derive(Clone, Debug)]
pub struct OpenAIProvider {
    client: Client,
    config: Arc<OpenAIConfig>,
}

impl OpenAIProvider {
    /// Creates a new `OpenAIProvider` with the given configuration.
    #[inline]
    pub fn new(config: OpenAIConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Creates a provider that sends requests through `client`.
    #[inline]
    pub fn with_client(client: Client, config: OpenAIConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }
}

impl ModelProvider for OpenAIProvider {
    type Error = Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static
    {
        let openai_req = proto::create_request(req, &self.config);
        let url = self.config.completions_url();
        debug!("POST {url} ({} messages)", req.messages.len());
        let resp_fut = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .header(header::ACCEPT, "application/json")
            .json(&openai_req)
            .send();

        async move {
            let resp = resp_fut
                .await
                .map_err(|err| Error::new(format!("{err}"), ErrorKind::Other))?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(status_error(status, &body));
            }

            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<Mime>().ok());
            let is_json = content_type
                .as_ref()
                .map(|m| m.subtype() == mime::JSON || m.suffix() == Some(mime::JSON))
                .unwrap_or(false);
            if !is_json {
                return Err(Error::new(
                    format!("unexpected content type: {content_type:?}"),
                    ErrorKind::InvalidResponse,
                ));
            }

            let body = resp
                .bytes()
                .await
                .map_err(|err| Error::new(format!("{err}"), ErrorKind::Other))?;
            let completion: ChatCompletion = serde_json::from_slice(&body)
                .map_err(|err| {
                    Error::new(
                        format!("failed to decode completion: {err}"),
                        ErrorKind::InvalidResponse,
                    )
                })?;
            trace!("got completion: {completion:?}");
            response::into_model_response(completion)
        }
    }
}

/// Maps a non-success status to an error, using the server's message when
/// the body carries one.
fn status_error(status: StatusCode, body: &str) -> Error {
    let kind = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ErrorKind::Authentication,
        StatusCode::TOO_MANY_REQUESTS => ErrorKind::RateLimitExceeded,
        _ => ErrorKind::Other,
    };
    // Some vendors wrap the error object in a one-element array.
    let detail = serde_json::from_str::<ErrorBody>(body)
        .or_else(|_| {
            serde_json::from_str::<Vec<ErrorBody>>(body).and_then(|mut v| {
                v.pop().ok_or_else(|| serde::de::Error::custom("empty error list"))
            })
        })
        .map(|b| b.error.message)
        .ok();
    let message = match detail {
        Some(detail) => format!("{status}: {detail}"),
        None => format!("{status}"),
    };
    Error::new(message, kind)
}
