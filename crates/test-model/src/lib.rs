//! A scripted in-process model for tests.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chatline_model::{
    ErrorKind, ModelFinishReason, ModelProvider, ModelProviderError,
    ModelRequest, ModelResponse, OpaqueMessage,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct Script {
    responses: VecDeque<PresetResponse>,
    requests: Vec<ModelRequest>,
    served: usize,
}

/// A local fake model for testing purpose.
///
/// Responses are served from a script in the order they were added, one
/// per request, regardless of what the request contains. Every received
/// request is recorded so tests can inspect what the agent sent. Clones
/// share the same script.
///
/// When the script is exhausted, requests fail with [`ErrorKind::Other`].
#[derive(Clone, Default)]
pub struct TestModelProvider {
    script: Arc<Mutex<Script>>,
    delay: Option<Duration>,
}

impl TestModelProvider {
    /// Creates a provider that serves `responses` in order.
    pub fn with_script(responses: impl IntoIterator<Item = PresetResponse>) -> Self {
        let provider = Self::default();
        for response in responses {
            provider.push_response(response);
        }
        provider
    }

    /// Appends a response to the script.
    #[inline]
    pub fn push_response(&self, response: PresetResponse) {
        self.lock().responses.push_back(response);
    }

    /// Delays every response by `duration`.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns the requests received so far.
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.lock().requests.clone()
    }

    /// Returns the number of responses not yet served.
    pub fn remaining(&self) -> usize {
        self.lock().responses.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static
    {
        let (preset, idx) = {
            let mut script = self.lock();
            script.requests.push(req.clone());
            let idx = script.served;
            script.served += 1;
            (script.responses.pop_front(), idx)
        };
        let delay = self.delay;

        async move {
            if let Some(delay) = delay {
                sleep(delay).await;
            }
            let Some(preset) = preset else {
                return Err(Error {
                    message: "script exhausted".to_owned(),
                    kind: ErrorKind::Other,
                });
            };
            into_response(preset, idx)
        }
    }
}

fn into_response(preset: PresetResponse, idx: usize) -> Result<ModelResponse, Error> {
    match preset {
        PresetResponse::Text { content } => Ok(ModelResponse::text(content)),
        PresetResponse::ToolCalls { content, calls } => Ok(ModelResponse {
            content,
            opaque: Some(OpaqueMessage::new(format!("test:{idx}"), calls.clone())),
            tool_calls: calls,
            finish_reason: Some(ModelFinishReason::ToolCalls),
        }),
        PresetResponse::Failure { message, kind } => Err(Error { message, kind }),
    }
}
