use std::fmt::{self, Debug};
use std::pin::Pin;
use std::sync::Arc;

use chatline_model::{ModelProvider, ModelProviderError, ModelRequest, ModelResponse};
use tracing::Instrument;

type SendRequestResult = Result<ModelResponse, Box<dyn ModelProviderError>>;
type BoxedSendRequestFuture =
    Pin<Box<dyn Future<Output = SendRequestResult> + Send>>;
type HandlerFn = Arc<dyn Fn(&ModelRequest) -> BoxedSendRequestFuture + Send + Sync>;

/// A cheaply clonable, type-erased handle to a model provider.
///
/// Agents and run configurations hold a `ModelClient` instead of a concrete
/// provider type, so the same agent type works with any provider.
#[derive(Clone)]
pub struct ModelClient {
    handler_fn: HandlerFn,
}

impl ModelClient {
    /// Wraps a model provider.
    #[inline]
    pub fn new<P: ModelProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since `ModelClient` doesn't have a
        // generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |req: &ModelRequest| {
            trace!("got a request: {req:?}");
            let fut = provider.send_request(req);
            Box::pin(
                async move {
                    match fut.await {
                        Ok(resp) => {
                            trace!("got a response: {resp:?}");
                            Ok(resp)
                        }
                        Err(err) => {
                            error!("got an error: {err}");
                            Err(Box::new(err) as Box<dyn ModelProviderError>)
                        }
                    }
                }
                .instrument(trace_span!("model client req")),
            )
        });
        Self { handler_fn }
    }

    /// Sends a request and waits for the complete response.
    #[inline]
    pub async fn send_request(&self, req: &ModelRequest) -> SendRequestResult {
        (self.handler_fn)(req).await
    }
}

impl Debug for ModelClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelClient").finish_non_exhaustive()
    }
}
