use std::fmt::{self, Debug};
use std::sync::Arc;

use super::ToolCallRecord;
use crate::model_client::ModelClient;

/// How many model round trips a run may use by default.
pub const DEFAULT_MAX_TURNS: usize = 10;

type ToolCallObserver = Arc<dyn Fn(&ToolCallRecord) + Send + Sync>;

/// Settings for a run that are independent of the agent.
#[derive(Clone)]
pub struct RunConfig {
    model: Option<ModelClient>,
    tracing_disabled: bool,
    max_turns: usize,
    on_tool_call: Option<ToolCallObserver>,
}

impl RunConfig {
    /// Creates the default configuration: no model override, tracing
    /// enabled, [`DEFAULT_MAX_TURNS`] round trips.
    #[inline]
    pub fn new() -> Self {
        Self {
            model: None,
            tracing_disabled: false,
            max_turns: DEFAULT_MAX_TURNS,
            on_tool_call: None,
        }
    }

    /// Uses `model` for the run instead of the agent's own model.
    #[inline]
    pub fn with_model(mut self, model: ModelClient) -> Self {
        self.model = Some(model);
        self
    }

    /// Disables the `agent run` span.
    #[inline]
    pub fn with_tracing_disabled(mut self, disabled: bool) -> Self {
        self.tracing_disabled = disabled;
        self
    }

    /// Limits the number of model round trips. Values below 1 are raised
    /// to 1.
    #[inline]
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns.max(1);
        self
    }

    /// Attaches a callback invoked after each tool call, as soon as it
    /// finishes. Calls made before a run fails are reported too.
    #[inline]
    pub fn on_tool_call(
        mut self,
        on_tool_call: impl Fn(&ToolCallRecord) + Send + Sync + 'static,
    ) -> Self {
        self.on_tool_call = Some(Arc::new(on_tool_call));
        self
    }

    /// Returns the model override, if any.
    #[inline]
    pub fn model(&self) -> Option<&ModelClient> {
        self.model.as_ref()
    }

    /// Returns `true` if the run span is disabled.
    #[inline]
    pub fn tracing_disabled(&self) -> bool {
        self.tracing_disabled
    }

    /// Returns the maximum number of model round trips.
    #[inline]
    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    pub(crate) fn notify_tool_call(&self, record: &ToolCallRecord) {
        if let Some(on_tool_call) = &self.on_tool_call {
            on_tool_call(record);
        }
    }
}

impl Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("model", &self.model)
            .field("tracing_disabled", &self.tracing_disabled)
            .field("max_turns", &self.max_turns)
            .field("on_tool_call", &self.on_tool_call.is_some())
            .finish()
    }
}

impl Default for RunConfig {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
