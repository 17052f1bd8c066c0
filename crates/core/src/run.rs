mod config;
mod error;
#[cfg(test)]
mod tests;

use chatline_model::{ModelMessage, ModelRequest, ToolCallResult};
use serde_json::Value;
use tokio::runtime::Builder as RuntimeBuilder;
use tracing::{Instrument, Span};

use crate::agent::Agent;
use crate::context::RunContext;
use crate::conversation::Turn;
pub use config::{DEFAULT_MAX_TURNS, RunConfig};
pub use error::RunError;

/// Runs agents.
pub struct Runner;

impl Runner {
    /// Runs `agent` on the given history until the model produces a final
    /// answer.
    ///
    /// Each round trip sends the agent instructions, the history and the
    /// tool calls made so far in this run. When the model asks for tools,
    /// they are executed in order with `context` and their outputs are
    /// sent back. The run ends with the first response that asks for no
    /// tool, or fails after [`RunConfig::max_turns`] round trips.
    ///
    /// A tool that fails or gets malformed arguments does not fail the run;
    /// the error text is returned to the model as the tool output. A call
    /// to a tool the agent doesn't have does.
    pub async fn run<C: Send + Sync + 'static>(
        agent: &Agent<C>,
        input: &[Turn],
        config: &RunConfig,
        context: C,
    ) -> Result<RunResult, RunError> {
        let span = if config.tracing_disabled() {
            Span::none()
        } else {
            info_span!("agent run", agent = agent.name())
        };
        drive(agent, input, config, RunContext::new(context))
            .instrument(span)
            .await
    }

    /// Same as [`Runner::run`], but blocks the calling thread until the run
    /// completes.
    ///
    /// This creates a current-thread runtime for the run, so it must not be
    /// called from within an async context.
    pub fn run_sync<C: Send + Sync + 'static>(
        agent: &Agent<C>,
        input: &[Turn],
        config: &RunConfig,
        context: C,
    ) -> Result<RunResult, RunError> {
        let runtime = RuntimeBuilder::new_current_thread()
            .enable_all()
            .build()
            .map_err(RunError::Runtime)?;
        runtime.block_on(Self::run(agent, input, config, context))
    }
}

/// The outcome of a successful run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunResult {
    /// The text of the last model response.
    pub final_output: String,
    /// Every tool call made during the run, in order.
    pub tool_calls: Vec<ToolCallRecord>,
    /// The number of model round trips used.
    pub turns: usize,
}

/// Record of a tool call made during a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolCallRecord {
    /// The id the model gave the call.
    pub id: String,
    /// Name of the tool called.
    pub name: String,
    /// Arguments passed to the tool.
    pub arguments: Value,
    /// What was sent back to the model.
    pub output: String,
}

async fn drive<C: 'static>(
    agent: &Agent<C>,
    input: &[Turn],
    config: &RunConfig,
    context: RunContext<C>,
) -> Result<RunResult, RunError> {
    let model = config
        .model()
        .or_else(|| agent.model())
        .ok_or(RunError::ModelNotConfigured)?;

    let mut messages = Vec::with_capacity(input.len() + 1);
    if !agent.instructions().is_empty() {
        messages.push(ModelMessage::System(agent.instructions().to_owned()));
    }
    messages.extend(input.iter().map(Turn::to_model_message));
    let mut request = ModelRequest {
        messages,
        tools: agent.tools().definitions(),
    };
    let mut tool_calls = Vec::new();

    for turn in 1..=config.max_turns() {
        debug!(turn, messages = request.messages.len(), "sending model request");
        let response = model
            .send_request(&request)
            .await
            .map_err(RunError::Model)?;

        if !response.wants_tools() {
            debug!(turn, "got final output");
            return Ok(RunResult {
                final_output: response.content,
                tool_calls,
                turns: turn,
            });
        }

        // Keep the provider's own message when it has one, so the tool call
        // ids survive the round trip.
        let assistant_msg = match response.opaque {
            Some(opaque) => ModelMessage::Opaque(opaque),
            None => ModelMessage::Assistant(response.content),
        };
        request.messages.push(assistant_msg);

        for call in response.tool_calls {
            let Some(fut) = agent.tools().call(&call, context.clone()) else {
                return Err(RunError::UnknownTool(call.name));
            };
            let output = match fut.await {
                Ok(output) => output,
                Err(err) => {
                    warn!("tool `{}` failed: {err}", call.name);
                    format!("Tool error: {err}")
                }
            };
            debug!(tool = %call.name, "tool call finished");
            request.messages.push(ModelMessage::Tool(ToolCallResult {
                id: call.id.clone(),
                content: output.clone(),
            }));
            let record = ToolCallRecord {
                id: call.id,
                name: call.name,
                arguments: call.arguments,
                output,
            };
            config.notify_tool_call(&record);
            tool_calls.push(record);
        }
    }

    Err(RunError::MaxTurnsExceeded(config.max_turns()))
}
