use chatline_core::conversation::Transcript;
use chatline_core::{
    Agent, AgentBuilder, ModelClient, RunConfig, RunError, Runner,
    ToolCallRecord,
};
use chatline_model::ModelProvider;
use chatline_openai_model::OpenAIProvider;
use tokio::join;
use tokio::sync::mpsc;

use crate::config::Settings;
use crate::context::UserContext;
use crate::tools::*;
use crate::ui::{ChatUi, MessageId};

/// Name of the assistant agent.
pub const AGENT_NAME: &str = "Assistant";

/// Instructions given to the assistant.
pub const INSTRUCTIONS: &str = "You are a helpful assistant. You can answer \
questions about the weather and greet users. Use the tools provided to fetch \
weather information or greet the user based on their input.";

/// The first message of every session.
pub const GREETING: &str = "Hello! What can I help you with today?";

/// Shown while the model is working on an answer.
pub const PLACEHOLDER: &str = "Thinking...";

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    agent_builder: AgentBuilder<UserContext>,
}

impl SessionBuilder {
    /// Creates a session builder with a specified model provider.
    pub fn with_model_provider<M: ModelProvider + 'static>(
        provider: M,
    ) -> Self {
        Self::with_model(ModelClient::new(provider))
    }

    /// Creates a session builder with a specified model client.
    pub fn with_model(model: ModelClient) -> Self {
        let agent_builder = AgentBuilder::new(AGENT_NAME)
            .with_instructions(INSTRUCTIONS)
            .with_model(model);
        Self { agent_builder }
    }

    /// Creates a session builder talking to the endpoint in `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_model_provider(OpenAIProvider::new(settings.openai_config()))
    }

    /// Builds a new session.
    pub fn build(self) -> Session {
        let agent = self
            .agent_builder
            .with_tool(WeatherTool::new())
            .with_tool(GreetTool::new())
            .build();

        Session {
            agent,
            config: RunConfig::new().with_tracing_disabled(true),
            transcript: Transcript::new(),
        }
    }
}

/// How a message was answered.
#[derive(Debug)]
pub enum TurnOutcome {
    /// The model answered with the given text.
    Replied(String),
    /// The run failed; the user turn stays in the transcript.
    Failed(RunError),
}

/// A chat session, like a window that displays messages and has a input box.
///
/// The session owns the agent, the run configuration and the transcript of
/// the conversation so far.
pub struct Session {
    agent: Agent<UserContext>,
    config: RunConfig,
    transcript: Transcript,
}

impl Session {
    /// Shows the greeting.
    pub async fn start(&self, ui: &dyn ChatUi) -> MessageId {
        ui.send(GREETING).await
    }

    /// Answers a user message.
    ///
    /// A placeholder is shown right away and replaced by the answer. Tool
    /// calls are shown as steps as soon as they finish, even if the run
    /// fails later. If the run fails, the error is shown as a separate
    /// message and the placeholder is left as it is.
    pub async fn handle_message(
        &mut self,
        ui: &dyn ChatUi,
        message: &str,
    ) -> TurnOutcome {
        let placeholder = ui.send(PLACEHOLDER).await;
        self.transcript.push_user(message);

        debug!("calling agent with transcript: {:?}", self.transcript);

        // The only sender lives in the per-run config, so the step stream
        // ends with the run.
        let (step_tx, mut step_rx) = mpsc::unbounded_channel::<ToolCallRecord>();
        let config = self.config.clone().on_tool_call(move |record| {
            step_tx.send(record.clone()).ok();
        });
        let run = async {
            let result = Runner::run(
                &self.agent,
                self.transcript.turns(),
                &config,
                UserContext::placeholder(),
            )
            .await;
            drop(config);
            result
        };
        let render_steps = async {
            while let Some(record) = step_rx.recv().await {
                ui.step(&record).await;
            }
        };
        let (result, ()) = join!(run, render_steps);

        match result {
            Ok(result) => {
                ui.update(placeholder, &result.final_output).await;
                self.transcript.push_assistant(result.final_output.clone());
                info!(
                    turns = result.turns,
                    tool_calls = result.tool_calls.len(),
                    "user: {message}; response: {}",
                    result.final_output
                );
                TurnOutcome::Replied(result.final_output)
            }
            Err(err) => {
                error!("agent run failed: {err}");
                ui.send(&format!("Error: {err}")).await;
                TurnOutcome::Failed(err)
            }
        }
    }

    /// Returns the conversation so far.
    #[inline]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Returns the assistant agent.
    #[inline]
    pub fn agent(&self) -> &Agent<UserContext> {
        &self.agent
    }

    /// Returns the configuration used for every run.
    #[inline]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }
}
