use chatline_model::ModelProvider;

use super::Agent;
use crate::model_client::ModelClient;
use crate::tool::{Registry, Tool};

/// [`Agent`] builder.
pub struct AgentBuilder<C: 'static> {
    pub(super) name: String,
    pub(super) instructions: String,
    pub(super) tools: Registry<C>,
    pub(super) model: Option<ModelClient>,
}

impl<C: 'static> AgentBuilder<C> {
    /// Creates a new builder for an agent with the given name.
    #[inline]
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            instructions: String::new(),
            tools: Registry::new(),
            model: None,
        }
    }

    /// Sets the instructions sent to the model as the system message.
    #[inline]
    pub fn with_instructions<S: Into<String>>(mut self, instructions: S) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Binds the agent to a model.
    #[inline]
    pub fn with_model(mut self, model: ModelClient) -> Self {
        self.model = Some(model);
        self
    }

    /// Binds the agent to a model provider.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(self, provider: P) -> Self {
        self.with_model(ModelClient::new(provider))
    }

    /// Registers a tool.
    #[inline]
    pub fn with_tool<T: Tool<C>>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    /// Builds the agent.
    #[inline]
    pub fn build(self) -> Agent<C> {
        Agent::from_builder(self)
    }
}
