mod builder;

use std::fmt::{self, Debug};
use std::sync::Arc;

use crate::model_client::ModelClient;
use crate::tool::Registry;
pub use builder::AgentBuilder;

/// An agent definition: a name, the instructions given to the model, the
/// tools the model may call, and optionally the model to use.
///
/// An agent is immutable once built and cheap to clone. It holds no
/// conversation state; pass the history to [`crate::Runner::run`] instead.
pub struct Agent<C: 'static> {
    inner: Arc<AgentDef<C>>,
}

struct AgentDef<C: 'static> {
    name: String,
    instructions: String,
    tools: Registry<C>,
    model: Option<ModelClient>,
}

impl<C: 'static> Agent<C> {
    /// Creates a builder for an agent with the given name.
    #[inline]
    pub fn builder<S: Into<String>>(name: S) -> AgentBuilder<C> {
        AgentBuilder::new(name)
    }

    /// Returns the name of the agent.
    #[inline]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns the instructions sent as the system message.
    #[inline]
    pub fn instructions(&self) -> &str {
        &self.inner.instructions
    }

    /// Returns the tools of the agent.
    #[inline]
    pub fn tools(&self) -> &Registry<C> {
        &self.inner.tools
    }

    /// Returns the model bound to the agent, if any.
    #[inline]
    pub fn model(&self) -> Option<&ModelClient> {
        self.inner.model.as_ref()
    }

    fn from_builder(builder: AgentBuilder<C>) -> Self {
        let AgentBuilder {
            name,
            instructions,
            tools,
            model,
        } = builder;
        debug!("built agent `{name}` with tools: {tools:?}");
        Self {
            inner: Arc::new(AgentDef {
                name,
                instructions,
                tools,
                model,
            }),
        }
    }
}

impl<C: 'static> Clone for Agent<C> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: 'static> Debug for Agent<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.inner.name)
            .field("tools", &self.inner.tools)
            .field("has_model", &self.inner.model.is_some())
            .finish()
    }
}
