//! The agent runner: agent definitions, typed tools, and the run loop that
//! drives a model until it produces a final answer.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod agent;
mod context;
pub mod conversation;
mod model_client;
mod run;
pub mod tool;

pub use agent::{Agent, AgentBuilder};
pub use context::RunContext;
pub use model_client::ModelClient;
pub use run::{
    DEFAULT_MAX_TURNS, RunConfig, RunError, RunResult, Runner, ToolCallRecord,
};
pub use tool::Tool;
