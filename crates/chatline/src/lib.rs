//! A small chat front-end for a hosted model, with two demo tools.
//!
//! Each chat session owns an agent, a run configuration and the transcript
//! of the conversation. Messages are forwarded to the model together with
//! the whole transcript, and the answer is rendered through a [`ChatUi`].
//! The crate ships a terminal front-end as the `chatline` binary.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod config;
mod context;
mod host;
mod session;
pub mod tools;
mod ui;

pub use config::{ConfigError, Settings};
pub use context::UserContext;
pub use host::{ChatHost, SessionId};
pub use session::{
    AGENT_NAME, GREETING, INSTRUCTIONS, PLACEHOLDER, Session, SessionBuilder,
    TurnOutcome,
};
pub use ui::{ChatUi, MessageId, STARTERS, Starter};

/// Re-exports of [`chatline_core`] crate.
pub mod core {
    pub use chatline_core::*;
}
