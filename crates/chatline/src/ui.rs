use async_trait::async_trait;
use chatline_core::ToolCallRecord;

/// Identifies a message shown by a [`ChatUi`], so it can be edited later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u64);

/// A canned prompt offered before the user types anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Starter {
    /// Short label for the prompt.
    pub label: &'static str,
    /// The message sent when the prompt is picked.
    pub message: &'static str,
}

/// Prompts offered at the start of every session.
pub const STARTERS: [Starter; 2] = [
    Starter {
        label: "Greeting",
        message: "Hello! What can you help me with today?",
    },
    Starter {
        label: "Weather",
        message: "What is the weather like today?",
    },
];

/// The surface a session renders into.
///
/// Messages are always authored by the assistant; the user's own input is
/// echoed by the front-end itself.
#[async_trait]
pub trait ChatUi: Send + Sync {
    /// Shows a new message and returns its id.
    async fn send(&self, content: &str) -> MessageId;

    /// Replaces the content of a message shown before.
    async fn update(&self, id: MessageId, content: &str);

    /// Shows a tool call made while answering. Ignored by default.
    async fn step(&self, _record: &ToolCallRecord) {}
}
