//! Conversation-related types.

use std::slice;

use chatline_model::ModelMessage;
use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person chatting.
    User,
    /// The agent.
    Assistant,
}

/// One message of a conversation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Turn {
    /// Who sent the message.
    pub role: Role,
    /// The message text.
    pub content: String,
}

impl Turn {
    /// Creates a user turn.
    #[inline]
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an assistant turn.
    #[inline]
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub(crate) fn to_model_message(&self) -> ModelMessage {
        match self.role {
            Role::User => ModelMessage::User(self.content.clone()),
            Role::Assistant => ModelMessage::Assistant(self.content.clone()),
        }
    }
}

/// An append-only list of turns, oldest first.
///
/// Turns can only be added at the end; there is no way to edit or remove
/// one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Creates an empty transcript.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn.
    #[inline]
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Appends a user turn.
    #[inline]
    pub fn push_user<S: Into<String>>(&mut self, content: S) {
        self.push(Turn::user(content));
    }

    /// Appends an assistant turn.
    #[inline]
    pub fn push_assistant<S: Into<String>>(&mut self, content: S) {
        self.push(Turn::assistant(content));
    }

    /// Returns all turns.
    #[inline]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the most recent turn.
    #[inline]
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Returns the number of turns.
    #[inline]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns `true` if no turn has been added yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Iterates over the turns, oldest first.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, Turn> {
        self.turns.iter()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_order() {
        let mut transcript = Transcript::new();
        assert!(transcript.is_empty());
        transcript.push_user("What's the weather in Lahore?");
        transcript.push_assistant("It is 22 degrees C in Lahore.");

        let roles: Vec<_> = transcript.iter().map(|t| t.role).collect();
        assert_eq!(roles, [Role::User, Role::Assistant]);
        assert_eq!(transcript.last().unwrap().content, "It is 22 degrees C in Lahore.");
    }

    #[test]
    fn test_serialize_as_role_content_pairs() {
        let mut transcript = Transcript::new();
        transcript.push_user("hi");
        let value = serde_json::to_value(&transcript).unwrap();
        assert_eq!(value, serde_json::json!([{ "role": "user", "content": "hi" }]));
    }
}
