use std::collections::HashMap;
use std::fmt::{self, Display};

use crate::config::Settings;
use crate::session::{Session, SessionBuilder, TurnOutcome};
use crate::ui::{ChatUi, STARTERS, Starter};

/// Identifies a session in a [`ChatHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

type SessionFactory = Box<dyn Fn() -> SessionBuilder + Send + Sync>;

/// Keeps one [`Session`] per connected chat.
///
/// Sessions are independent: each has its own agent and transcript, and a
/// message only ever reaches the session it was sent to.
pub struct ChatHost {
    factory: SessionFactory,
    sessions: HashMap<SessionId, Session>,
    next_id: u64,
}

impl ChatHost {
    /// Creates a host that builds sessions with `factory`.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> SessionBuilder + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            sessions: HashMap::new(),
            next_id: 1,
        }
    }

    /// Creates a host whose sessions talk to the endpoint in `settings`.
    pub fn from_settings(settings: Settings) -> Self {
        Self::new(move || SessionBuilder::from_settings(&settings))
    }

    /// Returns the prompts to offer before the first message.
    #[inline]
    pub fn starters(&self) -> &'static [Starter] {
        &STARTERS
    }

    /// Opens a new session and shows its greeting.
    pub async fn start_session(&mut self, ui: &dyn ChatUi) -> SessionId {
        let id = SessionId(self.next_id);
        self.next_id += 1;

        let session = (self.factory)().build();
        session.start(ui).await;
        self.sessions.insert(id, session);

        info!("{id} started");
        id
    }

    /// Routes a user message to session `id`.
    ///
    /// Returns `None` if there is no such session.
    pub async fn handle_message(
        &mut self,
        id: SessionId,
        ui: &dyn ChatUi,
        message: &str,
    ) -> Option<TurnOutcome> {
        let Some(session) = self.sessions.get_mut(&id) else {
            warn!("message for unknown {id}");
            return None;
        };
        Some(session.handle_message(ui, message).await)
    }

    /// Closes session `id`, dropping its transcript.
    pub fn end_session(&mut self, id: SessionId) -> bool {
        let removed = self.sessions.remove(&id).is_some();
        if removed {
            info!("{id} ended");
        }
        removed
    }

    /// Returns session `id`.
    #[inline]
    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    /// Returns the number of open sessions.
    #[inline]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if no session is open.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
