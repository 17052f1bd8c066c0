/// The per-message context handed to tools.
///
/// A fresh value is created for every inbound message and dropped when the
/// run ends.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserContext {
    /// Who is chatting.
    pub user_id: String,
    /// Reserved for tools that want to remember what they have seen during
    /// a run. Nothing reads it yet.
    pub seen_messages: Vec<String>,
}

impl UserContext {
    /// The identity used until callers are authenticated.
    pub const PLACEHOLDER_USER_ID: &'static str = "Ahmed";

    /// Creates a context for the given user.
    #[inline]
    pub fn new<S: Into<String>>(user_id: S) -> Self {
        Self {
            user_id: user_id.into(),
            seen_messages: Vec::new(),
        }
    }

    /// Creates a context for the placeholder user.
    #[inline]
    pub fn placeholder() -> Self {
        Self::new(Self::PLACEHOLDER_USER_ID)
    }
}
