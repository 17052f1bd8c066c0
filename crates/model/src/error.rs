use std::fmt::{self, Display, Formatter};

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The provider rejected the credentials.
    Authentication,
    /// The model provider is rate limited.
    RateLimitExceeded,
    /// The content is moderated.
    Moderated,
    /// The provider answered with something that could not be decoded.
    InvalidResponse,
    /// Any other errors, including transport failures.
    Other,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Authentication => "authentication failed",
            ErrorKind::RateLimitExceeded => "rate limit exceeded",
            ErrorKind::Moderated => "content moderated",
            ErrorKind::InvalidResponse => "invalid response",
            ErrorKind::Other => "model error",
        };
        f.write_str(s)
    }
}
