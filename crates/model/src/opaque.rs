use std::any::Any;
use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A message kept in a provider's own format.
///
/// The agent never looks inside it; it only stores it in the history and
/// hands it back on the next request, where the provider can downcast it
/// to its wire type. Two opaque messages are equal if their ids are equal.
pub struct OpaqueMessage(Arc<dyn OpaqueValue>);

impl OpaqueMessage {
    /// Wraps `value` under the given id.
    ///
    /// The id should be unique across a conversation.
    #[inline]
    pub fn new<I, T>(id: I, value: T) -> Self
    where
        I: Into<String>,
        T: Send + Sync + 'static,
    {
        Self(Arc::new(Tagged {
            id: id.into(),
            value,
        }))
    }

    /// Returns the id of this message.
    #[inline]
    pub fn id(&self) -> &str {
        self.0.id()
    }

    /// Returns the wrapped value if it is a `T`.
    #[inline]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref()
    }
}

impl Clone for OpaqueMessage {
    #[inline]
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl Debug for OpaqueMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OpaqueMessage").field(&self.id()).finish()
    }
}

impl PartialEq for OpaqueMessage {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for OpaqueMessage {}

impl Hash for OpaqueMessage {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

trait OpaqueValue: Send + Sync {
    fn id(&self) -> &str;
    fn as_any(&self) -> &dyn Any;
}

struct Tagged<T> {
    id: String,
    value: T,
}

impl<T: Send + Sync + 'static> OpaqueValue for Tagged<T> {
    fn id(&self) -> &str {
        &self.id
    }

    fn as_any(&self) -> &dyn Any {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct WireMessage {
        role: &'static str,
    }

    #[test]
    fn test_downcast() {
        let msg = OpaqueMessage::new("chatcmpl-1", WireMessage { role: "assistant" });
        assert_eq!(msg.id(), "chatcmpl-1");
        assert_eq!(msg.downcast_ref::<WireMessage>().unwrap().role, "assistant");
        assert!(msg.downcast_ref::<String>().is_none());
    }

    #[test]
    fn test_equality_by_id() {
        let a = OpaqueMessage::new("chatcmpl-1", 1_u32);
        let b = OpaqueMessage::new("chatcmpl-1", "different payload");
        let c = OpaqueMessage::new("chatcmpl-2", 1_u32);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.clone(), a);
    }
}
