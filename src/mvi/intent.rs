//! Base trait for intents.

/// Marker trait for intent objects.
///
/// Intents represent user gestures (tap like, submit comment), local
/// bookkeeping (restore a removed post) and data arriving from the server
/// (a freshly fetched feed).
pub trait Intent: Send + 'static {}
