//! Base trait for state objects.

/// Marker trait for state objects.
///
/// States are cloned to take snapshots, compared to detect changes (so
/// subscribers are only woken by real transitions), and default to an
/// empty value.
pub trait UiState: Clone + PartialEq + Default + Send + Sync + 'static {}
