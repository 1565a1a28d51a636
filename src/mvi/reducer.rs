//! Reducer trait.

use super::intent::Intent;
use super::state::UiState;

/// Folds intents into state.
///
/// Feed and composer state only change by running an intent through a
/// reducer. `reduce` reads nothing but its arguments, so replaying the same
/// intents from the same state always lands on the same state, and the store
/// can compare the result with the old value to decide whether to notify.
pub trait Reducer {
    type State: UiState;
    type Intent: Intent;

    /// Returns the state after `intent`. An intent that does not apply (an
    /// unknown id, say) returns `state` unchanged.
    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}
