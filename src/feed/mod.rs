//! Client feed state: the store, its reducer, and optimistic operations.

mod intent;
mod ledger;
mod reducer;
mod state;
mod store;

pub use intent::FeedIntent;
pub use reducer::FeedReducer;
pub use state::FeedState;
pub use store::FeedStore;
