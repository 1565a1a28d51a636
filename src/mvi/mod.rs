//! Model-View-Intent (MVI) primitives.
//!
//! Every piece of client state in this crate changes through a reducer:
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ subscribers
//!    ↑                                 │
//!    └─────────────────────────────────┘
//! ```
//!
//! - **State**: a self-contained, comparable value
//! - **Intent**: a user gesture or a settled server call
//! - **Reducer**: pure function from (State, Intent) to the next State

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
