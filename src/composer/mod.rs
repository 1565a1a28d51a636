//! Thread composer: the drafts a user edits before publishing a thread.

mod intent;
mod reducer;
mod state;

pub use intent::ComposerIntent;
pub use reducer::ComposerReducer;
pub use state::{ComposerState, DraftId, ThreadDraft};
