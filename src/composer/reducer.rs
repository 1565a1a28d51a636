use crate::composer::intent::ComposerIntent;
use crate::composer::state::{ComposerState, DraftId, ThreadDraft};
use crate::mvi::Reducer;

pub struct ComposerReducer;

impl Reducer for ComposerReducer {
    type State = ComposerState;
    type Intent = ComposerIntent;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            ComposerIntent::SetSubmitting(value) => state.submitting = value,
            ComposerIntent::SetUploadingFiles(value) => state.uploading_files = value,
            ComposerIntent::SetDrafts(drafts) => {
                let highest = drafts.iter().map(|d| d.id.0 + 1).max().unwrap_or(0);
                state.next_id = state.next_id.max(highest);
                state.drafts = drafts;
            }
            ComposerIntent::AddDraft => {
                state.drafts.push(ThreadDraft::empty(DraftId(state.next_id)));
                state.next_id += 1;
            }
            ComposerIntent::RemoveDraft(index) => {
                if index < state.drafts.len() {
                    state.drafts.remove(index);
                }
            }
            ComposerIntent::UpdateContent { index, content } => {
                if let Some(draft) = state.drafts.get_mut(index) {
                    draft.content = content;
                }
            }
            ComposerIntent::AddMedia { index, media } => {
                if let Some(draft) = state.drafts.get_mut(index) {
                    draft.media.extend(media);
                }
            }
            ComposerIntent::RemoveMedia { draft, media } => {
                if let Some(draft) = state.drafts.get_mut(draft) {
                    if media < draft.media.len() {
                        draft.media.remove(media);
                    }
                }
            }
            ComposerIntent::Reset => state = ComposerState::default(),
        }

        state
    }
}
