use crate::api::MediaUpload;
use crate::composer::state::ThreadDraft;
use crate::mvi::Intent;

#[derive(Debug, Clone)]
pub enum ComposerIntent {
    SetSubmitting(bool),
    SetUploadingFiles(bool),
    SetDrafts(Vec<ThreadDraft>),
    /// Append an empty draft to the thread.
    AddDraft,
    RemoveDraft(usize),
    UpdateContent { index: usize, content: String },
    AddMedia { index: usize, media: Vec<MediaUpload> },
    RemoveMedia { draft: usize, media: usize },
    /// Back to a single empty draft.
    Reset,
}

impl Intent for ComposerIntent {}
