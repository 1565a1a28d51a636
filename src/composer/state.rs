use crate::api::{CreatePostInput, MediaUpload};
use crate::model::{PostType, Visibility};
use crate::mvi::UiState;

/// Position-independent identity of a draft within one composer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DraftId(pub u32);

/// One post of a thread being composed. Media are already uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadDraft {
    pub id: DraftId,
    pub content: String,
    pub media: Vec<MediaUpload>,
}

impl ThreadDraft {
    pub fn empty(id: DraftId) -> Self {
        Self {
            id,
            content: String::new(),
            media: Vec::new(),
        }
    }

    /// True when there is nothing worth publishing.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty() && self.media.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComposerState {
    pub drafts: Vec<ThreadDraft>,
    pub submitting: bool,
    pub uploading_files: bool,
    pub(super) next_id: u32,
}

impl Default for ComposerState {
    fn default() -> Self {
        Self {
            drafts: vec![ThreadDraft::empty(DraftId(0))],
            submitting: false,
            uploading_files: false,
            next_id: 1,
        }
    }
}

impl UiState for ComposerState {}

impl ComposerState {
    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.uploading_files && self.drafts.iter().any(|d| !d.is_blank())
    }

    /// One create request per non-blank draft, in thread order.
    pub fn to_inputs(&self, visibility: Visibility) -> Vec<CreatePostInput> {
        self.drafts
            .iter()
            .filter(|draft| !draft.is_blank())
            .map(|draft| {
                let content = draft.content.trim();
                CreatePostInput {
                    content: (!content.is_empty()).then(|| content.to_string()),
                    post_type: if draft.media.is_empty() {
                        PostType::Text
                    } else {
                        PostType::Carousel
                    },
                    visibility,
                    media: draft.media.clone(),
                }
            })
            .collect()
    }
}
