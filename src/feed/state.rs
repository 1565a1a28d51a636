use crate::model::{PostId, PostView, UserId};
use crate::mvi::UiState;

/// The client-visible feed: the viewer and their ordered post views.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedState {
    pub(super) viewer: Option<UserId>,
    pub(super) posts: Vec<PostView>,
}

impl UiState for FeedState {}

impl FeedState {
    /// An empty feed seen by `viewer`.
    pub fn for_viewer(viewer: Option<UserId>) -> Self {
        Self {
            viewer,
            posts: Vec::new(),
        }
    }

    pub fn viewer(&self) -> Option<&UserId> {
        self.viewer.as_ref()
    }

    pub fn posts(&self) -> &[PostView] {
        &self.posts
    }

    pub fn get(&self, id: &PostId) -> Option<&PostView> {
        self.posts.iter().find(|view| view.id() == id)
    }

    pub fn position(&self, id: &PostId) -> Option<usize> {
        self.posts.iter().position(|view| view.id() == id)
    }

    pub fn contains(&self, id: &PostId) -> bool {
        self.position(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &PostId> {
        self.posts.iter().map(PostView::id)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
