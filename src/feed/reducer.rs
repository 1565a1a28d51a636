use crate::feed::intent::FeedIntent;
use crate::feed::state::FeedState;
use crate::model::PostView;
use crate::mvi::Reducer;

pub struct FeedReducer;

impl Reducer for FeedReducer {
    type State = FeedState;
    type Intent = FeedIntent;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        let viewer = state.viewer.clone();
        let viewer = viewer.as_ref();

        match intent {
            FeedIntent::ReplaceAll(posts) => {
                state.posts = posts
                    .into_iter()
                    .map(|post| PostView::derive(post, viewer))
                    .collect();
            }
            FeedIntent::Insert(post) => {
                state.posts.retain(|view| view.id() != &post.id);
                state.posts.insert(0, PostView::derive(post, viewer));
            }
            FeedIntent::Remove(id) => {
                state.posts.retain(|view| view.id() != &id);
            }
            FeedIntent::Patch { id, patch } => {
                if let Some(index) = state.position(&id) {
                    let mut post = state.posts[index].post().clone();
                    post.apply(&patch);
                    state.posts[index] = PostView::derive(post, viewer);
                }
            }
            FeedIntent::Replace { id, post } => {
                if let Some(index) = state.position(&id) {
                    let new_id = post.id.clone();
                    state.posts[index] = PostView::derive(post, viewer);
                    // Keep ids unique if the replacement already had an entry.
                    let mut current = 0;
                    state.posts.retain(|view| {
                        let keep = current == index || view.id() != &new_id;
                        current += 1;
                        keep
                    });
                }
            }
            FeedIntent::Restore { index, post } => {
                if !state.contains(&post.id) {
                    let index = index.min(state.posts.len());
                    state.posts.insert(index, PostView::derive(post, viewer));
                }
            }
            FeedIntent::SetViewer(new_viewer) => {
                state.posts = std::mem::take(&mut state.posts)
                    .into_iter()
                    .map(|view| PostView::derive(view.into_post(), new_viewer.as_ref()))
                    .collect();
                state.viewer = new_viewer;
            }
        }

        state
    }
}
