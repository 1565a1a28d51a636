//! The feed store: an owned, shareable container for the client-side feed.
//!
//! One store is created per session or view and handed to whatever renders
//! the feed. Clones are cheap handles onto the same state. Subscribers get a
//! [`watch::Receiver`] that wakes only when the feed actually changes.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::feed::intent::FeedIntent;
use crate::feed::ledger::{OperationId, RollbackLedger};
use crate::feed::reducer::FeedReducer;
use crate::feed::state::FeedState;
use crate::model::{FieldValue, Post, PostField, PostId, PostPatch, PostView, UserId};
use crate::mvi::Reducer;

#[derive(Clone)]
pub struct FeedStore {
    shared: Arc<Shared>,
}

struct Shared {
    // Lock order: ledger first, then the state channel.
    ledger: Mutex<RollbackLedger>,
    state: watch::Sender<FeedState>,
    next_operation: AtomicU64,
}

impl Default for FeedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedStore {
    /// An empty store with an anonymous viewer.
    pub fn new() -> Self {
        Self::with_viewer(None)
    }

    pub fn with_viewer(viewer: Option<UserId>) -> Self {
        let (state, _) = watch::channel(FeedState::for_viewer(viewer));
        Self {
            shared: Arc::new(Shared {
                ledger: Mutex::new(RollbackLedger::default()),
                state,
                next_operation: AtomicU64::new(0),
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.shared.state.subscribe()
    }

    /// A copy of the current feed.
    pub fn snapshot(&self) -> FeedState {
        self.shared.state.borrow().clone()
    }

    pub fn posts(&self) -> Vec<PostView> {
        self.shared.state.borrow().posts().to_vec()
    }

    pub fn get(&self, id: &PostId) -> Option<PostView> {
        self.shared.state.borrow().get(id).cloned()
    }

    pub fn viewer(&self) -> Option<UserId> {
        self.shared.state.borrow().viewer().cloned()
    }

    pub fn len(&self) -> usize {
        self.shared.state.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.state.borrow().is_empty()
    }

    /// Optimistic operations started on this store that have not settled.
    pub fn pending_operations(&self) -> usize {
        self.shared.ledger.lock().open_operations()
    }

    /// Overwrite the whole feed. Operations still in flight keep running but
    /// no longer roll anything back when they settle.
    pub fn replace_all(&self, posts: Vec<Post>) {
        let mut ledger = self.shared.ledger.lock();
        ledger.clear();
        self.dispatch(FeedIntent::ReplaceAll(posts));
    }

    /// Prepend a post. An entry with the same id is replaced, and pending
    /// optimistic writes to it no longer roll anything back.
    pub fn insert(&self, post: Post) {
        let mut ledger = self.shared.ledger.lock();
        ledger.supersede_post(&post.id);
        self.dispatch(FeedIntent::Insert(post));
    }

    /// Drop a post. Unknown ids are ignored.
    pub fn remove(&self, id: &PostId) {
        let mut ledger = self.shared.ledger.lock();
        ledger.supersede_post(id);
        self.dispatch(FeedIntent::Remove(id.clone()));
    }

    /// Merge `patch` into a post. Unknown ids are ignored.
    ///
    /// The patched fields become the committed values: an optimistic
    /// operation still pending on the same fields will not roll them back.
    pub fn patch(&self, id: &PostId, patch: PostPatch) {
        let mut ledger = self.shared.ledger.lock();
        ledger.supersede(id, &patch);
        self.dispatch(FeedIntent::Patch {
            id: id.clone(),
            patch,
        });
    }

    /// Swap one post for another in place, e.g. a temporary optimistic post
    /// for the server's copy. Unknown ids are ignored.
    pub fn replace(&self, id: &PostId, post: Post) {
        let mut ledger = self.shared.ledger.lock();
        ledger.supersede_post(id);
        self.dispatch(FeedIntent::Replace {
            id: id.clone(),
            post,
        });
    }

    /// Rewrite one field of a post in place, everywhere it is held: the
    /// displayed value, the committed value and every write still in flight.
    ///
    /// Unlike [`patch`](Self::patch) nothing pending is superseded, so
    /// overlapping operations still roll back correctly. Used to swap a
    /// placeholder for the server's copy inside a list field.
    pub fn rewrite<F>(&self, id: &PostId, field: PostField, rewrite: F)
    where
        F: Fn(&mut FieldValue),
    {
        let mut ledger = self.shared.ledger.lock();
        ledger.rewrite(id, field, &rewrite);
        let current = self.shared.state.borrow().get(id).map(|view| view.post().field(field));
        let Some(mut value) = current else {
            return;
        };
        rewrite(&mut value);
        self.dispatch(FeedIntent::Patch {
            id: id.clone(),
            patch: PostPatch::new().set(value),
        });
    }

    pub fn set_viewer(&self, viewer: Option<UserId>) {
        let _ledger = self.shared.ledger.lock();
        self.dispatch(FeedIntent::SetViewer(viewer));
    }

    /// Apply `patch` to a post now, then run `operation`.
    ///
    /// The patch is visible as soon as this method returns, before the
    /// returned future is first polled. If the operation fails, or the future
    /// is dropped before it settles, the fields this call wrote are put back
    /// unless something wrote them since. The operation's result is returned
    /// unchanged.
    pub fn optimistic_update<F, Fut, T, E>(
        &self,
        id: &PostId,
        patch: PostPatch,
        operation: F,
    ) -> impl Future<Output = Result<T, E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let ticket = self.begin(|ledger, state, op| {
            if let Some(view) = state.get(id) {
                ledger.record_patch(op, view.post(), &patch);
            }
            FeedIntent::Patch {
                id: id.clone(),
                patch,
            }
        });
        settle(ticket, operation())
    }

    /// Prepend `post` now, then run `operation`; the post is taken out again
    /// if the operation fails.
    pub fn optimistic_add<F, Fut, T, E>(
        &self,
        post: Post,
        operation: F,
    ) -> impl Future<Output = Result<T, E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let ticket = self.begin(|ledger, state, op| {
            let displaced = state
                .position(&post.id)
                .map(|index| (index, state.posts()[index].post().clone()));
            ledger.record_insert(op, post.id.clone(), displaced);
            FeedIntent::Insert(post)
        });
        settle(ticket, operation())
    }

    /// Remove a post now, then run `operation`; the post is put back at its
    /// old position if the operation fails.
    pub fn optimistic_remove<F, Fut, T, E>(
        &self,
        id: &PostId,
        operation: F,
    ) -> impl Future<Output = Result<T, E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let ticket = self.begin(|ledger, state, op| {
            if let Some(index) = state.position(id) {
                ledger.record_remove(op, index, state.posts()[index].post().clone());
            }
            FeedIntent::Remove(id.clone())
        });
        settle(ticket, operation())
    }

    fn begin<P>(&self, prepare: P) -> Ticket
    where
        P: FnOnce(&mut RollbackLedger, &FeedState, OperationId) -> FeedIntent,
    {
        let op = OperationId(self.shared.next_operation.fetch_add(1, Ordering::Relaxed));
        let mut ledger = self.shared.ledger.lock();
        ledger.open(op);
        let intent = {
            let state = self.shared.state.borrow();
            prepare(&mut *ledger, &*state, op)
        };
        self.dispatch(intent);

        Ticket {
            store: self.clone(),
            op,
            settled: false,
        }
    }

    fn commit(&self, op: OperationId) {
        self.shared.ledger.lock().commit(op);
    }

    fn rollback(&self, op: OperationId) {
        let mut ledger = self.shared.ledger.lock();
        let intents = {
            let state = self.shared.state.borrow();
            ledger.rollback(op, |id| state.contains(id))
        };
        for intent in intents {
            self.dispatch(intent);
        }
    }

    /// Run one intent through the reducer; subscribers are notified only if
    /// the state changed. Callers hold the ledger lock.
    fn dispatch(&self, intent: FeedIntent) -> bool {
        self.shared.state.send_if_modified(|state| {
            let next = FeedReducer::reduce(state.clone(), intent);
            if next == *state {
                return false;
            }
            *state = next;
            true
        })
    }
}

/// Settles one optimistic operation exactly once. Dropping an unsettled
/// ticket counts as failure.
struct Ticket {
    store: FeedStore,
    op: OperationId,
    settled: bool,
}

impl Ticket {
    fn commit(mut self) {
        self.settled = true;
        self.store.commit(self.op);
    }

    fn rollback(mut self) {
        self.settled = true;
        self.store.rollback(self.op);
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        if !self.settled {
            self.store.rollback(self.op);
        }
    }
}

async fn settle<Fut, T, E>(ticket: Ticket, operation: Fut) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>>,
{
    match operation.await {
        Ok(output) => {
            ticket.commit();
            Ok(output)
        }
        Err(err) => {
            ticket.rollback();
            Err(err)
        }
    }
}
