//! Rollback bookkeeping for in-flight optimistic operations.
//!
//! Every `(post, field)` touched by an unsettled operation keeps the last
//! committed value (`base`) and a stack of pending writes in the order they
//! were applied. The feed always displays the top of the stack, or the base
//! when the stack is empty. Settling an operation only ever touches the
//! entries that operation pushed, so overlapping operations cannot clobber
//! each other's fields.
//!
//! While a post is out of the feed because an optimistic remove (or an
//! optimistic add of the same id) may still put it back, its entries are
//! parked next to the saved copy. Settling a parked write updates that copy
//! instead of the feed, so the post comes back exactly as it should look.

use std::collections::{HashMap, HashSet};

use crate::feed::intent::FeedIntent;
use crate::model::{FieldValue, Post, PostField, PostId, PostPatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct OperationId(pub(crate) u64);

#[derive(Debug)]
struct FieldWrites {
    base: FieldValue,
    pending: Vec<(OperationId, FieldValue)>,
}

impl FieldWrites {
    fn holds(&self, op: OperationId) -> bool {
        self.pending.iter().any(|(id, _)| *id == op)
    }

    fn displayed(&self) -> FieldValue {
        self.pending
            .last()
            .map(|(_, value)| value.clone())
            .unwrap_or_else(|| self.base.clone())
    }

    /// Drop `op`'s write. Returns the value to show if it was on top.
    fn unwind(&mut self, op: OperationId) -> Option<FieldValue> {
        let index = self.pending.iter().position(|(id, _)| *id == op)?;
        let was_displayed = index + 1 == self.pending.len();
        self.pending.remove(index);
        was_displayed.then(|| self.displayed())
    }

    /// `op`'s write becomes the base; writes pushed before it are discarded.
    fn settle(&mut self, op: OperationId) {
        let Some(index) = self.pending.iter().position(|(id, _)| *id == op) else {
            return;
        };
        if let Some((_, value)) = self.pending.drain(..=index).next_back() {
            self.base = value;
        }
    }

    fn rewrite(&mut self, rewrite: &dyn Fn(&mut FieldValue)) {
        rewrite(&mut self.base);
        for (_, value) in &mut self.pending {
            rewrite(value);
        }
    }
}

#[derive(Debug)]
struct Removal {
    index: usize,
    post: Post,
    parked: HashMap<PostField, FieldWrites>,
}

impl Removal {
    fn new(index: usize, post: Post) -> Self {
        Self {
            index,
            post,
            parked: HashMap::new(),
        }
    }
}

enum Located<'a> {
    Live(&'a mut FieldWrites),
    Parked {
        writes: &'a mut FieldWrites,
        post: &'a mut Post,
    },
}

#[derive(Debug, Default)]
pub(crate) struct RollbackLedger {
    open: HashSet<OperationId>,
    fields: HashMap<(PostId, PostField), FieldWrites>,
    touched: HashMap<OperationId, Vec<(PostId, PostField)>>,
    inserted: HashMap<OperationId, (PostId, Option<Removal>)>,
    removed: HashMap<OperationId, Removal>,
}

impl RollbackLedger {
    pub(crate) fn open(&mut self, op: OperationId) {
        self.open.insert(op);
    }

    /// Number of operations that have started and not yet settled.
    pub(crate) fn open_operations(&self) -> usize {
        self.open.len()
    }

    /// Remember the writes `patch` is about to make to `post`.
    pub(crate) fn record_patch(&mut self, op: OperationId, post: &Post, patch: &PostPatch) {
        let keys = self.touched.entry(op).or_default();
        for value in patch.values() {
            let key = (post.id.clone(), value.field());
            self.fields
                .entry(key.clone())
                .or_insert_with(|| FieldWrites {
                    base: post.field(key.1),
                    pending: Vec::new(),
                })
                .pending
                .push((op, value.clone()));
            keys.push(key);
        }
    }

    /// Remember an insertion. If the id was already present, the entry it
    /// displaces is kept, with its pending writes, until `op` settles.
    pub(crate) fn record_insert(
        &mut self,
        op: OperationId,
        id: PostId,
        displaced: Option<(usize, Post)>,
    ) {
        let displaced = displaced.map(|(index, post)| self.park(index, post));
        self.supersede_post(&id);
        self.inserted.insert(op, (id, displaced));
    }

    pub(crate) fn record_remove(&mut self, op: OperationId, index: usize, post: Post) {
        let removal = self.park(index, post);
        self.removed.insert(op, removal);
    }

    /// A direct write to these fields is authoritative: pending writes to
    /// them no longer have anything to roll back to.
    pub(crate) fn supersede(&mut self, id: &PostId, patch: &PostPatch) {
        for field in patch.fields() {
            self.fields.remove(&(id.clone(), field));
        }
    }

    /// Same as [`supersede`](Self::supersede) for every field of the post.
    pub(crate) fn supersede_post(&mut self, id: &PostId) {
        self.fields.retain(|(post_id, _), _| post_id != id);
    }

    /// Apply `rewrite` to every copy of one field the ledger holds: the
    /// committed value, each pending write, and saved copies of the post.
    pub(crate) fn rewrite(&mut self, id: &PostId, field: PostField, rewrite: &dyn Fn(&mut FieldValue)) {
        if let Some(writes) = self.fields.get_mut(&(id.clone(), field)) {
            writes.rewrite(rewrite);
        }
        for removal in self.removals_mut().filter(|r| &r.post.id == id) {
            if let Some(writes) = removal.parked.get_mut(&field) {
                writes.rewrite(rewrite);
            }
            let mut value = removal.post.field(field);
            rewrite(&mut value);
            removal.post.set_field(value);
        }
    }

    /// Forget everything. Operations still in flight settle as no-ops.
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    /// Settle `op` as successful. Its writes become the committed values and
    /// writes pushed before it are discarded.
    pub(crate) fn commit(&mut self, op: OperationId) {
        self.open.remove(&op);
        self.inserted.remove(&op);
        self.removed.remove(&op);

        for key in self.touched.remove(&op).unwrap_or_default() {
            match self.locate(&key, op) {
                Some(Located::Live(writes)) | Some(Located::Parked { writes, .. }) => {
                    writes.settle(op)
                }
                None => {}
            }
        }
        self.prune();
    }

    /// Settle `op` as failed and return the intents that undo its visible
    /// effect. `is_present` reports whether an id is currently in the feed.
    pub(crate) fn rollback(
        &mut self,
        op: OperationId,
        is_present: impl Fn(&PostId) -> bool,
    ) -> Vec<FeedIntent> {
        self.open.remove(&op);
        let mut intents = Vec::new();

        if let Some((id, displaced)) = self.inserted.remove(&op) {
            self.supersede_post(&id);
            intents.push(FeedIntent::Remove(id));
            if let Some(removal) = displaced {
                intents.push(self.unpark(removal));
            }
        }

        if let Some(removal) = self.removed.remove(&op) {
            // Someone put the id back meanwhile; that copy wins.
            if !is_present(&removal.post.id) {
                intents.push(self.unpark(removal));
            }
        }

        let mut restores: Vec<(PostId, PostPatch)> = Vec::new();
        for key in self.touched.remove(&op).unwrap_or_default() {
            match self.locate(&key, op) {
                Some(Located::Live(writes)) => {
                    if let Some(value) = writes.unwind(op) {
                        let (post_id, _) = &key;
                        match restores.iter_mut().find(|(id, _)| id == post_id) {
                            Some((_, patch)) => *patch = std::mem::take(patch).set(value),
                            None => restores.push((post_id.clone(), PostPatch::new().set(value))),
                        }
                    }
                }
                Some(Located::Parked { writes, post }) => {
                    if let Some(value) = writes.unwind(op) {
                        post.set_field(value);
                    }
                }
                None => {}
            }
        }
        self.prune();

        intents.extend(
            restores
                .into_iter()
                .map(|(id, patch)| FeedIntent::Patch { id, patch }),
        );
        intents
    }

    /// Take a post's live entries along with its saved copy.
    fn park(&mut self, index: usize, post: Post) -> Removal {
        let mut removal = Removal::new(index, post);
        let keys: Vec<_> = self
            .fields
            .keys()
            .filter(|(post_id, _)| post_id == &removal.post.id)
            .cloned()
            .collect();
        for key in keys {
            if let Some(writes) = self.fields.remove(&key) {
                removal.parked.insert(key.1, writes);
            }
        }
        removal
    }

    /// Bring a saved post back: its parked entries become live again.
    fn unpark(&mut self, removal: Removal) -> FeedIntent {
        let Removal {
            index,
            post,
            parked,
        } = removal;
        self.supersede_post(&post.id);
        for (field, writes) in parked {
            self.fields.insert((post.id.clone(), field), writes);
        }
        FeedIntent::Restore { index, post }
    }

    /// Find the entry holding `op`'s write to `key`, live or parked.
    fn locate(&mut self, key: &(PostId, PostField), op: OperationId) -> Option<Located<'_>> {
        if self.fields.get(key).is_some_and(|writes| writes.holds(op)) {
            return self.fields.get_mut(key).map(Located::Live);
        }
        let (id, field) = key;
        self.removals_mut()
            .filter(|removal| &removal.post.id == id)
            .find_map(|removal| {
                let Removal { post, parked, .. } = removal;
                let writes = parked.get_mut(field).filter(|writes| writes.holds(op))?;
                Some(Located::Parked { writes, post })
            })
    }

    fn removals_mut(&mut self) -> impl Iterator<Item = &mut Removal> {
        self.removed.values_mut().chain(
            self.inserted
                .values_mut()
                .filter_map(|(_, displaced)| displaced.as_mut()),
        )
    }

    /// Entries with nothing pending carry no information beyond what is
    /// displayed.
    fn prune(&mut self) {
        self.fields.retain(|_, writes| !writes.pending.is_empty());
        for removal in self.removals_mut() {
            removal.parked.retain(|_, writes| !writes.pending.is_empty());
        }
    }
}
