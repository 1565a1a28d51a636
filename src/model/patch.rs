//! Partial updates to a post.

use std::collections::BTreeMap;

use super::post::{Comment, Favorite, Like, Media, Post, Visibility};

/// A canonical post field that can be patched.
///
/// Derived view flags are deliberately absent: they are recomputed from
/// these fields and never written directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PostField {
    Content,
    Visibility,
    Media,
    Likes,
    Comments,
    Favorites,
}

/// A value for one [`PostField`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Content(Option<String>),
    Visibility(Visibility),
    Media(Vec<Media>),
    Likes(Vec<Like>),
    Comments(Vec<Comment>),
    Favorites(Vec<Favorite>),
}

impl FieldValue {
    pub fn field(&self) -> PostField {
        match self {
            FieldValue::Content(_) => PostField::Content,
            FieldValue::Visibility(_) => PostField::Visibility,
            FieldValue::Media(_) => PostField::Media,
            FieldValue::Likes(_) => PostField::Likes,
            FieldValue::Comments(_) => PostField::Comments,
            FieldValue::Favorites(_) => PostField::Favorites,
        }
    }
}

impl Post {
    /// Read the current value of a field.
    pub fn field(&self, field: PostField) -> FieldValue {
        match field {
            PostField::Content => FieldValue::Content(self.content.clone()),
            PostField::Visibility => FieldValue::Visibility(self.visibility),
            PostField::Media => FieldValue::Media(self.media.clone()),
            PostField::Likes => FieldValue::Likes(self.likes.clone()),
            PostField::Comments => FieldValue::Comments(self.comments.clone()),
            PostField::Favorites => FieldValue::Favorites(self.favorites.clone()),
        }
    }

    /// Overwrite the field the value belongs to.
    pub fn set_field(&mut self, value: FieldValue) {
        match value {
            FieldValue::Content(content) => self.content = content,
            FieldValue::Visibility(visibility) => self.visibility = visibility,
            FieldValue::Media(media) => self.media = media,
            FieldValue::Likes(likes) => self.likes = likes,
            FieldValue::Comments(comments) => self.comments = comments,
            FieldValue::Favorites(favorites) => self.favorites = favorites,
        }
    }

    /// Merge a patch: every field it names is replaced, the rest is kept.
    pub fn apply(&mut self, patch: &PostPatch) {
        for value in patch.values() {
            self.set_field(value.clone());
        }
    }
}

/// A partial set of post fields, merged over a post by [`Post::apply`].
///
/// Built fluently:
///
/// ```
/// use bluefeed::model::{PostPatch, Visibility};
///
/// let patch = PostPatch::new()
///     .content(Some("edited".to_string()))
///     .visibility(Visibility::Followers);
/// assert_eq!(patch.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostPatch {
    fields: BTreeMap<PostField, FieldValue>,
}

impl PostPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any earlier value for the same field.
    pub fn set(mut self, value: FieldValue) -> Self {
        self.fields.insert(value.field(), value);
        self
    }

    pub fn content(self, content: Option<String>) -> Self {
        self.set(FieldValue::Content(content))
    }

    pub fn visibility(self, visibility: Visibility) -> Self {
        self.set(FieldValue::Visibility(visibility))
    }

    pub fn media(self, media: Vec<Media>) -> Self {
        self.set(FieldValue::Media(media))
    }

    pub fn likes(self, likes: Vec<Like>) -> Self {
        self.set(FieldValue::Likes(likes))
    }

    pub fn comments(self, comments: Vec<Comment>) -> Self {
        self.set(FieldValue::Comments(comments))
    }

    pub fn favorites(self, favorites: Vec<Favorite>) -> Self {
        self.set(FieldValue::Favorites(favorites))
    }

    pub fn get(&self, field: PostField) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = PostField> + '_ {
        self.fields.keys().copied()
    }

    pub fn values(&self) -> impl Iterator<Item = &FieldValue> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<FieldValue> for PostPatch {
    fn from_iter<I: IntoIterator<Item = FieldValue>>(iter: I) -> Self {
        iter.into_iter().fold(PostPatch::new(), PostPatch::set)
    }
}
