//! Typed records for the three mirrored collections.
//!
//! Every record keeps the fields the service reasons about as typed
//! members and carries everything else the upstream sends in a flattened
//! passthrough map, so documents survive a decode/encode cycle intact.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::CollectionName;

/// Arbitrary JSON fields carried alongside the typed ones.
pub type Passthrough = serde_json::Map<String, serde_json::Value>;

/// A record type stored in exactly one named collection.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection holding records of this type.
    const COLLECTION: CollectionName;
}

/// A user account as served by the placeholder API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Externally assigned identifier, unique within the store.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Remaining upstream fields (`username`, `address`, `company`, ...).
    #[serde(flatten)]
    pub extra: Passthrough,
}

impl Record for User {
    const COLLECTION: CollectionName = CollectionName::Users;
}

/// A post with its comments embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Post identifier.
    pub id: i64,
    /// Owning user (not enforced).
    #[serde(rename = "userId")]
    pub user_id: i64,
    /// Embedded copy of the comments whose `postId` matches `id`.
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Remaining upstream fields (`title`, `body`, ...).
    #[serde(flatten)]
    pub extra: Passthrough,
}

impl Record for Post {
    const COLLECTION: CollectionName = CollectionName::Posts;
}

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment identifier.
    pub id: i64,
    /// Parent post (not enforced).
    #[serde(rename = "postId")]
    pub post_id: i64,
    /// Remaining upstream fields (`name`, `email`, `body`, ...).
    #[serde(flatten)]
    pub extra: Passthrough,
}

impl Record for Comment {
    const COLLECTION: CollectionName = CollectionName::Comments;
}

/// A user joined with the posts they own.
#[derive(Debug, Clone, PartialEq)]
pub struct UserWithPosts {
    /// The stored user.
    pub user: User,
    /// Posts whose `userId` equals the user's id, in insertion order.
    pub posts: Vec<Post>,
}

impl UserWithPosts {
    /// Renders the user object with an added `posts` array.
    ///
    /// A `posts` field already present on the user is overwritten.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if a record fails to serialize.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        let mut value = serde_json::to_value(&self.user)?;
        if let serde_json::Value::Object(map) = &mut value {
            map.insert("posts".to_string(), serde_json::to_value(&self.posts)?);
        }
        Ok(value)
    }
}
