//! Names of the collections held by the document store.

use std::fmt;

/// One of the three mirrored collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionName {
    /// `users` collection.
    Users,
    /// `posts` collection.
    Posts,
    /// `comments` collection.
    Comments,
}

impl CollectionName {
    /// Every collection, in the order the sync truncates them.
    pub const ALL: [Self; 3] = [Self::Users, Self::Posts, Self::Comments];

    /// Storage name of the collection (also the PostgreSQL table name).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Posts => "posts",
            Self::Comments => "comments",
        }
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
