//! Mirror service: sync from upstream, lookups, and cascading deletes.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{Comment, Filter, Post, User, UserWithPosts};
use crate::error::MirrorError;
use crate::persistence::{Collection, StoreGateway};
use crate::upstream::UpstreamSource;

/// Number of records written by a sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Users inserted.
    pub users: u64,
    /// Posts inserted.
    pub posts: u64,
    /// Standalone comments inserted.
    pub comments: u64,
}

/// Records removed by a cascading user delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeSummary {
    /// Posts owned by the user.
    pub posts: u64,
    /// Comments on those posts.
    pub comments: u64,
}

/// Orchestration layer for every mirror operation.
///
/// Stateless coordinator: all persisted state lives behind the
/// [`StoreGateway`]; the [`UpstreamSource`] is only read by [`Self::sync`].
/// Operations span several collections without a transaction, so a
/// failure midway leaves earlier writes in place.
#[derive(Debug, Clone)]
pub struct MirrorService {
    store: Arc<StoreGateway>,
    upstream: Arc<dyn UpstreamSource>,
    sync_user_limit: usize,
}

impl MirrorService {
    /// Creates a new `MirrorService`.
    #[must_use]
    pub fn new(
        store: Arc<StoreGateway>,
        upstream: Arc<dyn UpstreamSource>,
        sync_user_limit: usize,
    ) -> Self {
        Self {
            store,
            upstream,
            sync_user_limit,
        }
    }

    /// Returns a reference to the inner [`StoreGateway`].
    #[must_use]
    pub fn store(&self) -> &Arc<StoreGateway> {
        &self.store
    }

    /// Replaces the store contents with a fresh upstream read.
    ///
    /// Fetches first and only then truncates, so an upstream failure leaves
    /// the store untouched. Keeps the first `sync_user_limit` users, embeds
    /// each post's comments, and stores every comment standalone as well.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Upstream`] if the fetch fails, or a store
    /// error if any write fails (earlier writes are not rolled back).
    pub async fn sync(&self) -> Result<SyncSummary, MirrorError> {
        let snapshot = self.upstream.fetch_all().await?;

        let users = self.store.collection::<User>().await?;
        let posts = self.store.collection::<Post>().await?;
        let comments = self.store.collection::<Comment>().await?;

        truncate(&users, &posts, &comments).await?;

        let kept_users: Vec<User> = snapshot
            .users
            .into_iter()
            .take(self.sync_user_limit)
            .collect();
        let users_inserted = users.insert_many(&kept_users).await?;

        let posts_with_comments = embed_comments(snapshot.posts, &snapshot.comments);
        let posts_inserted = posts.insert_many(&posts_with_comments).await?;

        let comments_inserted = comments.insert_many(&snapshot.comments).await?;

        let summary = SyncSummary {
            users: users_inserted,
            posts: posts_inserted,
            comments: comments_inserted,
        };
        tracing::info!(
            users = summary.users,
            posts = summary.posts,
            comments = summary.comments,
            "sync completed"
        );
        Ok(summary)
    }

    /// Deletes every user, post and comment.
    ///
    /// # Errors
    ///
    /// Returns a store error on failure.
    pub async fn clear_all(&self) -> Result<(), MirrorError> {
        let users = self.store.collection::<User>().await?;
        let posts = self.store.collection::<Post>().await?;
        let comments = self.store.collection::<Comment>().await?;

        truncate(&users, &posts, &comments).await?;
        tracing::info!("all collections cleared");
        Ok(())
    }

    /// Deletes a user, their posts, and the comments on those posts.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::UserNotFound`] if no user has `user_id`
    /// (nothing is deleted in that case), or a store error.
    pub async fn delete_user(&self, user_id: i64) -> Result<CascadeSummary, MirrorError> {
        let users = self.store.collection::<User>().await?;
        let posts = self.store.collection::<Post>().await?;
        let comments = self.store.collection::<Comment>().await?;

        if users.delete_one(&Filter::Eq("id", user_id)).await? == 0 {
            return Err(MirrorError::UserNotFound(user_id));
        }

        let owned_by_user = Filter::Eq("userId", user_id);
        let post_ids: Vec<i64> = posts
            .find(&owned_by_user)
            .await?
            .into_iter()
            .map(|post| post.id)
            .collect();

        let summary = CascadeSummary {
            posts: posts.delete_many(&owned_by_user).await?,
            comments: comments.delete_many(&Filter::In("postId", post_ids)).await?,
        };

        tracing::info!(
            user_id,
            posts = summary.posts,
            comments = summary.comments,
            "user deleted"
        );
        Ok(summary)
    }

    /// Returns a user together with every post whose `userId` matches.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::UserNotFound`] if no user has `user_id`, or
    /// a store error.
    pub async fn get_user_with_posts(&self, user_id: i64) -> Result<UserWithPosts, MirrorError> {
        let users = self.store.collection::<User>().await?;
        let posts = self.store.collection::<Post>().await?;

        let user = users
            .find_one(&Filter::Eq("id", user_id))
            .await?
            .ok_or(MirrorError::UserNotFound(user_id))?;
        let posts = posts.find(&Filter::Eq("userId", user_id)).await?;

        Ok(UserWithPosts { user, posts })
    }

    /// Inserts a user unless one with the same id already exists.
    ///
    /// The existence check and the insert are separate store calls, so two
    /// concurrent creates of the same id can both succeed.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::UserConflict`] if the id is taken, or a
    /// store error.
    pub async fn create_user(&self, user: User) -> Result<User, MirrorError> {
        let users = self.store.collection::<User>().await?;

        if users.find_one(&Filter::Eq("id", user.id)).await?.is_some() {
            return Err(MirrorError::UserConflict(user.id));
        }

        users.insert_one(&user).await?;
        tracing::info!(user_id = user.id, "user created");
        Ok(user)
    }
}

async fn truncate(
    users: &Collection<User>,
    posts: &Collection<Post>,
    comments: &Collection<Comment>,
) -> Result<(), MirrorError> {
    users.delete_many(&Filter::All).await?;
    posts.delete_many(&Filter::All).await?;
    comments.delete_many(&Filter::All).await?;
    Ok(())
}

/// Attaches to each post the comments whose `postId` equals its `id`,
/// keeping the comments' original order. Existing embedded comments are
/// replaced.
#[must_use]
pub fn embed_comments(posts: Vec<Post>, comments: &[Comment]) -> Vec<Post> {
    let mut by_post: HashMap<i64, Vec<&Comment>> = HashMap::new();
    for comment in comments {
        by_post.entry(comment.post_id).or_default().push(comment);
    }

    posts
        .into_iter()
        .map(|mut post| {
            post.comments = by_post
                .get(&post.id)
                .map(|matched| matched.iter().map(|c| (*c).clone()).collect())
                .unwrap_or_default();
            post
        })
        .collect()
}
