//! In-memory post store, used when no database is configured.
//!
//! Every mutation runs under a single write guard, so check-and-write is atomic.
//! Data is lost on restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::Post;

#[derive(Default)]
struct Store {
    last_id: i64,
    posts: BTreeMap<i64, Post>,
}

#[derive(Default)]
pub(crate) struct InMemoryPostRepository {
    store: RwLock<Store>,
}

impl InMemoryPostRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let mut store = self.store.write().await;
        store.last_id += 1;

        let now = Utc::now();
        let post = Post::new(
            store.last_id,
            input.title,
            input.content,
            input.cover_image,
            now,
            now,
        )?;
        store.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let store = self.store.read().await;
        Ok(store.posts.get(&id).cloned())
    }

    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DomainError> {
        let mut store = self.store.write().await;
        let Some(post) = store.posts.get_mut(&id) else {
            return Ok(None);
        };

        patch.apply_to(post);
        post.updated_at = Utc::now().max(post.created_at);
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let mut store = self.store.write().await;
        Ok(store.posts.remove(&id).is_some())
    }

    async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        let store = self.store.read().await;
        // Ids grow with insertion; timestamps may not.
        Ok(store.posts.values().rev().cloned().collect())
    }
}
