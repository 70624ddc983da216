use tracing::{debug, error, info};

use crate::application::retry::{RetryPolicy, retry_on_lock_timeout};
use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{
    CreatePostRequest, Post, UpdatePostRequest, UploadedFile, parse_post_id,
};
use crate::infrastructure::uploads::UploadStore;

/// Listing never fails; a store error yields no posts and a `failure` message.
#[derive(Debug, Clone)]
pub(crate) struct ListPostsResult {
    pub(crate) posts: Vec<Post>,
    pub(crate) failure: Option<String>,
}

pub(crate) struct PostService<R: PostRepository> {
    repo: R,
    uploads: UploadStore,
    retry: RetryPolicy,
}

impl<R: PostRepository> PostService<R> {
    pub(crate) fn new(repo: R, uploads: UploadStore, retry: RetryPolicy) -> Self {
        Self {
            repo,
            uploads,
            retry,
        }
    }

    pub(crate) fn uploads(&self) -> &UploadStore {
        &self.uploads
    }

    pub(crate) async fn list_posts(&self) -> ListPostsResult {
        match self.repo.list_posts().await {
            Ok(posts) => ListPostsResult {
                posts,
                failure: None,
            },
            Err(err) => {
                error!(error = %err, "failed to list posts");
                ListPostsResult {
                    posts: Vec::new(),
                    failure: Some("failed to fetch posts".to_string()),
                }
            }
        }
    }

    pub(crate) async fn create_post(&self, req: CreatePostRequest) -> Result<Post, DomainError> {
        let cover_image = self.save_cover(req.cover_image).await?;

        let new_post = NewPost {
            title: req.title,
            content: req.content,
            cover_image,
        };
        let post = self.repo.create_post(new_post).await?;
        info!(post_id = post.id, "post created");
        Ok(post)
    }

    pub(crate) async fn get_post(&self, raw_id: &str) -> Result<Post, DomainError> {
        let id = parse_post_id(raw_id)?;
        self.find_existing(id).await
    }

    /// Checks existence, stores the replacement cover if any, then writes the
    /// patch atomically. The new cover file is kept even if the write fails.
    pub(crate) async fn update_post(
        &self,
        raw_id: &str,
        req: UpdatePostRequest,
    ) -> Result<Post, DomainError> {
        let id = parse_post_id(raw_id)?;
        let existing = self.find_existing(id).await?;

        let cover_image = self.save_cover(req.cover_image).await?;
        if let (Some(_), Some(previous)) = (&cover_image, &existing.cover_image) {
            debug!(
                post_id = id,
                previous = %self.uploads.path_for(previous).display(),
                "cover replaced, previous file kept"
            );
        }
        let patch = PostPatch {
            title: req.title,
            content: req.content,
            cover_image,
        };

        let post = retry_on_lock_timeout(self.retry, "update_post", || {
            self.repo.update_post(id, patch.clone())
        })
        .await?
        .ok_or_else(|| not_found(id))?;

        info!(post_id = id, "post updated");
        Ok(post)
    }

    /// The cover file of a deleted post stays on disk.
    pub(crate) async fn delete_post(&self, raw_id: &str) -> Result<(), DomainError> {
        let id = parse_post_id(raw_id)?;

        let deleted =
            retry_on_lock_timeout(self.retry, "delete_post", || self.repo.delete_post(id)).await?;
        if !deleted {
            return Err(not_found(id));
        }

        info!(post_id = id, "post deleted");
        Ok(())
    }

    async fn find_existing(&self, id: i64) -> Result<Post, DomainError> {
        self.repo.get_post(id).await?.ok_or_else(|| not_found(id))
    }

    async fn save_cover(&self, file: Option<UploadedFile>) -> Result<Option<String>, DomainError> {
        match file {
            Some(file) => Ok(Some(self.uploads.save(file).await?)),
            None => Ok(None),
        }
    }
}

fn not_found(id: i64) -> DomainError {
    DomainError::NotFound(format!("post id: {id}"))
}
