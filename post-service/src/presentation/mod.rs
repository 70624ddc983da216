use std::sync::Arc;

use crate::application::post_service::PostService;
use crate::data::post_repository::PostRepository;

pub(crate) mod app_error;
pub(crate) mod handlers;
pub(crate) mod http_handlers;
pub(crate) mod middleware;
pub(crate) mod openapi;
pub(crate) mod response;
pub(crate) mod routes;

/// Store chosen at startup: Postgres or in-memory.
pub(crate) type SharedPostRepository = Arc<dyn PostRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) post_service: Arc<PostService<SharedPostRepository>>,
}

impl AppState {
    pub(crate) fn new(post_service: Arc<PostService<SharedPostRepository>>) -> Self {
        Self { post_service }
    }
}
