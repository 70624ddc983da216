use utoipa::{OpenApi, ToSchema};

use crate::presentation::handlers::posts::{CreatePostForm, PostDto, UpdatePostForm};

// Schema-only mirrors of `ApiResponse<T>` for the documented endpoints.

#[allow(dead_code)]
#[derive(ToSchema)]
pub(crate) struct PostEnvelope {
    success: bool,
    message: String,
    data: PostDto,
}

#[allow(dead_code)]
#[derive(ToSchema)]
pub(crate) struct PostListEnvelope {
    success: bool,
    message: String,
    data: Vec<PostDto>,
}

/// `data` is always `null`.
#[allow(dead_code)]
#[derive(ToSchema)]
pub(crate) struct MessageEnvelope {
    success: bool,
    message: String,
    #[schema(value_type = Option<Object>)]
    data: (),
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::handlers::posts::list_posts,
        crate::presentation::handlers::posts::get_post,
        crate::presentation::handlers::posts::create_post,
        crate::presentation::handlers::posts::update_post,
        crate::presentation::handlers::posts::delete_post
    ),
    components(
        schemas(
            CreatePostForm,
            UpdatePostForm,
            PostDto,
            PostEnvelope,
            PostListEnvelope,
            MessageEnvelope
        )
    ),
    tags(
        (name = "posts", description = "Post endpoints")
    )
)]
pub(crate) struct ApiDoc;

#[cfg(test)]
mod tests {
    use utoipa::OpenApi;

    use super::ApiDoc;

    #[test]
    fn openapi_document_lists_post_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/posts"));
        assert!(doc.paths.paths.contains_key("/api/posts/{id}"));
    }
}
