use axum::{
    Json,
    extract::{Multipart, Path, State, multipart::Field},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::post::{
    CreatePostRequest, FileContents, Post, UpdatePostRequest, UploadedFile,
};
use crate::presentation::AppState;
use crate::presentation::app_error::{AppError, AppResult};
use crate::presentation::response::ApiResponse;

/// `multipart/form-data` body for creating a post.
#[derive(Debug, Validate, ToSchema)]
pub(crate) struct CreatePostForm {
    #[validate(length(min = 3, max = 100))]
    pub(crate) title: String,
    #[validate(length(min = 3, max = 1000))]
    pub(crate) content: String,
    /// Raster image file part, or a text part with a base64 image `data:` URL. Also accepted as `coverImage`.
    #[schema(value_type = Option<String>, format = Binary)]
    pub(crate) cover_image: Option<UploadedFile>,
}

/// `multipart/form-data` body for updating a post; omitted fields are kept.
#[derive(Debug, Validate, ToSchema)]
pub(crate) struct UpdatePostForm {
    #[validate(length(min = 3, max = 100))]
    pub(crate) title: Option<String>,
    #[validate(length(min = 3, max = 1000))]
    pub(crate) content: Option<String>,
    /// Raster image file part, or a text part with a base64 image `data:` URL. Also accepted as `coverImage`.
    #[schema(value_type = Option<String>, format = Binary)]
    pub(crate) cover_image: Option<UploadedFile>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) cover_image: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            cover_image: post.cover_image,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Default)]
struct PostFormParts {
    title: Option<String>,
    content: Option<String>,
    cover_image: Option<UploadedFile>,
}

#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    responses(
        (status = 200, description = "Posts listed, newest first", body = crate::presentation::openapi::PostListEnvelope),
        (status = 500, description = "Store unavailable, data is an empty list", body = crate::presentation::openapi::PostListEnvelope)
    )
)]
pub(crate) async fn list_posts(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<PostDto>>>) {
    let result = state.post_service.list_posts().await;
    let posts: Vec<PostDto> = result.posts.into_iter().map(PostDto::from).collect();

    match result.failure {
        None => (
            StatusCode::OK,
            Json(ApiResponse::success("List Data Posts!", posts)),
        ),
        Some(message) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse {
                success: false,
                message,
                data: posts,
            }),
        ),
    }
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "posts",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post found", body = crate::presentation::openapi::PostEnvelope),
        (status = 400, description = "Malformed id", body = crate::presentation::openapi::MessageEnvelope),
        (status = 404, description = "Post not found", body = crate::presentation::openapi::MessageEnvelope),
        (status = 500, description = "Internal error", body = crate::presentation::openapi::MessageEnvelope)
    )
)]
pub(crate) async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<ApiResponse<PostDto>>)> {
    let post = state.post_service.get_post(&id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            format!("Detail Data Post By ID: {}", post.id),
            PostDto::from(post),
        )),
    ))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    request_body(content = CreatePostForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Post created", body = crate::presentation::openapi::PostEnvelope),
        (status = 400, description = "Validation error or unreadable cover image", body = crate::presentation::openapi::MessageEnvelope),
        (status = 500, description = "Internal error", body = crate::presentation::openapi::MessageEnvelope)
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<PostDto>>)> {
    let parts = read_post_form(multipart).await?;
    let form = CreatePostForm {
        title: parts.title.unwrap_or_default(),
        content: parts.content.unwrap_or_default(),
        cover_image: parts.cover_image,
    };
    form.validate()?;

    let req = CreatePostRequest {
        title: form.title,
        content: form.content,
        cover_image: form.cover_image,
    };
    let post = state.post_service.create_post(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Post Created Successfully!",
            PostDto::from(post),
        )),
    ))
}

#[utoipa::path(
    patch,
    path = "/api/posts/{id}",
    tag = "posts",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    request_body(content = UpdatePostForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Post updated", body = crate::presentation::openapi::PostEnvelope),
        (status = 400, description = "Validation error or unreadable cover image", body = crate::presentation::openapi::MessageEnvelope),
        (status = 404, description = "Post not found", body = crate::presentation::openapi::MessageEnvelope),
        (status = 500, description = "Internal error", body = crate::presentation::openapi::MessageEnvelope)
    )
)]
pub(crate) async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<PostDto>>)> {
    let parts = read_post_form(multipart).await?;
    let form = UpdatePostForm {
        title: parts.title,
        content: parts.content,
        cover_image: parts.cover_image,
    };
    form.validate()?;

    let req = UpdatePostRequest {
        title: form.title,
        content: form.content,
        cover_image: form.cover_image,
    };
    let post = state.post_service.update_post(&id, req).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            "Post Updated Successfully!",
            PostDto::from(post),
        )),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "posts",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post deleted", body = crate::presentation::openapi::MessageEnvelope),
        (status = 400, description = "Malformed id", body = crate::presentation::openapi::MessageEnvelope),
        (status = 404, description = "Post not found", body = crate::presentation::openapi::MessageEnvelope),
        (status = 500, description = "Internal error", body = crate::presentation::openapi::MessageEnvelope)
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<ApiResponse<()>>)> {
    state.post_service.delete_post(&id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Post Deleted Successfully!", ())),
    ))
}

async fn read_post_form(mut multipart: Multipart) -> AppResult<PostFormParts> {
    let mut parts = PostFormParts::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(format!("failed to read multipart data: {err}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => parts.title = Some(read_text(field).await?),
            "content" => parts.content = Some(read_text(field).await?),
            "coverImage" | "cover_image" => parts.cover_image = read_cover(field).await?,
            other => debug!(field = other, "ignoring unknown multipart field"),
        }
    }

    Ok(parts)
}

async fn read_text(field: Field<'_>) -> AppResult<String> {
    let name = field.name().unwrap_or_default().to_string();
    let text = field
        .text()
        .await
        .map_err(|err| AppError::BadRequest(format!("failed to read field '{name}': {err}")))?;
    Ok(text.trim().to_string())
}

/// Raster types accepted as covers: mime subtype and the file extensions
/// served with that type. SVG is left out since it can carry script.
const COVER_IMAGE_TYPES: &[(&str, &[&str])] = &[
    ("png", &["png"]),
    ("jpeg", &["jpg", "jpeg"]),
    ("gif", &["gif"]),
    ("webp", &["webp"]),
    ("avif", &["avif"]),
    ("bmp", &["bmp"]),
];

/// Empty parts count as "no cover". Anything else must be an image file part
/// or an image `data:` URL.
async fn read_cover(field: Field<'_>) -> AppResult<Option<UploadedFile>> {
    if let Some(file_name) = field.file_name().map(str::to_string) {
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::BadRequest(format!("failed to read cover image: {err}")))?;
        if bytes.is_empty() {
            return Ok(None);
        }

        let extensions = content_type
            .as_deref()
            .and_then(image_extensions)
            .ok_or_else(|| not_an_image(content_type.as_deref().unwrap_or("none")))?;
        return Ok(Some(UploadedFile::new(
            cover_file_name(&file_name, extensions),
            FileContents::Raw(bytes.to_vec()),
        )));
    }

    let text = read_text(field).await?;
    if text.is_empty() {
        return Ok(None);
    }
    if !text.starts_with("data:") {
        return Err(AppError::BadRequest(
            "cover image must be an image file or an image data URL".to_string(),
        ));
    }

    let name = data_url_cover_name(&text)?;
    Ok(Some(UploadedFile::new(name, FileContents::DataUrl(text))))
}

fn image_extensions(mime: &str) -> Option<&'static [&'static str]> {
    let essence = mime.split(';').next().unwrap_or_default().trim();
    let (kind, subtype) = essence.split_once('/')?;
    if !kind.eq_ignore_ascii_case("image") {
        return None;
    }
    COVER_IMAGE_TYPES
        .iter()
        .find(|(known, _)| subtype.eq_ignore_ascii_case(known))
        .map(|(_, extensions)| *extensions)
}

// Static files are served by extension, so the stored name must carry one
// that matches the declared type: "x.html" sent as image/png -> "x.html.png".
fn cover_file_name(file_name: &str, extensions: &[&str]) -> String {
    let matches = file_name.rsplit_once('.').is_some_and(|(_, current)| {
        extensions
            .iter()
            .any(|known| current.eq_ignore_ascii_case(known))
    });
    if matches {
        file_name.to_string()
    } else {
        format!("{file_name}.{}", extensions[0])
    }
}

// "data:image/png;base64,..." -> "cover.png"
fn data_url_cover_name(data_url: &str) -> AppResult<String> {
    let mime = data_url
        .strip_prefix("data:")
        .and_then(|rest| rest.split(',').next())
        .unwrap_or_default();
    let extensions = image_extensions(mime).ok_or_else(|| {
        not_an_image(mime.split(';').next().filter(|m| !m.is_empty()).unwrap_or("none"))
    })?;
    Ok(format!("cover.{}", extensions[0]))
}

fn not_an_image(content_type: &str) -> AppError {
    AppError::BadRequest(format!(
        "cover image must be a png, jpeg, gif, webp, avif or bmp image, got '{content_type}'"
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::{cover_file_name, data_url_cover_name, image_extensions};
    use crate::application::post_service::PostService;
    use crate::application::retry::RetryPolicy;
    use crate::data::repositories::memory::post_repository::InMemoryPostRepository;
    use crate::infrastructure::uploads::{ReferenceStyle, UploadSettings, UploadStore};
    use crate::presentation::{AppState, SharedPostRepository, http_handlers};

    const BOUNDARY: &str = "post-service-test-boundary";

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a str, &'a [u8]),
    }

    fn app(dir: &TempDir) -> Router {
        let uploads = UploadStore::new(UploadSettings::new(
            dir.path().join("uploads"),
            "/uploads",
            ReferenceStyle::PublicPath,
        ));
        let retry = RetryPolicy {
            max_attempts: 2,
            initial_delay: Duration::from_millis(1),
            multiplier: 2,
        };
        let repo: SharedPostRepository = Arc::new(InMemoryPostRepository::new());
        let service = PostService::new(repo, uploads, retry);
        http_handlers::routes(AppState::new(Arc::new(service)))
    }

    fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File(name, file_name, content_type, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                             Content-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn multipart_request(method: Method, uri: &str, parts: &[Part<'_>]) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .expect("request must build")
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("request must build")
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body must be readable");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn create(app: &Router, title: &str) -> i64 {
        let (status, body) = send(
            app,
            multipart_request(
                Method::POST,
                "/api/posts",
                &[
                    Part::Text("title", title),
                    Part::Text("content", "body of the post"),
                ],
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "body: {body}");
        body["data"]["id"].as_i64().expect("id must be present")
    }

    #[tokio::test]
    async fn create_with_file_returns_created_post_and_serves_cover() {
        let dir = TempDir::new().expect("tempdir");
        let app = app(&dir);

        let (status, body) = send(
            &app,
            multipart_request(
                Method::POST,
                "/api/posts",
                &[
                    Part::Text("title", "  Hello world  "),
                    Part::Text("content", "first post"),
                    Part::File("coverImage", "cover.png", "image/png", b"png-bytes"),
                ],
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED, "body: {body}");
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["title"], "Hello world");
        let cover = body["data"]["coverImage"]
            .as_str()
            .expect("cover must be set")
            .to_string();
        assert!(cover.starts_with("/uploads/"));

        let response = app
            .clone()
            .oneshot(empty_request(Method::GET, &cover))
            .await
            .expect("router is infallible");
        assert_eq!(response.status(), StatusCode::OK);
        let served = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body must be readable");
        assert_eq!(&served[..], b"png-bytes");
    }

    #[tokio::test]
    async fn create_accepts_data_url_cover() {
        let dir = TempDir::new().expect("tempdir");
        let app = app(&dir);

        let (status, body) = send(
            &app,
            multipart_request(
                Method::POST,
                "/api/posts",
                &[
                    Part::Text("title", "data url"),
                    Part::Text("content", "inline cover"),
                    Part::Text("cover_image", "data:image/png;base64,aGVsbG8="),
                ],
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED, "body: {body}");
        let cover = body["data"]["coverImage"].as_str().expect("cover must be set");
        assert!(cover.ends_with("-cover.png"), "got {cover}");
    }

    #[tokio::test]
    async fn create_rejects_short_or_blank_fields() {
        let dir = TempDir::new().expect("tempdir");
        let app = app(&dir);

        let (status, body) = send(
            &app,
            multipart_request(
                Method::POST,
                "/api/posts",
                &[Part::Text("title", "   "), Part::Text("content", "ok content")],
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn create_rejects_malformed_data_url() {
        let dir = TempDir::new().expect("tempdir");
        let app = app(&dir);

        let (status, body) = send(
            &app,
            multipart_request(
                Method::POST,
                "/api/posts",
                &[
                    Part::Text("title", "title"),
                    Part::Text("content", "content"),
                    Part::Text("coverImage", "data:image/png,not-base64"),
                ],
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");

        let (_, listed) = send(&app, empty_request(Method::GET, "/api/posts")).await;
        assert_eq!(listed["data"].as_array().map(Vec::len), Some(0));
    }

    fn stored_upload_count(dir: &TempDir) -> usize {
        std::fs::read_dir(dir.path().join("uploads"))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn create_rejects_non_image_covers_without_storing_them() {
        let dir = TempDir::new().expect("tempdir");
        let app = app(&dir);

        let covers = [
            Part::File(
                "coverImage",
                "x.html",
                "text/html",
                b"<script>alert(1)</script>",
            ),
            Part::File("coverImage", "x.png", "application/octet-stream", b"bytes"),
            Part::File("coverImage", "x.svg", "image/svg+xml", b"<svg/>"),
            Part::Text("coverImage", "undefined"),
            Part::Text(
                "coverImage",
                "data:text/html;base64,PHNjcmlwdD5hbGVydCgxKTwvc2NyaXB0Pg==",
            ),
        ];
        for cover in covers {
            let (status, body) = send(
                &app,
                multipart_request(
                    Method::POST,
                    "/api/posts",
                    &[
                        Part::Text("title", "title"),
                        Part::Text("content", "content"),
                        cover,
                    ],
                ),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(body["success"], false);
        }

        let (_, listed) = send(&app, empty_request(Method::GET, "/api/posts")).await;
        assert_eq!(listed["data"].as_array().map(Vec::len), Some(0));
        assert_eq!(stored_upload_count(&dir), 0);
    }

    #[tokio::test]
    async fn image_cover_with_foreign_extension_is_served_as_image() {
        let dir = TempDir::new().expect("tempdir");
        let app = app(&dir);

        let (status, body) = send(
            &app,
            multipart_request(
                Method::POST,
                "/api/posts",
                &[
                    Part::Text("title", "title"),
                    Part::Text("content", "content"),
                    Part::File("coverImage", "x.html", "image/png", b"png-bytes"),
                ],
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "body: {body}");
        let cover = body["data"]["coverImage"]
            .as_str()
            .expect("cover must be set")
            .to_string();
        assert!(cover.ends_with("-x.html.png"), "got {cover}");

        let response = app
            .clone()
            .oneshot(empty_request(Method::GET, &cover))
            .await
            .expect("router is infallible");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
            Some("image/png")
        );
    }

    #[tokio::test]
    async fn update_rejects_text_cover_and_keeps_post() {
        let dir = TempDir::new().expect("tempdir");
        let app = app(&dir);
        let id = create(&app, "original").await;
        let uri = format!("/api/posts/{id}");

        let (status, _) = send(
            &app,
            multipart_request(
                Method::PATCH,
                &uri,
                &[
                    Part::Text("title", "changed"),
                    Part::Text("coverImage", "undefined"),
                ],
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(&app, empty_request(Method::GET, &uri)).await;
        assert_eq!(body["data"]["title"], "original");
        assert!(body["data"]["coverImage"].is_null());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let dir = TempDir::new().expect("tempdir");
        let app = app(&dir);
        let first = create(&app, "first post").await;
        let second = create(&app, "second post").await;

        let (status, body) = send(&app, empty_request(Method::GET, "/api/posts")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let ids: Vec<i64> = body["data"]
            .as_array()
            .expect("data must be a list")
            .iter()
            .filter_map(|post| post["id"].as_i64())
            .collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[tokio::test]
    async fn get_maps_missing_and_malformed_ids() {
        let dir = TempDir::new().expect("tempdir");
        let app = app(&dir);

        let (status, body) = send(&app, empty_request(Method::GET, "/api/posts/404")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);

        let (status, _) = send(&app, empty_request(Method::GET, "/api/posts/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn patch_and_put_update_only_supplied_fields() {
        let dir = TempDir::new().expect("tempdir");
        let app = app(&dir);
        let id = create(&app, "original").await;
        let uri = format!("/api/posts/{id}");

        let (status, body) = send(
            &app,
            multipart_request(Method::PATCH, &uri, &[Part::Text("title", "patched")]),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "body: {body}");
        assert_eq!(body["data"]["title"], "patched");
        assert_eq!(body["data"]["content"], "body of the post");

        let (status, body) = send(
            &app,
            multipart_request(Method::PUT, &uri, &[Part::Text("content", "replaced body")]),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "body: {body}");
        assert_eq!(body["data"]["title"], "patched");
        assert_eq!(body["data"]["content"], "replaced body");
    }

    #[tokio::test]
    async fn update_and_delete_missing_post_return_not_found() {
        let dir = TempDir::new().expect("tempdir");
        let app = app(&dir);

        let (status, _) = send(
            &app,
            multipart_request(Method::PATCH, "/api/posts/9", &[Part::Text("title", "ghost")]),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, empty_request(Method::DELETE, "/api/posts/9")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_returns_null_data_then_post_is_gone() {
        let dir = TempDir::new().expect("tempdir");
        let app = app(&dir);
        let id = create(&app, "short lived").await;
        let uri = format!("/api/posts/{id}");

        let (status, body) = send(&app, empty_request(Method::DELETE, &uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body["data"].is_null());

        let (status, _) = send(&app, empty_request(Method::GET, &uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn data_url_cover_name_follows_image_type() {
        assert_eq!(
            data_url_cover_name("data:image/png;base64,AA").expect("png"),
            "cover.png"
        );
        assert_eq!(
            data_url_cover_name("data:IMAGE/JPEG;base64,AA").expect("jpeg"),
            "cover.jpg"
        );
        for rejected in [
            "data:image/svg+xml;base64,AA",
            "data:text/html;base64,AA",
            "data:;base64,AA",
        ] {
            assert!(data_url_cover_name(rejected).is_err(), "{rejected}");
        }
    }

    #[test]
    fn cover_file_name_keeps_matching_extension_only() {
        assert_eq!(cover_file_name("photo.JPG", &["jpg", "jpeg"]), "photo.JPG");
        assert_eq!(cover_file_name("x.html", &["png"]), "x.html.png");
        assert_eq!(cover_file_name("blob", &["webp"]), "blob.webp");
    }

    #[test]
    fn image_extensions_accept_raster_types_with_parameters() {
        assert_eq!(image_extensions("image/png"), Some(&["png"][..]));
        assert_eq!(image_extensions("Image/GIF; q=1"), Some(&["gif"][..]));
        assert_eq!(image_extensions("image/svg+xml"), None);
        assert_eq!(image_extensions("text/html"), None);
        assert_eq!(image_extensions("application/octet-stream"), None);
    }
}
