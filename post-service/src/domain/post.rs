use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncRead;

use super::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) cover_image: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl Post {
    pub(crate) fn new(
        id: i64,
        title: impl Into<String>,
        content: impl Into<String>,
        cover_image: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validate_positive_i64("id", id)?;

        if updated_at < created_at {
            return Err(DomainError::Validation {
                field: "updated_at",
                message: "must be >= created_at",
            });
        }

        Ok(Self {
            id,
            title: title.into(),
            content: content.into(),
            cover_image: cover_image.filter(|reference| !reference.is_empty()),
            created_at,
            updated_at,
        })
    }
}

/// Body of an uploaded cover image, tagged by how it reached the server.
pub(crate) enum FileContents {
    /// Raw bytes, e.g. a multipart file part.
    Raw(Vec<u8>),
    /// `data:<mime>;base64,<payload>` string.
    DataUrl(String),
    /// Plain text written verbatim. Not accepted over HTTP, where covers
    /// must be images.
    #[cfg_attr(not(test), allow(dead_code))]
    Text(String),
    /// Any async byte source, read to the end on save. The HTTP layer
    /// buffers multipart parts, so only in-process callers build this.
    #[cfg_attr(not(test), allow(dead_code))]
    Stream(Box<dyn AsyncRead + Send + Unpin>),
}

impl fmt::Debug for FileContents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileContents::Raw(bytes) => f.debug_tuple("Raw").field(&bytes.len()).finish(),
            FileContents::DataUrl(url) => f.debug_tuple("DataUrl").field(&url.len()).finish(),
            FileContents::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
            FileContents::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

#[derive(Debug)]
pub(crate) struct UploadedFile {
    pub(crate) original_name: String,
    pub(crate) contents: FileContents,
}

impl UploadedFile {
    pub(crate) fn new(original_name: impl Into<String>, contents: FileContents) -> Self {
        Self {
            original_name: original_name.into(),
            contents,
        }
    }
}

#[derive(Debug)]
pub(crate) struct CreatePostRequest {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) cover_image: Option<UploadedFile>,
}

/// Partial update: `None` fields keep their stored value.
#[derive(Debug, Default)]
pub(crate) struct UpdatePostRequest {
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) cover_image: Option<UploadedFile>,
}

pub(crate) fn parse_post_id(raw: &str) -> Result<i64, DomainError> {
    let id = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| DomainError::InvalidId(raw.to_string()))?;
    if id <= 0 {
        return Err(DomainError::InvalidId(raw.to_string()));
    }
    Ok(id)
}

fn validate_positive_i64(field: &'static str, value: i64) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::Validation {
            field,
            message: "must be > 0",
        });
    }
    Ok(())
}
