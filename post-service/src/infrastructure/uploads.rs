use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::anyhow;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use tokio::io::AsyncReadExt;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::error::UploadError;
use crate::domain::post::{FileContents, UploadedFile};

/// How a saved file is referenced on the post record. Deployment-wide, must
/// match the static file mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceStyle {
    /// `<public_prefix>/<generated name>`
    PublicPath,
    /// bare `<generated name>`
    FileName,
}

impl FromStr for ReferenceStyle {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "path" | "public_path" => Ok(Self::PublicPath),
            "filename" | "file_name" => Ok(Self::FileName),
            other => Err(anyhow!(
                "unknown upload reference style '{other}', expecting 'path' or 'filename'"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct UploadSettings {
    pub(crate) dir: PathBuf,
    pub(crate) public_prefix: String,
    pub(crate) reference_style: ReferenceStyle,
}

impl UploadSettings {
    pub(crate) fn new(
        dir: impl Into<PathBuf>,
        public_prefix: &str,
        reference_style: ReferenceStyle,
    ) -> Self {
        Self {
            dir: dir.into(),
            public_prefix: normalize_prefix(public_prefix),
            reference_style,
        }
    }
}

/// Writes cover images into a flat directory.
#[derive(Debug, Clone)]
pub(crate) struct UploadStore {
    settings: UploadSettings,
}

impl UploadStore {
    pub(crate) fn new(settings: UploadSettings) -> Self {
        Self { settings }
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.settings.dir
    }

    pub(crate) fn public_prefix(&self) -> &str {
        &self.settings.public_prefix
    }

    /// Stores the file under a fresh unique name and returns the reference for the post.
    ///
    /// An interrupted write may leave a partial file behind.
    pub(crate) async fn save(&self, file: UploadedFile) -> Result<String, UploadError> {
        tokio::fs::create_dir_all(&self.settings.dir).await?;

        let name = base_name(&file.original_name)?;
        let bytes = read_contents(file.contents).await?;

        let generated = format!("{}-{}", Uuid::new_v4().simple(), name);
        let path = self.settings.dir.join(&generated);
        debug!(path = %path.display(), size = bytes.len(), "writing upload");

        tokio::fs::write(&path, &bytes).await?;

        let reference = self.reference_for(&generated);
        info!(%reference, size = bytes.len(), "upload saved");
        Ok(reference)
    }

    /// Resolves a stored reference (either style) to its location on disk.
    pub(crate) fn path_for(&self, reference: &str) -> PathBuf {
        let name = reference.rsplit('/').next().unwrap_or(reference);
        self.settings.dir.join(name)
    }

    fn reference_for(&self, generated: &str) -> String {
        match self.settings.reference_style {
            ReferenceStyle::PublicPath => format!("{}/{generated}", self.settings.public_prefix),
            ReferenceStyle::FileName => generated.to_string(),
        }
    }
}

async fn read_contents(contents: FileContents) -> Result<Vec<u8>, UploadError> {
    match contents {
        FileContents::Raw(bytes) => Ok(bytes),
        FileContents::DataUrl(url) => decode_data_url(&url),
        FileContents::Text(text) => Ok(text.into_bytes()),
        FileContents::Stream(mut reader) => {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;
            Ok(bytes)
        }
    }
}

fn decode_data_url(url: &str) -> Result<Vec<u8>, UploadError> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| UploadError::InvalidFormat("expected a data: URL".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| UploadError::InvalidFormat("data URL has no payload".to_string()))?;
    if !meta.ends_with(";base64") {
        return Err(UploadError::InvalidFormat(
            "only base64 data URLs are supported".to_string(),
        ));
    }

    STANDARD
        .decode(payload.trim())
        .map_err(|err| UploadError::InvalidFormat(format!("bad base64 payload: {err}")))
}

// Only the last path component survives, so client names cannot escape the directory.
fn base_name(original: &str) -> Result<&str, UploadError> {
    let name = original.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    if name.is_empty() || name == "." || name == ".." {
        return Err(UploadError::InvalidFormat(format!(
            "unusable file name '{original}'"
        )));
    }
    Ok(name)
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    format!("/{trimmed}")
}
