use serde::Serialize;

/// Envelope shared by every post endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct ApiResponse<T> {
    pub(crate) success: bool,
    pub(crate) message: String,
    pub(crate) data: T,
}

impl<T> ApiResponse<T> {
    pub(crate) fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

impl ApiResponse<()> {
    pub(crate) fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: (),
        }
    }
}
