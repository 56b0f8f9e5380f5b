//! Error definitions for the client.

use gemini_pdf_types::files::File;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP client error: {source}")]
    HttpClient {
        #[from]
        source: reqwest::Error,
    },

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Timeout: {message}")]
    Timeout { message: String },
}

impl Error {
    /// 是否为服务端返回的 API 错误。
    #[must_use]
    pub const fn is_api_error(&self) -> bool {
        matches!(self, Self::ApiError { .. })
    }

    /// 文件处理失败（状态为 FAILED）对应的 API 错误。
    #[must_use]
    pub fn file_processing_failed(file: &File) -> Self {
        let message = file
            .error
            .as_ref()
            .and_then(|status| status.message.clone())
            .unwrap_or_else(|| format!("File processing failed: {}", file.label()));
        Self::ApiError {
            status: 500,
            message,
        }
    }

    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        Self::ApiError {
            status: response.status().as_u16(),
            message: response.text().await.unwrap_or_default(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
