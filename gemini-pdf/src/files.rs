//! Files API surface.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use gemini_pdf_types::content::Part;
use gemini_pdf_types::enums::FileState;
use gemini_pdf_types::files::{File, UploadFileConfig};
use serde_json::Value;

use crate::client::ClientInner;
use crate::error::{Error, Result};
use crate::upload::{upload_chunks, Chunk, UploadStatus};

#[derive(Clone)]
pub struct Files {
    pub(crate) inner: Arc<ClientInner>,
}

impl Files {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// 上传文件（直接上传字节数据）。
    pub async fn upload(&self, data: Vec<u8>, mime_type: impl Into<String>) -> Result<File> {
        let config = UploadFileConfig {
            mime_type: Some(mime_type.into()),
            ..UploadFileConfig::default()
        };
        self.upload_with_config(data, config).await
    }

    /// 上传文件（自定义配置）。
    pub async fn upload_with_config(
        &self,
        data: Vec<u8>,
        config: UploadFileConfig,
    ) -> Result<File> {
        let mime_type = config
            .mime_type
            .clone()
            .ok_or_else(|| Error::InvalidConfig {
                message: "mime_type is required when uploading raw bytes".into(),
            })?;
        let size_bytes = data.len() as u64;
        let file = build_upload_file(config, size_bytes, &mime_type);
        let upload_url = self
            .start_resumable_upload(file, size_bytes, &mime_type, None)
            .await?;
        let mut reader = data.as_slice();
        self.upload_from_reader(&upload_url, &mut reader, size_bytes)
            .await
    }

    /// 从文件路径上传。
    pub async fn upload_from_path(&self, path: impl AsRef<Path>) -> Result<File> {
        self.upload_from_path_with_config(path, UploadFileConfig::default())
            .await
    }

    /// 从文件路径上传（自定义配置）。
    ///
    /// 未指定时，MIME 类型按扩展名推断，显示名称取文件名。
    pub async fn upload_from_path_with_config(
        &self,
        path: impl AsRef<Path>,
        mut config: UploadFileConfig,
    ) -> Result<File> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(Error::InvalidConfig {
                message: format!("{} is not a valid file path", path.display()),
            });
        }

        let size_bytes = metadata.len();
        let mime_type = if let Some(value) = config.mime_type.take() {
            value
        } else {
            mime_guess::from_path(path)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        };

        let file_name = path.file_name().and_then(|name| name.to_str());
        if config.display_name.is_none() {
            config.display_name = file_name.map(ToString::to_string);
        }
        let file = build_upload_file(config, size_bytes, &mime_type);
        let upload_url = self
            .start_resumable_upload(file, size_bytes, &mime_type, file_name)
            .await?;
        let mut file_handle = tokio::fs::File::open(path).await?;
        self.upload_from_reader(&upload_url, &mut file_handle, size_bytes)
            .await
    }

    /// 获取文件元数据。
    pub async fn get(&self, name_or_uri: impl AsRef<str>) -> Result<File> {
        let file_name = normalize_file_name(name_or_uri.as_ref())?;
        let url = build_file_url(&self.inner, &file_name);
        let request = self.inner.http.get(url);
        let response = self.inner.send(request).await?;
        if !response.status().is_success() {
            return Err(Error::from_response(response).await);
        }
        Ok(response.json::<File>().await?)
    }

    /// 轮询直到文件状态变为 ACTIVE。
    pub async fn wait_for_active(
        &self,
        name_or_uri: impl AsRef<str>,
        config: WaitForFileConfig,
    ) -> Result<File> {
        let start = Instant::now();
        loop {
            let file = self.get(name_or_uri.as_ref()).await?;
            match file.state {
                Some(FileState::Active) => return Ok(file),
                Some(FileState::Failed) => return Err(Error::file_processing_failed(&file)),
                _ => {}
            }

            if let Some(timeout) = config.timeout {
                if start.elapsed() >= timeout {
                    return Err(Error::Timeout {
                        message: "Timed out waiting for file to become ACTIVE".into(),
                    });
                }
            }

            #[cfg(feature = "tracing")]
            tracing::debug!(file = file.label(), state = ?file.state, "file not active yet");
            tokio::time::sleep(config.poll_interval).await;
        }
    }

    async fn start_resumable_upload(
        &self,
        file: File,
        size_bytes: u64,
        mime_type: &str,
        file_name: Option<&str>,
    ) -> Result<String> {
        let url = build_files_upload_url(&self.inner);
        let mut request = self
            .inner
            .http
            .post(url)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header(
                "X-Goog-Upload-Header-Content-Length",
                size_bytes.to_string(),
            )
            .header("X-Goog-Upload-Header-Content-Type", mime_type);

        if let Some(file_name) = file_name {
            request = request.header("X-Goog-Upload-File-Name", file_name);
        }

        let body = serde_json::json!({ "file": file });
        let request = request.json(&body);
        let response = self.inner.send(request).await?;
        if !response.status().is_success() {
            return Err(Error::from_response(response).await);
        }

        let upload_url = response
            .headers()
            .get("x-goog-upload-url")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| Error::Parse {
                message: "Missing x-goog-upload-url header".into(),
            })?;

        Ok(upload_url.to_string())
    }

    async fn upload_from_reader<R>(
        &self,
        upload_url: &str,
        reader: &mut R,
        total_size: u64,
    ) -> Result<File>
    where
        R: tokio::io::AsyncRead + Unpin,
    {
        let files = self;
        upload_chunks(reader, total_size, move |chunk| {
            files.send_upload_chunk(upload_url, chunk)
        })
        .await
    }

    async fn send_upload_chunk(
        &self,
        upload_url: &str,
        chunk: Chunk,
    ) -> Result<(UploadStatus, Option<File>)> {
        let command = if chunk.finalize {
            "upload, finalize"
        } else {
            "upload"
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(
            offset = chunk.offset,
            len = chunk.data.len(),
            finalize = chunk.finalize,
            "sending upload chunk"
        );
        let request = self
            .inner
            .http
            .post(upload_url)
            .header("X-Goog-Upload-Command", command)
            .header("X-Goog-Upload-Offset", chunk.offset.to_string())
            .header("Content-Length", chunk.data.len().to_string())
            .body(chunk.data);
        let response = self.inner.send(request).await?;

        if !response.status().is_success() {
            return Err(Error::from_response(response).await);
        }

        let upload_status = response
            .headers()
            .get("x-goog-upload-status")
            .and_then(|value| value.to_str().ok())
            .map(UploadStatus::parse)
            .ok_or_else(|| Error::Parse {
                message: "Missing x-goog-upload-status header".into(),
            })?;

        let body = response.bytes().await?;
        if body.is_empty() {
            return Ok((upload_status, None));
        }

        let value: Value = serde_json::from_slice(&body)?;
        let file_value = value.get("file").cloned().unwrap_or(value);
        let file: File = serde_json::from_value(file_value)?;

        Ok((upload_status, Some(file)))
    }
}

#[derive(Debug, Clone)]
pub struct WaitForFileConfig {
    pub poll_interval: Duration,
    pub timeout: Option<Duration>,
}

impl Default for WaitForFileConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            timeout: Some(Duration::from_secs(300)),
        }
    }
}

/// 将已上传文件转换为可放入请求内容的 `fileData` Part。
///
/// # Errors
/// 当文件缺少 `uri` 或 `mime_type` 时返回 [`Error::Parse`]。
pub fn file_part(file: &File) -> Result<Part> {
    let uri = file.uri.as_deref().ok_or_else(|| Error::Parse {
        message: format!("Uploaded file {} has no uri", file.label()),
    })?;
    let mime_type = file.mime_type.as_deref().ok_or_else(|| Error::Parse {
        message: format!("Uploaded file {} has no mime type", file.label()),
    })?;
    Ok(Part::file_data(uri, mime_type))
}

fn build_upload_file(config: UploadFileConfig, size_bytes: u64, mime_type: &str) -> File {
    File {
        name: config.name.as_deref().map(normalize_upload_name),
        display_name: config.display_name,
        mime_type: Some(mime_type.to_string()),
        size_bytes: Some(size_bytes.to_string()),
        ..File::default()
    }
}

fn normalize_upload_name(name: &str) -> String {
    if name.starts_with("files/") {
        name.to_string()
    } else {
        format!("files/{name}")
    }
}

fn normalize_file_name(value: &str) -> Result<String> {
    if value.starts_with("http://") || value.starts_with("https://") {
        let marker = "files/";
        let start = value.find(marker).ok_or_else(|| Error::InvalidConfig {
            message: format!("Could not find 'files/' in URI: {value}"),
        })?;
        let suffix = &value[start + marker.len()..];
        let name: String = suffix
            .chars()
            .take_while(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
            .collect();
        if name.is_empty() {
            return Err(Error::InvalidConfig {
                message: format!("Could not extract file name from URI: {value}"),
            });
        }
        Ok(name)
    } else if let Some(name) = value.strip_prefix("files/") {
        Ok(name.to_string())
    } else {
        Ok(value.to_string())
    }
}

fn build_files_upload_url(inner: &ClientInner) -> String {
    let base = &inner.api_client.base_url;
    let version = &inner.api_client.api_version;
    format!("{base}upload/{version}/files")
}

fn build_file_url(inner: &ClientInner, name: &str) -> String {
    let base = &inner.api_client.base_url;
    let version = &inner.api_client.api_version;
    format!("{base}{version}/files/{name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Client;
    use crate::test_support::test_client_inner_with_base;

    #[test]
    fn test_normalize_file_name() {
        assert_eq!(normalize_file_name("files/abc-123").unwrap(), "abc-123");
        assert_eq!(normalize_file_name("abc-123").unwrap(), "abc-123");
        assert_eq!(
            normalize_file_name("https://example.com/v1beta/files/abc-123?foo=bar").unwrap(),
            "abc-123"
        );
        assert!(normalize_file_name("https://example.com/nothing").is_err());
    }

    #[test]
    fn test_build_urls() {
        let client = Client::new("test-key").unwrap();
        let files = client.files();
        assert_eq!(
            build_files_upload_url(&files.inner),
            "https://generativelanguage.googleapis.com/upload/v1beta/files"
        );

        let inner = test_client_inner_with_base("http://localhost:8080/", "v1");
        assert_eq!(
            build_file_url(&inner, "abc"),
            "http://localhost:8080/v1/files/abc"
        );
    }

    #[test]
    fn test_build_upload_file() {
        let config = UploadFileConfig {
            name: Some("my-doc".into()),
            display_name: Some("doc.pdf".into()),
            mime_type: None,
        };
        let file = build_upload_file(config, 42, "application/pdf");
        assert_eq!(file.name.as_deref(), Some("files/my-doc"));
        assert_eq!(file.display_name.as_deref(), Some("doc.pdf"));
        assert_eq!(file.size_bytes.as_deref(), Some("42"));
        assert_eq!(file.mime_type.as_deref(), Some("application/pdf"));
    }

    #[test]
    fn test_file_part_requires_uri_and_mime_type() {
        let file = File {
            name: Some("files/abc".into()),
            uri: Some("https://example.com/v1beta/files/abc".into()),
            mime_type: Some("application/pdf".into()),
            ..File::default()
        };
        let part = file_part(&file).unwrap();
        let value = serde_json::to_value(&part).unwrap();
        assert_eq!(value["fileData"]["mimeType"], "application/pdf");

        let missing_uri = File {
            name: Some("files/abc".into()),
            mime_type: Some("application/pdf".into()),
            ..File::default()
        };
        let err = file_part(&missing_uri).unwrap_err();
        assert!(matches!(err, Error::Parse { message } if message.contains("files/abc")));
    }
}
