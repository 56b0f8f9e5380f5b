//! Chunk driver for the resumable upload protocol.

use crate::error::{Error, Result};
use std::future::Future;
use tokio::io::{AsyncRead, AsyncReadExt};

pub const CHUNK_SIZE: usize = 8 * 1024 * 1024;

/// Value of the `x-goog-upload-status` response header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Active,
    Final,
    Other(String),
}

impl UploadStatus {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "active" => Self::Active,
            "final" => Self::Final,
            other => Self::Other(other.to_string()),
        }
    }
}

/// One chunk handed to the transport.
#[derive(Debug)]
pub struct Chunk {
    pub data: Vec<u8>,
    pub offset: u64,
    pub finalize: bool,
}

fn finalize_upload<T>(status: &UploadStatus, value: Option<T>) -> Result<T> {
    if *status != UploadStatus::Final {
        return Err(Error::Parse {
            message: format!("Upload finalize failed: {status:?}"),
        });
    }
    value.ok_or_else(|| Error::Parse {
        message: "Upload completed but response body was empty".into(),
    })
}

/// Reads `total_size` bytes from `reader` and feeds them to `send_chunk` in
/// [`CHUNK_SIZE`] pieces. The last chunk carries `finalize = true`; every
/// earlier chunk must be acknowledged with [`UploadStatus::Active`].
pub async fn upload_chunks<R, P, F, Fut>(
    reader: &mut R,
    total_size: u64,
    mut send_chunk: F,
) -> Result<P>
where
    R: AsyncRead + Unpin,
    F: FnMut(Chunk) -> Fut,
    Fut: Future<Output = Result<(UploadStatus, Option<P>)>>,
{
    if total_size == 0 {
        let (status, payload) = send_chunk(Chunk {
            data: Vec::new(),
            offset: 0,
            finalize: true,
        })
        .await?;
        return finalize_upload(&status, payload);
    }

    let buffer_len = usize::try_from(total_size).map_or(CHUNK_SIZE, |size| size.min(CHUNK_SIZE));
    let mut buffer = vec![0u8; buffer_len];
    let mut offset: u64 = 0;
    while offset < total_size {
        let read_bytes = reader.read(&mut buffer).await?;
        if read_bytes == 0 {
            return Err(Error::Parse {
                message: "Unexpected EOF while uploading file".into(),
            });
        }

        let finalize = offset + read_bytes as u64 >= total_size;
        let (status, payload) = send_chunk(Chunk {
            data: buffer[..read_bytes].to_vec(),
            offset,
            finalize,
        })
        .await?;
        if finalize {
            return finalize_upload(&status, payload);
        }

        if status != UploadStatus::Active {
            return Err(Error::Parse {
                message: format!("Unexpected upload status: {status:?}"),
            });
        }
        offset += read_bytes as u64;
    }

    Err(Error::Parse {
        message: "Upload finished without final response".into(),
    })
}
