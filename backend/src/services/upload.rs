use crate::error::{BadgeError, BadgeResult};
use actix_multipart::Multipart;
use futures_util::StreamExt;

/// The `file` part of a multipart upload.
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

fn multipart_error(e: impl std::fmt::Display) -> BadgeError {
    BadgeError::InvalidInput(format!("upload: {}", e))
}

/// Reads the part named `file`, refusing more than `limit` bytes. Other
/// parts are drained and ignored.
pub async fn read_file_field(mut payload: Multipart, limit: usize) -> BadgeResult<UploadedFile> {
    let mut upload: Option<UploadedFile> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(multipart_error)?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        if name.as_deref() != Some("file") || upload.is_some() {
            while let Some(chunk) = field.next().await {
                chunk.map_err(multipart_error)?;
            }
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
            .unwrap_or_default();
        if filename.trim().is_empty() {
            return Err(BadgeError::InvalidInput("Empty filename".to_string()));
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(multipart_error)?;
            if bytes.len() + chunk.len() > limit {
                return Err(BadgeError::InvalidInput(format!(
                    "file is larger than {} bytes",
                    limit
                )));
            }
            bytes.extend_from_slice(&chunk);
        }
        upload = Some(UploadedFile { filename, bytes });
    }

    upload.ok_or_else(|| BadgeError::InvalidInput("No file provided".to_string()))
}
