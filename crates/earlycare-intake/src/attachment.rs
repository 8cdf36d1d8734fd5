//! Turns a locally selected image into an [`ExternalBlob`] ready to send.

use std::path::Path;

use tracing::debug;

use earlycare_core::attachment::{ExternalBlob, MAX_ATTACHMENT_BYTES};

use crate::error::AttachmentError;

/// Size of the file at `path`, rejecting anything over the attachment limit.
pub async fn check_size(path: &Path) -> Result<u64, AttachmentError> {
    let size = tokio::fs::metadata(path).await?.len();
    if size > MAX_ATTACHMENT_BYTES {
        return Err(AttachmentError::TooLarge {
            size,
            limit: MAX_ATTACHMENT_BYTES,
        });
    }
    Ok(size)
}

/// Read the whole file and wrap it as an inline blob.
///
/// The size is checked before any bytes are read, and again against what was
/// actually read in case the file grew in between.
pub async fn encode(path: &Path) -> Result<ExternalBlob, AttachmentError> {
    check_size(path).await?;

    let bytes = tokio::fs::read(path).await?;
    let size = bytes.len() as u64;
    if size > MAX_ATTACHMENT_BYTES {
        return Err(AttachmentError::TooLarge {
            size,
            limit: MAX_ATTACHMENT_BYTES,
        });
    }

    debug!(path = %path.display(), size, "attachment encoded");
    Ok(ExternalBlob::from_bytes(bytes))
}
