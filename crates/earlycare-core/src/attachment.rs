//! Transport reference for an image attached to a submission.
//!
//! A blob is either held inline as raw bytes or points at a URL. The intake
//! flow only ever builds blobs from bytes; the URL form exists because
//! results coming back from the service may reference stored images.

use std::borrow::Cow;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Largest attachment accepted by the client: 5 MiB.
pub const MAX_ATTACHMENT_BYTES: u64 = 5 * 1024 * 1024;

const DEFAULT_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalBlob {
    /// Raw bytes, base64 encoded on the wire.
    Bytes(#[serde(with = "base64_bytes")] Vec<u8>),
    Url(String),
}

impl ExternalBlob {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// The blob's content.
    ///
    /// Inline blobs borrow their bytes. URL blobs are only readable when the
    /// URL is a base64 `data:` URL; anything else has to be fetched by whoever
    /// owns the URL.
    pub fn bytes(&self) -> Result<Cow<'_, [u8]>, CoreError> {
        match self {
            Self::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
            Self::Url(url) => decode_data_url(url).map(Cow::Owned),
        }
    }

    /// A URL that can be handed straight to a viewer.
    pub fn direct_url(&self) -> Cow<'_, str> {
        match self {
            Self::Bytes(bytes) => Cow::Owned(format!(
                "data:{};base64,{}",
                sniff_mime(bytes),
                STANDARD.encode(bytes)
            )),
            Self::Url(url) => Cow::Borrowed(url),
        }
    }

    /// Size in bytes, when known without fetching.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Bytes(bytes) => Some(bytes.len()),
            Self::Url(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }
}

fn decode_data_url(url: &str) -> Result<Vec<u8>, CoreError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| CoreError::NotInline(url.to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| CoreError::InvalidDataUrl("missing ',' separator".to_string()))?;
    if !meta.ends_with(";base64") {
        return Err(CoreError::InvalidDataUrl(
            "only base64 data URLs are supported".to_string(),
        ));
    }
    Ok(STANDARD.decode(payload)?)
}

/// Best-effort MIME type from magic numbers for the image formats a phone
/// camera or browser is likely to produce.
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        "image/png"
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        DEFAULT_MIME
    }
}

mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
