//! Payload normalization
//!
//! Content stores hand back either raw bytes or Base64 text, the latter often
//! wrapped in a data URL (`data:image/png;base64,....`). Everything downstream
//! works on raw bytes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Evidence content as returned by a content store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvidencePayload {
    Binary(Vec<u8>),
    /// Base64 text, optionally prefixed with a data-URL header
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayload {
    pub bytes: Vec<u8>,
    /// Media type announced by a data-URL header, if any
    pub media_type: Option<String>,
}

/// A text payload that is not valid Base64. Keeps the original text so it can
/// still be shipped as an attachment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid base64 payload: {error}")]
pub struct UndecodablePayload {
    pub text: String,
    pub error: base64::DecodeError,
}

pub fn decode_payload(payload: EvidencePayload) -> Result<DecodedPayload, UndecodablePayload> {
    match payload {
        EvidencePayload::Binary(bytes) => Ok(DecodedPayload {
            bytes,
            media_type: None,
        }),
        EvidencePayload::Text(text) => {
            let (header, data) = match text.split_once(',') {
                Some((header, data)) => (Some(header), data),
                None => (None, text.as_str()),
            };
            let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            match STANDARD.decode(compact.as_bytes()) {
                Ok(bytes) => Ok(DecodedPayload {
                    bytes,
                    media_type: header.and_then(data_url_media_type),
                }),
                Err(error) => Err(UndecodablePayload { text, error }),
            }
        }
    }
}

/// `data:image/png;base64` -> `image/png`
fn data_url_media_type(header: &str) -> Option<String> {
    let meta = header.trim().strip_prefix("data:")?;
    let media_type = meta.split(';').next()?.trim();
    if media_type.is_empty() {
        None
    } else {
        Some(media_type.to_ascii_lowercase())
    }
}
