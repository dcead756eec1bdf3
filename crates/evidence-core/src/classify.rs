//! Evidence format classification
//!
//! Declared media types are often missing or wrong, so the file extension is
//! consulted as a second signal. The decision is made once per file and then
//! matched exhaustively by the page composer.

use serde::Serialize;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
const IMAGE_MEDIA_PREFIX: &str = "image/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ImageKind {
    Png,
    Jpeg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EvidenceKind {
    Pdf,
    Image(ImageKind),
    /// Anything that can only travel as a separate attachment
    Opaque,
}

/// A decoded evidence buffer together with its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedPayload {
    pub kind: EvidenceKind,
    pub buffer: Vec<u8>,
}

impl ClassifiedPayload {
    pub fn new(declared_type: &str, name: &str, buffer: Vec<u8>) -> Self {
        Self {
            kind: classify(declared_type, name),
            buffer,
        }
    }
}

/// Classify evidence by declared media type or file name.
///
/// PDF wins over image, image over opaque. Within images, PNG is chosen when
/// either signal mentions it and JPEG otherwise.
pub fn classify(declared_type: &str, name: &str) -> EvidenceKind {
    let media_type = declared_type.trim().to_ascii_lowercase();
    let name = name.trim().to_ascii_lowercase();

    if media_type == PDF_MEDIA_TYPE || name.ends_with(".pdf") {
        return EvidenceKind::Pdf;
    }

    let image_by_name = [".png", ".jpg", ".jpeg"]
        .iter()
        .any(|ext| name.ends_with(ext));
    if media_type.starts_with(IMAGE_MEDIA_PREFIX) || image_by_name {
        let png = media_type.contains("png") || name.ends_with(".png");
        return EvidenceKind::Image(if png { ImageKind::Png } else { ImageKind::Jpeg });
    }

    EvidenceKind::Opaque
}
