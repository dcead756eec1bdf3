//! Page composition for a single evidence file
//!
//! Each file either lands in the composite document or comes back as
//! [`Unembedded`]. Nothing here fails the merge as a whole. Every unembedded
//! file also gets a placeholder page at its position in the evidence order,
//! so a reader of the composite can see which attachments travel separately.

use crate::classify::{ClassifiedPayload, EvidenceKind};
use crate::composite::{CompositeDocument, TextLine};
use crate::config::MergeConfig;
use crate::raster::prepare_image;
use serde::Serialize;
use thiserror::Error;

/// Evidence that was placed inside the composite document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Embedded {
    pub pages: usize,
}

/// A file that travels next to the composite document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnembeddedFile {
    pub name: String,
    #[serde(skip)]
    pub data: Vec<u8>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnembedReason {
    #[error("payload could not be decoded: {0}")]
    Undecodable(String),

    #[error("document could not be read: {0}")]
    UnreadableDocument(String),

    #[error("image could not be embedded: {0}")]
    UnreadableImage(String),

    #[error("format cannot be embedded")]
    UnsupportedFormat,
}

impl UnembedReason {
    fn notice(&self) -> &'static str {
        match self {
            UnembedReason::Undecodable(_) => {
                "The file content could not be decoded, so it cannot be shown in this document."
            }
            UnembedReason::UnreadableDocument(_) => {
                "The document could not be read, so its pages cannot be shown in this document."
            }
            UnembedReason::UnreadableImage(_) => {
                "The image could not be read, so it cannot be shown in this document."
            }
            UnembedReason::UnsupportedFormat => {
                "This file format cannot be embedded in this document."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unembedded {
    pub file: UnembeddedFile,
    pub reason: UnembedReason,
}

pub type FileOutcome = Result<Embedded, Unembedded>;

pub struct PageComposer<'a> {
    config: &'a MergeConfig,
}

impl<'a> PageComposer<'a> {
    pub fn new(config: &'a MergeConfig) -> Self {
        Self { config }
    }

    /// Place `payload` into `composite` according to its kind
    pub fn compose(
        &self,
        composite: &mut CompositeDocument,
        name: &str,
        payload: ClassifiedPayload,
    ) -> FileOutcome {
        let ClassifiedPayload { kind, buffer } = payload;
        let failure = match kind {
            EvidenceKind::Pdf => match composite.append_document(&buffer) {
                Ok(pages) => return Ok(Embedded { pages }),
                Err(e) => UnembedReason::UnreadableDocument(e),
            },
            EvidenceKind::Image(image_kind) => {
                let caption = format!("Evidence: {}", name);
                match prepare_image(image_kind, &buffer)
                    .and_then(|image| composite.append_image_page(&image, &caption))
                {
                    Ok(()) => return Ok(Embedded { pages: 1 }),
                    Err(e) => UnembedReason::UnreadableImage(e),
                }
            }
            EvidenceKind::Opaque => UnembedReason::UnsupportedFormat,
        };
        Err(self.unembed(composite, name, buffer, failure))
    }

    /// Record `data` as unembedded and add its placeholder page
    pub fn unembed(
        &self,
        composite: &mut CompositeDocument,
        name: &str,
        data: Vec<u8>,
        reason: UnembedReason,
    ) -> Unembedded {
        let lines = [
            TextLine::new(
                format!("Attachment: {}", name),
                self.config.title_font_size,
            ),
            TextLine::new(reason.notice(), self.config.body_font_size),
            TextLine::new(
                format!(
                    "The original file is included separately in the {} folder of the package.",
                    self.config.attachments_folder
                ),
                self.config.body_font_size,
            ),
        ];
        if let Err(e) = composite.append_text_page(&lines) {
            tracing::warn!(name, "Failed to add placeholder page: {}", e);
        }

        Unembedded {
            file: UnembeddedFile {
                name: name.to_string(),
                data,
            },
            reason,
        }
    }
}
