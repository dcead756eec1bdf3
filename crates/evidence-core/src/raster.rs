//! Raster image preparation for PDF image XObjects
//!
//! PNG is decoded and re-encoded as Flate-compressed samples, with alpha split
//! into a soft mask. JPEG is validated by decoding it and then embedded as-is
//! through `DCTDecode`, with the colour space taken from its frame header.

use crate::classify::ImageKind;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{Cursor, Write};

/// Image samples in the form a PDF image XObject expects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfImage {
    pub width: u32,
    pub height: u32,
    pub color_space: &'static str,
    pub filter: &'static str,
    pub data: Vec<u8>,
    /// Flate-compressed 8-bit alpha channel
    pub soft_mask: Option<Vec<u8>>,
    /// `Decode` array for samples stored inverted
    pub decode: Option<&'static [i64]>,
}

/// Adobe-written CMYK JPEGs store inverted ink values
const INVERTED_CMYK: &[i64] = &[1, 0, 1, 0, 1, 0, 1, 0];
const ADOBE_MARKER: u8 = 0xEE;

/// Decode `bytes` with the codec for `kind`
pub fn prepare_image(kind: ImageKind, bytes: &[u8]) -> Result<PdfImage, String> {
    match kind {
        ImageKind::Png => prepare_png(bytes),
        ImageKind::Jpeg => prepare_jpeg(bytes),
    }
}

fn prepare_png(bytes: &[u8]) -> Result<PdfImage, String> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| format!("Invalid PNG: {}", e))?;

    let mut buffer = vec![0; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut buffer)
        .map_err(|e| format!("Invalid PNG: {}", e))?;
    let samples = &buffer[..frame.buffer_size()];

    let (color_space, channels, has_alpha) = match frame.color_type {
        png::ColorType::Grayscale => ("DeviceGray", 1, false),
        png::ColorType::GrayscaleAlpha => ("DeviceGray", 2, true),
        png::ColorType::Rgb => ("DeviceRGB", 3, false),
        png::ColorType::Rgba => ("DeviceRGB", 4, true),
        png::ColorType::Indexed => {
            return Err("Indexed PNG was not expanded by the decoder".into());
        }
    };

    let (color, soft_mask) = if has_alpha {
        let color_channels = channels - 1;
        let mut color = Vec::with_capacity(samples.len() / channels * color_channels);
        let mut alpha = Vec::with_capacity(samples.len() / channels);
        for pixel in samples.chunks_exact(channels) {
            color.extend_from_slice(&pixel[..color_channels]);
            alpha.push(pixel[color_channels]);
        }
        // fully opaque images do not need a mask
        let mask = if alpha.iter().all(|&a| a == u8::MAX) {
            None
        } else {
            Some(flate_compress(&alpha)?)
        };
        (color, mask)
    } else {
        (samples.to_vec(), None)
    };

    Ok(PdfImage {
        width: frame.width,
        height: frame.height,
        color_space,
        filter: "FlateDecode",
        data: flate_compress(&color)?,
        soft_mask,
        decode: None,
    })
}

fn prepare_jpeg(bytes: &[u8]) -> Result<PdfImage, String> {
    let frame = jpeg_frame(bytes).map_err(|e| format!("Invalid JPEG: {}", e))?;
    let decoded = image::load_from_memory_with_format(bytes, image::ImageFormat::Jpeg)
        .map_err(|e| format!("Invalid JPEG: {}", e))?;

    let (color_space, decode) = match frame.components {
        1 => ("DeviceGray", None),
        3 => ("DeviceRGB", None),
        4 if frame.adobe => ("DeviceCMYK", Some(INVERTED_CMYK)),
        4 => ("DeviceCMYK", None),
        n => return Err(format!("Unsupported JPEG with {} color components", n)),
    };

    Ok(PdfImage {
        width: decoded.width(),
        height: decoded.height(),
        color_space,
        filter: "DCTDecode",
        data: bytes.to_vec(),
        soft_mask: None,
        decode,
    })
}

/// Component layout from the JPEG frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct JpegFrame {
    components: u8,
    /// An Adobe APP14 segment precedes the frame
    adobe: bool,
}

fn jpeg_frame(bytes: &[u8]) -> Result<JpegFrame, String> {
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return Err("missing start of image".into());
    }
    let mut adobe = false;
    let mut pos = 2;
    loop {
        if bytes.get(pos) != Some(&0xFF) {
            return Err(format!("expected marker at byte {}", pos));
        }
        while bytes.get(pos) == Some(&0xFF) {
            pos += 1;
        }
        let marker = *bytes.get(pos).ok_or("truncated header")?;
        pos += 1;

        match marker {
            // standalone markers carry no length
            0x01 | 0xD0..=0xD7 => continue,
            0xD9 | 0xDA => return Err("no frame header before image data".into()),
            _ => {}
        }

        let length = match bytes.get(pos..pos + 2) {
            Some(&[high, low]) => usize::from(u16::from_be_bytes([high, low])),
            _ => return Err("truncated header".into()),
        };
        let segment = bytes
            .get(pos + 2..pos + length.max(2))
            .ok_or("truncated segment")?;

        match marker {
            ADOBE_MARKER if segment.starts_with(b"Adobe") => adobe = true,
            // SOF0-SOF15, except DHT, JPG and DAC which share the range
            0xC0..=0xCF if !matches!(marker, 0xC4 | 0xC8 | 0xCC) => {
                let components = *segment.get(5).ok_or("truncated frame header")?;
                return Ok(JpegFrame { components, adobe });
            }
            _ => {}
        }
        pos += length.max(2);
    }
}

fn flate_compress(data: &[u8]) -> Result<Vec<u8>, String> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| format!("Compression failed: {}", e))?;
    encoder
        .finish()
        .map_err(|e| format!("Compression failed: {}", e))
}
