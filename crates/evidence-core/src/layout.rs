//! Page geometry for generated evidence pages
//!
//! All values are PDF points with the origin at the bottom-left corner.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub caption_font_size: f32,
}

impl PageLayout {
    /// The page minus the margin on all four sides
    pub fn printable_area(&self) -> Rect {
        Rect {
            x: self.margin,
            y: self.margin,
            width: self.width - 2.0 * self.margin,
            height: self.height - 2.0 * self.margin,
        }
    }

    /// Largest rectangle with the image's aspect ratio that fits the
    /// printable area, centred in it. Images are scaled up as well as down.
    ///
    /// Returns `None` for an image with a zero dimension.
    pub fn fit_image(&self, pixel_width: u32, pixel_height: u32) -> Option<Rect> {
        if pixel_width == 0 || pixel_height == 0 {
            return None;
        }
        let area = self.printable_area();
        let (w, h) = (pixel_width as f32, pixel_height as f32);
        let scale = (area.width / w).min(area.height / h);
        let width = w * scale;
        let height = h * scale;
        Some(Rect {
            x: area.x + (area.width - width) / 2.0,
            y: area.y + (area.height - height) / 2.0,
            width,
            height,
        })
    }

    /// Baseline origin of the caption, vertically centred in the top margin band
    pub fn caption_origin(&self) -> (f32, f32) {
        let band = self.margin.max(self.caption_font_size);
        let baseline = self.height - band + (band - self.caption_font_size) / 2.0;
        (self.margin, baseline)
    }

    /// Baseline of the first text line inside the printable area
    pub fn text_origin(&self, font_size: f32) -> (f32, f32) {
        (self.margin, self.height - self.margin - font_size)
    }
}
