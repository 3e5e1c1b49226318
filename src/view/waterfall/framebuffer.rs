//! Pixel store behind the waterfall texture.

use crate::util::color::Rgba;

/// Bytes handed to the host for texture upload, row-major RGBA8.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameUpload {
    pub width: usize,
    pub height: usize,
    pub bytes: Vec<u8>,
}

/// Row 0 is the newest line.
#[derive(Debug, Clone, Default)]
pub(crate) struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
    dirty: bool,
}

impl Framebuffer {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocates to `width * height` transparent pixels.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, Rgba::TRANSPARENT);
        self.dirty = true;
    }

    /// Moves every row down by one and returns the freed top row.
    pub fn scroll_down(&mut self) -> &mut [Rgba] {
        let width = self.width;
        if self.height > 1 {
            let keep = width * (self.height - 1);
            self.pixels.copy_within(0..keep, width);
        }
        self.dirty = true;
        let len = width.min(self.pixels.len());
        &mut self.pixels[..len]
    }

    pub fn row_mut(&mut self, row: usize) -> Option<&mut [Rgba]> {
        if row >= self.height {
            return None;
        }
        self.dirty = true;
        let start = row * self.width;
        Some(&mut self.pixels[start..start + self.width])
    }

    pub fn row(&self, row: usize) -> Option<&[Rgba]> {
        (row < self.height).then(|| &self.pixels[row * self.width..(row + 1) * self.width])
    }

    pub fn fill_from(&mut self, row: usize, color: Rgba) {
        let start = (row * self.width).min(self.pixels.len());
        self.pixels[start..].fill(color);
        self.dirty = true;
    }

    /// Copies the pixels out if anything changed since the last upload.
    pub fn take_upload(&mut self) -> Option<FrameUpload> {
        if !self.dirty || self.pixels.is_empty() {
            return None;
        }
        self.dirty = false;
        Some(FrameUpload {
            width: self.width,
            height: self.height,
            bytes: bytemuck::cast_slice(&self.pixels).to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_moves_rows_down() {
        let mut fb = Framebuffer::default();
        fb.resize(2, 3);
        fb.scroll_down().fill(Rgba::WHITE);
        fb.scroll_down().fill(Rgba::BLACK);

        assert_eq!(fb.row(0), Some(&[Rgba::BLACK, Rgba::BLACK][..]));
        assert_eq!(fb.row(1), Some(&[Rgba::WHITE, Rgba::WHITE][..]));
        assert_eq!(fb.row(2), Some(&[Rgba::TRANSPARENT, Rgba::TRANSPARENT][..]));
    }

    #[test]
    fn scroll_on_empty_buffer_yields_empty_row() {
        let mut fb = Framebuffer::default();
        assert!(fb.scroll_down().is_empty());

        fb.resize(3, 1);
        let row = fb.scroll_down();
        assert_eq!(row.len(), 3);
        row.fill(Rgba::WHITE);
        assert_eq!(fb.row(0), Some(&[Rgba::WHITE; 3][..]));
    }

    #[test]
    fn upload_only_when_dirty() {
        let mut fb = Framebuffer::default();
        fb.resize(4, 2);
        let upload = fb.take_upload().unwrap();
        assert_eq!(upload.bytes.len(), 4 * 2 * 4);
        assert!(fb.take_upload().is_none());

        fb.fill_from(1, Rgba::WHITE);
        let upload = fb.take_upload().unwrap();
        assert_eq!(&upload.bytes[16..20], &[255, 255, 255, 255]);
        assert_eq!(&upload.bytes[..4], &[0, 0, 0, 0]);
    }
}
