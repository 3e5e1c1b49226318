//! Packed RGBA colours shared by the palette, the band plan colour table and
//! the render sink.
//!
//! Colours are stored as `u32` with red in the lowest byte and alpha in the
//! highest, so a `&[Rgba]` slice reinterpreted as bytes on a little-endian
//! host is an `R, G, B, A` texel stream.

use bytemuck::{Pod, Zeroable};
use std::fmt;

/// Alpha used for the translucent fill variant of band plan colours.
pub const TRANSLUCENT_ALPHA: u8 = 100;

#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Rgba(pub u32);

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((a as u32) << 24) | ((b as u32) << 16) | ((g as u32) << 8) | (r as u32))
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    #[inline]
    pub const fn a(self) -> u8 {
        ((self.0 >> 24) & 0xff) as u8
    }

    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self::new(self.r(), self.g(), self.b(), alpha)
    }

    /// Parses `#RRGGBBAA`. Anything else yields `None`.
    pub fn parse_hex(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#')?;
        if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let channel = |index: usize| u8::from_str_radix(&digits[index..index + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?))
    }

    pub fn to_hex(self) -> String {
        format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            self.r(),
            self.g(),
            self.b(),
            self.a()
        )
    }
}

impl fmt::Debug for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rgba({})", self.to_hex())
    }
}

/// Linear blend between two colours, `factor` clamped to `[0, 1]`.
pub fn mix(a: Rgba, b: Rgba, factor: f32) -> Rgba {
    let t = factor.clamp(0.0, 1.0);
    let lerp = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Rgba::new(
        lerp(a.r(), b.r()),
        lerp(a.g(), b.g()),
        lerp(a.b(), b.b()),
        lerp(a.a(), b.a()),
    )
}
