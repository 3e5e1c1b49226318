//! Fixed colours of the spectral view.

use crate::util::color::Rgba;

/// Control points of the default waterfall colour map, low to high.
pub const DEFAULT_COLOR_MAP: [[u8; 3]; 13] = [
    [0x00, 0x00, 0x20],
    [0x00, 0x00, 0x30],
    [0x00, 0x00, 0x50],
    [0x00, 0x00, 0x91],
    [0x1E, 0x90, 0xFF],
    [0xFF, 0xFF, 0xFF],
    [0xFF, 0xFF, 0x00],
    [0xFE, 0x6D, 0x16],
    [0xFF, 0x00, 0x00],
    [0xC6, 0x00, 0x00],
    [0x9F, 0x00, 0x00],
    [0x75, 0x00, 0x00],
    [0x4A, 0x00, 0x00],
];

pub const BACKGROUND: Rgba = Rgba::opaque(0, 0, 0);
pub const GRID: Rgba = Rgba::opaque(50, 50, 50);
pub const TEXT: Rgba = Rgba::opaque(255, 255, 255);
pub const TRACE: Rgba = Rgba::opaque(0, 136, 255);
pub const TRACE_SHADOW: Rgba = Rgba::new(0, 136, 255, 51);
pub const TRACE_HOLD: Rgba = Rgba::opaque(0, 255, 255);
/// Empty waterfall rows.
pub const WATERFALL_EMPTY: Rgba = Rgba::new(0, 0, 0, 255);

pub const VFO_FILL: Rgba = Rgba::new(255, 255, 255, 50);
pub const VFO_LINE: Rgba = Rgba::opaque(255, 255, 0);
pub const VFO_LINE_SELECTED: Rgba = Rgba::opaque(255, 0, 0);
pub const VFO_NOTCH: Rgba = Rgba::new(255, 0, 0, 127);
pub const RESIZE_GUIDE: Rgba = Rgba::opaque(90, 90, 140);

pub const METER_FILL: Rgba = Rgba::opaque(0, 136, 255);
