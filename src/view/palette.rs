use super::theme::DEFAULT_COLOR_MAP;
use crate::util::color::Rgba;

/// Number of entries in the waterfall colour table.
pub const DEFAULT_RESOLUTION: usize = 1024;

/// Lookup table from normalised magnitude to colour.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteMapper {
    table: Vec<Rgba>,
}

impl Default for PaletteMapper {
    fn default() -> Self {
        Self::new(&DEFAULT_COLOR_MAP, DEFAULT_RESOLUTION)
    }
}

impl PaletteMapper {
    /// Interpolates `colors` into a table of `resolution` opaque entries.
    ///
    /// Entry `i` sits at position `p = i / resolution * colors.len()` and blends
    /// `colors[floor(p)]` with `colors[ceil(p)]`, both clamped to the last
    /// control point. An empty control list yields a black table.
    pub fn new(colors: &[[u8; 3]], resolution: usize) -> Self {
        let resolution = resolution.max(1);
        if colors.is_empty() {
            return Self {
                table: vec![Rgba::BLACK; resolution],
            };
        }

        let count = colors.len();
        let last = count - 1;
        let table = (0..resolution)
            .map(|i| {
                let position = i as f64 / resolution as f64 * count as f64;
                let lower = (position.floor() as usize).min(last);
                let upper = (position.ceil() as usize).min(last);
                let ratio = position - lower as f64;
                let channel = |c: usize| {
                    let a = colors[lower][c] as f64;
                    let b = colors[upper][c] as f64;
                    (a * (1.0 - ratio) + b * ratio).clamp(0.0, 255.0) as u8
                };
                Rgba::opaque(channel(0), channel(1), channel(2))
            })
            .collect();

        Self { table }
    }

    pub fn resolution(&self) -> usize {
        self.table.len()
    }

    pub fn table(&self) -> &[Rgba] {
        &self.table
    }

    /// `normalized` is clamped to `[0, 1]`.
    #[inline]
    pub fn map(&self, normalized: f32) -> Rgba {
        let max_index = self.table.len() - 1;
        let index = (normalized.clamp(0.0, 1.0) * max_index as f32) as usize;
        self.table[index.min(max_index)]
    }

    /// Maps a dB value through the `[min, max]` display range.
    #[inline]
    pub fn map_db(&self, value: f32, min: f32, max: f32) -> Rgba {
        let range = max - min;
        if range <= 0.0 {
            return self.table[0];
        }
        self.map((value.clamp(min, max) - min) / range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_to_white_is_monotonic_ramp() {
        let palette = PaletteMapper::new(&[[0, 0, 0], [255, 255, 255]], 100);
        assert_eq!(palette.resolution(), 100);
        for pair in palette.table().windows(2) {
            assert!(pair[1].r() >= pair[0].r());
            assert_eq!(pair[1].r(), pair[1].g());
            assert_eq!(pair[1].g(), pair[1].b());
            assert_eq!(pair[1].a(), 255);
        }
        assert_eq!(palette.table()[0], Rgba::BLACK);
        assert!(palette.table()[99].r() > 250);
    }

    #[test]
    fn default_table_starts_at_first_control_point() {
        let palette = PaletteMapper::default();
        assert_eq!(palette.resolution(), DEFAULT_RESOLUTION);
        assert_eq!(palette.map(0.0), Rgba::opaque(0x00, 0x00, 0x20));
    }

    #[test]
    fn map_db_clamps_out_of_range() {
        let palette = PaletteMapper::new(&[[0, 0, 0], [255, 255, 255]], 100);
        assert_eq!(palette.map_db(-500.0, -70.0, 0.0), palette.table()[0]);
        assert_eq!(palette.map_db(50.0, -70.0, 0.0), palette.table()[99]);
        assert_eq!(palette.map_db(-10.0, 0.0, 0.0), palette.table()[0]);
    }

    #[test]
    fn empty_control_list_is_black() {
        let palette = PaletteMapper::new(&[], 8);
        assert!(palette.table().iter().all(|&c| c == Rgba::BLACK));
    }
}
