/// Linear map between a frequency span and a pixel span.
///
/// Both the band plan rows and the VFO boxes go through this type so the two
/// overlays stay aligned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyProjector {
    origin_x: f64,
    width: f64,
    lower: f64,
    upper: f64,
}

impl FrequencyProjector {
    pub fn new(origin_x: f64, width: f64, lower: f64, upper: f64) -> Self {
        Self {
            origin_x,
            width,
            lower,
            upper,
        }
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn bandwidth(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn origin_x(&self) -> f64 {
        self.origin_x
    }

    /// Pixels per Hz. Zero for an empty frequency span.
    pub fn scale(&self) -> f64 {
        let span = self.bandwidth();
        if span > 0.0 { self.width / span } else { 0.0 }
    }

    /// Hz per pixel. Zero for an empty pixel span.
    pub fn inverse_scale(&self) -> f64 {
        if self.width > 0.0 {
            self.bandwidth() / self.width
        } else {
            0.0
        }
    }

    pub fn to_pixel(&self, freq: f64) -> f64 {
        self.origin_x + (freq - self.lower) * self.scale()
    }

    pub fn to_freq(&self, x: f64) -> f64 {
        self.lower + (x - self.origin_x) * self.inverse_scale()
    }

    pub fn contains(&self, freq: f64) -> bool {
        freq >= self.lower && freq < self.upper
    }
}
