use super::DB_FLOOR;
use std::fmt;

/// Fixed-capacity circular store of spectral lines.
///
/// Lines live back to back in one flat allocation of `width * capacity`
/// floats; `head` is the slot of the oldest line.
#[derive(Clone)]
pub struct SpectralRingBuffer {
    data: Vec<f32>,
    width: usize,
    capacity: usize,
    head: usize,
    len: usize,
}

impl SpectralRingBuffer {
    pub fn new(width: usize, capacity: usize) -> Self {
        assert!(
            capacity > 0,
            "SpectralRingBuffer capacity must be greater than zero"
        );

        Self {
            data: vec![DB_FLOOR; width * capacity],
            width,
            capacity,
            head: 0,
            len: 0,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    #[inline]
    fn slot(&self, index: usize) -> &[f32] {
        &self.data[index * self.width..(index + 1) * self.width]
    }

    /// Appends `line` as the newest entry, overwriting the oldest when full.
    ///
    /// A line of the wrong length is truncated or padded with [`DB_FLOOR`].
    pub fn push(&mut self, line: &[f32]) {
        let idx = if self.is_full() {
            let current = self.head;
            self.head = (self.head + 1) % self.capacity;
            current
        } else {
            let idx = (self.head + self.len) % self.capacity;
            self.len += 1;
            idx
        };

        let width = self.width;
        let target = &mut self.data[idx * width..(idx + 1) * width];
        let copied = line.len().min(width);
        target[..copied].copy_from_slice(&line[..copied]);
        target[copied..].fill(DB_FLOOR);
    }

    pub fn latest(&self) -> Option<&[f32]> {
        self.line(0)
    }

    /// The line pushed `age` pushes ago; `0` is the newest.
    pub fn line(&self, age: usize) -> Option<&[f32]> {
        if age >= self.len {
            return None;
        }
        let offset = self.len - 1 - age;
        Some(self.slot((self.head + offset) % self.capacity))
    }

    /// The most recent `count` lines, oldest first.
    pub fn window(&self, count: usize) -> Window<'_> {
        let count = count.min(self.len);
        Window {
            buffer: self,
            offset: self.len - count,
            remaining: count,
        }
    }

    pub fn iter(&self) -> Window<'_> {
        self.window(self.len)
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Reallocates to the new geometry, keeping the newest lines in order.
    ///
    /// Lines are resampled to the new width by nearest bin.
    pub fn resize(&mut self, width: usize, capacity: usize) {
        assert!(
            capacity > 0,
            "SpectralRingBuffer capacity must be greater than zero"
        );
        if width == self.width && capacity == self.capacity {
            return;
        }

        let mut resized = Self::new(width, capacity);
        let keep = self.len.min(capacity);
        let mut scratch = vec![DB_FLOOR; width];
        for line in self.window(keep) {
            resample_nearest(line, &mut scratch);
            resized.push(&scratch);
        }
        *self = resized;
    }
}

fn resample_nearest(source: &[f32], target: &mut [f32]) {
    if source.is_empty() {
        target.fill(DB_FLOOR);
        return;
    }
    if source.len() == target.len() {
        target.copy_from_slice(source);
        return;
    }

    let scale = source.len() as f64 / target.len().max(1) as f64;
    for (i, value) in target.iter_mut().enumerate() {
        let src = ((i as f64 + 0.5) * scale) as usize;
        *value = source[src.min(source.len() - 1)];
    }
}

impl fmt::Debug for SpectralRingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectralRingBuffer")
            .field("width", &self.width)
            .field("capacity", &self.capacity)
            .field("len", &self.len)
            .finish()
    }
}

/// Borrowing iterator over a contiguous run of lines, oldest first.
pub struct Window<'a> {
    buffer: &'a SpectralRingBuffer,
    offset: usize,
    remaining: usize,
}

impl<'a> Iterator for Window<'a> {
    type Item = &'a [f32];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let idx = (self.buffer.head + self.offset) % self.buffer.capacity;
        self.offset += 1;
        self.remaining -= 1;
        Some(self.buffer.slot(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for Window<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;
        let idx = (self.buffer.head + self.offset + self.remaining) % self.buffer.capacity;
        Some(self.buffer.slot(idx))
    }
}

impl ExactSizeIterator for Window<'_> {}

impl<'a> IntoIterator for &'a SpectralRingBuffer {
    type Item = &'a [f32];
    type IntoIter = Window<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(value: f32) -> Vec<f32> {
        vec![value; 4]
    }

    fn firsts<'a>(lines: impl Iterator<Item = &'a [f32]>) -> Vec<f32> {
        lines.map(|line| line[0]).collect()
    }

    #[test]
    fn creates_empty() {
        let buffer = SpectralRingBuffer::new(4, 3);
        assert_eq!(buffer.capacity(), 3);
        assert!(buffer.is_empty());
        assert!(buffer.latest().is_none());
    }

    #[test]
    #[should_panic(expected = "SpectralRingBuffer capacity must be greater than zero")]
    fn zero_capacity_panics() {
        let _buffer = SpectralRingBuffer::new(4, 0);
    }

    #[test]
    fn window_returns_lines_in_push_order() {
        let mut buffer = SpectralRingBuffer::new(4, 5);
        for value in 0..5 {
            buffer.push(&line(value as f32));
        }
        assert_eq!(firsts(buffer.window(5)), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(firsts(buffer.window(2)), vec![3.0, 4.0]);
        assert_eq!(firsts(buffer.window(2).rev()), vec![4.0, 3.0]);
    }

    #[test]
    fn push_beyond_capacity_discards_oldest() {
        let mut buffer = SpectralRingBuffer::new(4, 3);
        for value in 0..7 {
            buffer.push(&line(value as f32));
        }
        assert!(buffer.is_full());
        assert_eq!(firsts(buffer.iter()), vec![4.0, 5.0, 6.0]);
        assert_eq!(buffer.latest().unwrap()[0], 6.0);
        assert_eq!(buffer.line(2).unwrap()[0], 4.0);
        assert!(buffer.line(3).is_none());
    }

    #[test]
    fn short_line_is_padded() {
        let mut buffer = SpectralRingBuffer::new(4, 2);
        buffer.data.fill(7.0);
        buffer.push(&[1.0, 2.0]);
        assert_eq!(buffer.latest().unwrap(), &[1.0, 2.0, DB_FLOOR, DB_FLOOR]);
        buffer.push(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(buffer.latest().unwrap(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn shrinking_keeps_newest_in_order() {
        let mut buffer = SpectralRingBuffer::new(4, 4);
        for value in 0..6 {
            buffer.push(&line(value as f32));
        }
        buffer.resize(4, 2);
        assert_eq!(firsts(buffer.iter()), vec![4.0, 5.0]);
    }

    #[test]
    fn growing_keeps_history_and_resamples_width() {
        let mut buffer = SpectralRingBuffer::new(2, 2);
        buffer.push(&[1.0, 2.0]);
        buffer.push(&[3.0, 4.0]);
        buffer.resize(4, 8);
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.window(2).next().unwrap(), &[1.0, 1.0, 2.0, 2.0]);
        assert_eq!(buffer.latest().unwrap(), &[3.0, 3.0, 4.0, 4.0]);
    }
}
