//! Widget geometry: FFT area, frequency scale and waterfall.

use super::{Point, Rect};

/// Smallest widget edge that is laid out; smaller sizes keep the old layout.
pub const MIN_WIDGET_SIZE: f32 = 100.0;
pub const MIN_FFT_AREA_HEIGHT: f32 = 150.0;
pub const DEFAULT_FFT_AREA_HEIGHT: f32 = 300.0;

const LEFT_MARGIN: f32 = 50.0;
const HORIZONTAL_MARGINS: f32 = 60.0;
const TOP_MARGIN: f32 = 9.0;
const SCALE_HEIGHT: f32 = 40.0;
/// Space under the FFT plot reserved for the scale and spacing.
const FFT_BOTTOM_RESERVE: f32 = 50.0;
/// Half height of the FFT/waterfall splitter hit zone.
const SPLITTER_HALF_HEIGHT: f32 = 2.0;
const GRIP_HALF_WIDTH: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub widget: Rect,
    pub fft_area: Rect,
    pub freq_area: Rect,
    pub waterfall: Option<Rect>,
    /// Requested height of the FFT area including its scale.
    pub fft_area_height: f32,
    pub fft_height: f32,
    pub data_width: usize,
    pub waterfall_height: usize,
    pub ui_scale: f32,
    /// Frequency labels that fit across the FFT area.
    pub max_h_steps: usize,
    /// Level labels that fit down the FFT area.
    pub max_v_steps: usize,
}

impl Layout {
    /// Lays out `widget`. `label_size` is the drawn size of a `000.000` label.
    /// Returns `None` when the widget is below [`MIN_WIDGET_SIZE`].
    pub fn compute(
        widget: Rect,
        fft_area_height: f32,
        waterfall_visible: bool,
        ui_scale: f32,
        label_size: Point,
    ) -> Option<Self> {
        let width = widget.width();
        let height = widget.height();
        if width < MIN_WIDGET_SIZE || height < MIN_WIDGET_SIZE {
            return None;
        }

        let scale = ui_scale.max(0.1);
        let reserve = FFT_BOTTOM_RESERVE * scale;

        let (fft_area_height, fft_height, waterfall_height) = if waterfall_visible {
            let area = fft_area_height.min(height - reserve);
            let fft_height = (area - reserve).max(1.0);
            let waterfall_height = (height - fft_height - reserve - 2.0).max(1.0);
            (area, fft_height, waterfall_height as usize)
        } else {
            (fft_area_height, (height - reserve).max(1.0), 0)
        };

        let data_width = (width - HORIZONTAL_MARGINS * scale).max(1.0) as usize;

        let fft_min = Point::new(
            widget.min.x + LEFT_MARGIN * scale,
            widget.min.y + TOP_MARGIN * scale,
        );
        let fft_area = Rect::new(
            fft_min,
            Point::new(fft_min.x + data_width as f32, fft_min.y + fft_height + 1.0),
        );
        let freq_area = Rect::from_coords(
            fft_area.min.x,
            fft_area.max.y + 1.0,
            fft_area.max.x,
            fft_area.max.y + SCALE_HEIGHT * scale,
        );
        let waterfall = waterfall_visible.then(|| {
            let top = freq_area.max.y + 1.0;
            Rect::from_coords(
                fft_area.min.x,
                top,
                fft_area.min.x + data_width as f32,
                top + waterfall_height as f32,
            )
        });

        let max_h_steps = (data_width as f32 / (3.0 * label_size.x).max(1.0)) as usize;
        let max_v_steps = (fft_height / label_size.y.max(1.0)) as usize;

        Some(Self {
            widget,
            fft_area,
            freq_area,
            waterfall,
            fft_area_height,
            fft_height,
            data_width,
            waterfall_height,
            ui_scale: scale,
            max_h_steps,
            max_v_steps,
        })
    }

    pub fn grip_size(&self) -> f32 {
        GRIP_HALF_WIDTH * self.ui_scale
    }

    /// Drag origin sits on the FFT/waterfall splitter.
    pub fn on_splitter(&self, point: Point) -> bool {
        let splitter_y = self.widget.min.y + self.fft_area_height;
        let half = SPLITTER_HALF_HEIGHT * self.ui_scale;
        point.x > self.widget.min.x
            && point.x < self.widget.max.x
            && point.y >= splitter_y - half
            && point.y <= splitter_y + half
    }

    /// FFT area height for a splitter dragged to `pointer_y`.
    pub fn splitter_height(&self, pointer_y: f32) -> f32 {
        clamp_fft_area_height(pointer_y - self.widget.min.y, self.widget.height())
    }
}

/// Limits the FFT area to `[150, widget_height - 50]`.
pub fn clamp_fft_area_height(requested: f32, widget_height: f32) -> f32 {
    let upper = (widget_height - FFT_BOTTOM_RESERVE).max(MIN_FFT_AREA_HEIGHT);
    requested.max(MIN_FFT_AREA_HEIGHT).min(upper)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label() -> Point {
        Point::new(49.0, 13.0)
    }

    #[test]
    fn splits_widget_into_areas() {
        let widget = Rect::from_coords(0.0, 0.0, 1060.0, 800.0);
        let layout = Layout::compute(widget, 300.0, true, 1.0, label()).unwrap();

        assert_eq!(layout.data_width, 1000);
        assert_eq!(layout.fft_height, 250.0);
        assert_eq!(layout.fft_area, Rect::from_coords(50.0, 9.0, 1050.0, 260.0));
        assert_eq!(layout.freq_area, Rect::from_coords(50.0, 261.0, 1050.0, 300.0));
        assert_eq!(layout.waterfall_height, 498);
        assert_eq!(
            layout.waterfall,
            Some(Rect::from_coords(50.0, 301.0, 1050.0, 799.0))
        );
        assert_eq!(layout.max_h_steps, 6);
        assert_eq!(layout.max_v_steps, 19);
    }

    #[test]
    fn hidden_waterfall_gives_fft_the_height() {
        let widget = Rect::from_coords(0.0, 0.0, 1060.0, 800.0);
        let layout = Layout::compute(widget, 300.0, false, 1.0, label()).unwrap();
        assert_eq!(layout.fft_height, 750.0);
        assert!(layout.waterfall.is_none());
    }

    #[test]
    fn too_small_is_rejected() {
        let widget = Rect::from_coords(0.0, 0.0, 99.0, 800.0);
        assert!(Layout::compute(widget, 300.0, true, 1.0, label()).is_none());
    }

    #[test]
    fn fft_area_height_is_clamped() {
        assert_eq!(clamp_fft_area_height(20.0, 800.0), 150.0);
        assert_eq!(clamp_fft_area_height(900.0, 800.0), 750.0);
        assert_eq!(clamp_fft_area_height(400.0, 120.0), 150.0);
    }

    #[test]
    fn splitter_hit_zone() {
        let widget = Rect::from_coords(0.0, 0.0, 1060.0, 800.0);
        let layout = Layout::compute(widget, 300.0, true, 1.0, label()).unwrap();
        assert!(layout.on_splitter(Point::new(500.0, 301.5)));
        assert!(!layout.on_splitter(Point::new(500.0, 310.0)));
        assert_eq!(layout.splitter_height(420.0), 420.0);
    }
}
