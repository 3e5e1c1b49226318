//! Horizontal SNR bar with a fixed 0..40 dB scale.

use super::sink::RenderSink;
use super::{Point, Rect, theme};

pub const SNR_LIMIT_DB: u32 = 40;
const TICK_STEP_DB: u32 = 5;
const LABEL_STEP_DB: u32 = 10;
const BAR_HEIGHT: f32 = 10.0;
const TICK_BOTTOM: f32 = 15.0;
const LABEL_TOP: f32 = 16.0;

#[derive(Debug, Clone, PartialEq)]
pub struct MeterLabel {
    pub db: u32,
    pub x: f32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnrMeter {
    pub fill: Rect,
    /// x positions of the ticks, every 5 dB.
    pub ticks: Vec<f32>,
    pub labels: Vec<MeterLabel>,
    origin: Point,
    width: f32,
    scale: f32,
}

impl SnrMeter {
    pub fn compute(snr_db: f32, origin: Point, width: f32, ui_scale: f32) -> Self {
        let scale = ui_scale.max(0.1);
        let snr = if snr_db.is_finite() {
            snr_db.clamp(0.0, SNR_LIMIT_DB as f32)
        } else {
            0.0
        };
        let ratio = width / SNR_LIMIT_DB as f32;

        let fill = Rect::from_coords(
            origin.x,
            origin.y + 1.0,
            origin.x + (snr * ratio).round(),
            origin.y + BAR_HEIGHT * scale,
        );

        let ticks = (0..=SNR_LIMIT_DB)
            .step_by(TICK_STEP_DB as usize)
            .map(|db| origin.x + (db as f32 * ratio).round())
            .collect();

        let labels = (0..=SNR_LIMIT_DB)
            .step_by(LABEL_STEP_DB as usize)
            .map(|db| MeterLabel {
                db,
                x: origin.x + db as f32 * ratio,
                text: if db == SNR_LIMIT_DB {
                    format!("{db} dB")
                } else {
                    db.to_string()
                },
            })
            .collect();

        Self {
            fill,
            ticks,
            labels,
            origin,
            width,
            scale,
        }
    }

    pub fn draw(&self, sink: &mut dyn RenderSink) {
        let baseline = self.origin.y + BAR_HEIGHT * self.scale - 1.0;
        sink.filled_rect(self.fill.min, self.fill.max, theme::METER_FILL);
        sink.line(
            self.origin,
            Point::new(self.origin.x, baseline),
            theme::TEXT,
            self.scale,
        );
        sink.line(
            Point::new(self.origin.x, baseline),
            Point::new(self.origin.x + self.width + 1.0, baseline),
            theme::TEXT,
            self.scale,
        );

        for &x in &self.ticks {
            sink.line(
                Point::new(x, baseline),
                Point::new(x, self.origin.y + TICK_BOTTOM * self.scale - 1.0),
                theme::TEXT,
                self.scale,
            );
        }

        for label in &self.labels {
            let size = sink.text_size(&label.text);
            sink.text(
                Point::new(
                    (label.x - size.x / 2.0).round() + 1.0,
                    self.origin.y + LABEL_TOP * self.scale,
                ),
                theme::TEXT,
                &label.text,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::sink::DrawList;

    #[test]
    fn fills_proportionally_and_clamps() {
        let meter = SnrMeter::compute(20.0, Point::new(0.0, 0.0), 200.0, 1.0);
        assert_eq!(meter.fill.max.x, 100.0);
        let meter = SnrMeter::compute(90.0, Point::new(0.0, 0.0), 200.0, 1.0);
        assert_eq!(meter.fill.max.x, 200.0);
        let meter = SnrMeter::compute(f32::NAN, Point::new(0.0, 0.0), 200.0, 1.0);
        assert_eq!(meter.fill.max.x, 0.0);
    }

    #[test]
    fn ticks_every_five_labels_every_ten() {
        let meter = SnrMeter::compute(0.0, Point::new(10.0, 0.0), 200.0, 1.0);
        assert_eq!(meter.ticks.len(), 9);
        let texts: Vec<&str> = meter.labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["0", "10", "20", "30", "40 dB"]);

        let mut list = DrawList::default();
        meter.draw(&mut list);
        assert_eq!(list.texts().count(), 5);
    }
}
