use super::{DisplayRanges, Drag, ViewCore};
use crate::bandplan::{BandPlan, BandPlanStore};
use crate::view::axis::{self, TickKind, format_frequency};
use crate::view::layout::Layout;
use crate::view::overlay::{self, BandPlanPosition, row_bottom, row_height};
use crate::view::sink::TextureId;
use crate::view::{FrequencyProjector, Point, Rect, RenderSink, Vfo, ViewWindow, theme};
use crate::util::color::Rgba;
use std::sync::Arc;

const MAJOR_TICK: f32 = 11.0;
const MEDIUM_TICK: f32 = 7.0;
const MINOR_TICK: f32 = 4.0;
const LEVEL_LABEL_GAP: f32 = 10.0;

fn outline(sink: &mut dyn RenderSink, rect: Rect, color: Rgba, thickness: f32) {
    let (min, max) = (rect.min, rect.max);
    sink.line(min, Point::new(max.x, min.y), color, thickness);
    sink.line(Point::new(max.x, min.y), max, color, thickness);
    sink.line(max, Point::new(min.x, max.y), color, thickness);
    sink.line(Point::new(min.x, max.y), min, color, thickness);
}

/// Copy of everything one frame draws. Drawing it holds no lock.
pub(super) struct Scene {
    layout: Layout,
    window: ViewWindow,
    ranges: DisplayRanges,
    h_range: f64,
    v_range: f32,
    latest: Option<Vec<f32>>,
    hold: Option<Vec<f32>>,
    vfos: Vec<Vfo>,
    selected: Option<String>,
    last_position: Option<Point>,
    store: Arc<BandPlanStore>,
    band_plans: Vec<Arc<BandPlan>>,
    band_plan_position: BandPlanPosition,
    band_plan_visible: bool,
    /// Pending splitter height while it is being dragged.
    splitter: Option<f32>,
}

impl ViewCore {
    pub(super) fn scene(&self) -> Option<Scene> {
        Some(Scene {
            layout: self.layout?,
            window: self.window,
            ranges: self.ranges,
            h_range: self.h_range,
            v_range: self.v_range,
            latest: self.trace.has_data().then(|| self.trace.latest().to_vec()),
            hold: self.trace.hold().map(<[f32]>::to_vec),
            vfos: self.vfos.clone(),
            selected: self.selected.clone(),
            last_position: self.last_position,
            store: Arc::clone(&self.store),
            band_plans: self.band_plans.clone(),
            band_plan_position: self.band_plan_position,
            band_plan_visible: self.band_plan_visible,
            splitter: (self.drag == Drag::Splitter).then_some(self.pending_fft_area_height),
        })
    }
}

impl Scene {
    pub(super) fn draw(&self, sink: &mut dyn RenderSink, texture: TextureId) {
        let layout = self.layout;
        let scale = layout.ui_scale;
        let widget = layout.widget;

        sink.filled_rect(widget.min, widget.max, theme::BACKGROUND);
        outline(sink, widget, theme::GRID, scale);
        sink.line(
            Point::new(widget.min.x, layout.freq_area.max.y),
            Point::new(widget.max.x, layout.freq_area.max.y),
            theme::GRID,
            scale,
        );

        let projector = self
            .window
            .projector(layout.fft_area.min.x as f64, layout.data_width as f64);

        self.draw_fft(sink, &layout, &projector);
        if let Some(area) = layout.waterfall {
            sink.image(texture, area.min, area.max);
            if self.last_position.is_some_and(|p| area.contains(p)) {
                self.draw_waterfall_vfos(sink, scale);
            }
        }
        self.draw_vfos(sink, scale);
        if self.band_plan_visible {
            self.draw_band_plans(sink, &layout, &projector);
        }

        if let Some(height) = self.splitter {
            let y = widget.min.y + height;
            sink.line(
                Point::new(widget.min.x, y),
                Point::new(widget.max.x, y),
                theme::RESIZE_GUIDE,
                scale,
            );
        }
    }

    fn draw_fft(&self, sink: &mut dyn RenderSink, layout: &Layout, projector: &FrequencyProjector) {
        let fft = layout.fft_area;
        let scale = layout.ui_scale;
        let DisplayRanges { fft_min, fft_max, .. } = self.ranges;
        let span = fft_max - fft_min;
        let factor = if span > 0.0 { layout.fft_height / span } else { 0.0 };
        let to_y = |db: f32| (fft.max.y - (db - fft_min) * factor).clamp(fft.min.y + 1.0, fft.max.y);

        for level in axis::level_grid(fft_min, fft_max, self.v_range) {
            let y = (fft.max.y - (level - fft_min) * factor).round();
            sink.line(Point::new(fft.min.x, y), Point::new(fft.max.x, y), theme::GRID, scale);
            let label = (level as i32).to_string();
            let size = sink.text_size(&label);
            sink.text(
                Point::new(
                    fft.min.x - size.x - LEVEL_LABEL_GAP * scale,
                    (y - size.y / 2.0).round(),
                ),
                theme::TEXT,
                &label,
            );
        }

        for tick in axis::frequency_ticks(projector, self.h_range) {
            let x = tick.x.round() as f32;
            let length = match tick.kind {
                TickKind::Major => MAJOR_TICK,
                TickKind::Medium => MEDIUM_TICK,
                TickKind::Minor => MINOR_TICK,
            } * scale;

            if tick.kind == TickKind::Major {
                sink.line(
                    Point::new(x, fft.min.y + 1.0),
                    Point::new(x, fft.max.y),
                    theme::GRID,
                    scale,
                );
                let label = format_frequency(tick.freq);
                let size = sink.text_size(&label);
                sink.text(
                    Point::new((tick.x as f32 - size.x / 2.0).round(), fft.max.y + size.y),
                    theme::TEXT,
                    &label,
                );
            }
            sink.line(
                Point::new(x, fft.max.y),
                Point::new(x, fft.max.y + length),
                theme::TEXT,
                scale,
            );
        }

        if let Some(line) = &self.latest {
            for i in 1..line.len() {
                let (x0, x1) = (fft.min.x + (i - 1) as f32, fft.min.x + i as f32);
                let (y0, y1) = (to_y(line[i - 1]).round(), to_y(line[i]).round());
                sink.line(Point::new(x0, y0), Point::new(x1, y1), theme::TRACE, 1.0);
                sink.line(Point::new(x1, y1), Point::new(x1, fft.max.y), theme::TRACE_SHADOW, 1.0);
            }
        }

        if let Some(hold) = &self.hold {
            for i in 1..hold.len() {
                let (x0, x1) = (fft.min.x + (i - 1) as f32, fft.min.x + i as f32);
                let (y0, y1) = (to_y(hold[i - 1]).round(), to_y(hold[i]).round());
                sink.line(Point::new(x0, y0), Point::new(x1, y1), theme::TRACE_HOLD, 1.0);
            }
        }

        sink.line(
            Point::new(fft.min.x, fft.max.y),
            Point::new(fft.max.x, fft.max.y),
            theme::TEXT,
            scale,
        );
        sink.line(
            Point::new(fft.min.x, fft.min.y),
            Point::new(fft.min.x, fft.max.y - 1.0),
            theme::TEXT,
            scale,
        );
    }

    fn line_color(&self, name: &str) -> Rgba {
        if self.selected.as_deref() == Some(name) {
            theme::VFO_LINE_SELECTED
        } else {
            theme::VFO_LINE
        }
    }

    fn draw_vfos(&self, sink: &mut dyn RenderSink, scale: f32) {
        for vfo in &self.vfos {
            let geometry = vfo.geometry();
            sink.filled_rect(geometry.rect.min, geometry.rect.max, vfo.color());
            if geometry.line_visible {
                let (from, to) = geometry.line;
                sink.line(from, to, self.line_color(vfo.name()), scale);
            }
            if vfo.notch_visible() {
                sink.filled_rect(geometry.notch.min, geometry.notch.max, theme::VFO_NOTCH);
            }
        }
    }

    fn draw_waterfall_vfos(&self, sink: &mut dyn RenderSink, scale: f32) {
        for vfo in &self.vfos {
            let geometry = vfo.geometry();
            sink.filled_rect(geometry.wf_rect.min, geometry.wf_rect.max, vfo.color());
            if geometry.line_visible {
                let (from, to) = geometry.wf_line;
                sink.line(from, to, self.line_color(vfo.name()), scale);
            }
        }
    }

    fn draw_band_plans(
        &self,
        sink: &mut dyn RenderSink,
        layout: &Layout,
        projector: &FrequencyProjector,
    ) {
        let height = row_height(sink.text_size("0").y);
        for (row, plan) in self.band_plans.iter().enumerate() {
            let bottom = row_bottom(layout.fft_area, row, height, self.band_plan_position);
            let segments = overlay::layout_row(plan, projector, layout.fft_area, bottom, height, |text| {
                sink.text_size(text)
            });
            overlay::draw_row(sink, &segments, &self.store, layout.ui_scale);
        }
    }
}
