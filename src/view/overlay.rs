//! Band plan rows drawn over the FFT area.

use super::projector::FrequencyProjector;
use super::sink::RenderSink;
use super::{Point, Rect, theme};
use crate::bandplan::{BandPlan, BandPlanStore, GUARD_TYPE};
use serde::{Deserialize, Serialize};

/// Row height relative to the text height.
const ROW_HEIGHT_FACTOR: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandPlanPosition {
    /// Rows stack upward from the bottom of the FFT area.
    #[default]
    Bottom,
    /// Rows stack downward from the top of the FFT area.
    Top,
}

/// One allocation's box inside a segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub kind: String,
    pub top: f32,
    pub bottom: f32,
    pub guard: bool,
    pub start_tick: bool,
    pub end_tick: bool,
}

/// A band clipped to the view and projected to pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub left: f32,
    pub right: f32,
    pub cells: Vec<Cell>,
    pub caption: Option<(Point, String)>,
}

pub fn row_height(text_height: f32) -> f32 {
    text_height * ROW_HEIGHT_FACTOR
}

/// Bottom edge of row `row` in `fft_area`.
pub fn row_bottom(fft_area: Rect, row: usize, height: f32, position: BandPlanPosition) -> f32 {
    match position {
        BandPlanPosition::Bottom => fft_area.max.y - height * row as f32,
        BandPlanPosition::Top => fft_area.min.y + height + 1.0 + height * row as f32,
    }
}

/// Projects the bands of `plan` that intersect the projector's span.
///
/// Bands narrower than one pixel get no cells. Each allocation is drawn in
/// its stack slot with an equal share of the row height; boundary ticks are
/// kept only where the allocation really starts or ends and that edge lies
/// inside the view. A lone allocation gets a centred caption when it fits.
pub fn layout_row(
    plan: &BandPlan,
    projector: &FrequencyProjector,
    fft_area: Rect,
    bottom: f32,
    height: f32,
    text_size: impl Fn(&str) -> Point,
) -> Vec<Segment> {
    let lower = projector.lower();
    let upper = projector.upper();
    let min_x = fft_area.min.x as f64;

    plan.bands_in(lower, upper)
        .into_iter()
        .map(|band| {
            let start_in_view = band.start >= lower;
            let end_in_view = band.end < upper;
            let start = band.start.clamp(lower, upper);
            let end = band.end.clamp(lower, upper);

            let mut left = projector.to_pixel(start);
            let mut right = projector.to_pixel(end);
            let width = right - left;
            if left <= min_x {
                left = min_x + 1.0;
            }
            if right <= min_x {
                right = min_x + 1.0;
            }

            let mut cells = Vec::new();
            if width >= 1.0 {
                let depth = band.depth().max(1);
                let share = height / depth as f32;
                for label in &band.labels {
                    let cell_bottom = bottom - share * label.slot as f32;
                    cells.push(Cell {
                        kind: label.kind.clone(),
                        top: cell_bottom - share,
                        bottom: cell_bottom,
                        guard: label.kind == GUARD_TYPE,
                        start_tick: start_in_view && label.visible_start,
                        end_tick: end_in_view && label.visible_end,
                    });
                }
            }

            let caption = match band.labels.as_slice() {
                [only] => {
                    let size = text_size(&only.name);
                    ((size.x as f64) <= width).then(|| {
                        let centre = projector.to_pixel((start + end) / 2.0) as f32;
                        (
                            Point::new(
                                centre - size.x / 2.0,
                                bottom - height / 2.0 - size.y / 2.0,
                            ),
                            only.name.clone(),
                        )
                    })
                }
                _ => None,
            };

            Segment {
                left: left.round() as f32,
                right: right.round() as f32,
                cells,
                caption,
            }
        })
        .collect()
}

pub fn draw_row(
    sink: &mut dyn RenderSink,
    segments: &[Segment],
    store: &BandPlanStore,
    ui_scale: f32,
) {
    for segment in segments {
        let (left, right) = (segment.left, segment.right);
        for cell in &segment.cells {
            let color = store.color_for(&cell.kind);
            if cell.guard {
                sink.line(
                    Point::new(left, cell.top),
                    Point::new(right, cell.bottom),
                    color.translucent,
                    ui_scale,
                );
                sink.line(
                    Point::new(left, cell.bottom),
                    Point::new(right, cell.top),
                    color.translucent,
                    ui_scale,
                );
            } else {
                sink.filled_rect(
                    Point::new(left, cell.top),
                    Point::new(right, cell.bottom),
                    color.translucent,
                );
            }

            if cell.start_tick {
                sink.line(
                    Point::new(left, cell.top),
                    Point::new(left, cell.bottom),
                    color.value,
                    ui_scale,
                );
            }
            if cell.end_tick {
                sink.line(
                    Point::new(right, cell.top),
                    Point::new(right, cell.bottom),
                    color.value,
                    ui_scale,
                );
            }
        }

        if let Some((position, text)) = &segment.caption {
            sink.text(*position, theme::TEXT, text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bandplan::Allocation;
    use crate::view::sink::{DrawCommand, DrawList};

    fn fft_area() -> Rect {
        Rect::from_coords(50.0, 9.0, 1050.0, 260.0)
    }

    fn text_size(text: &str) -> Point {
        Point::new(text.len() as f32 * 7.0, 13.0)
    }

    #[test]
    fn rows_stack_by_position() {
        let area = fft_area();
        assert_eq!(row_bottom(area, 0, 20.0, BandPlanPosition::Bottom), 260.0);
        assert_eq!(row_bottom(area, 1, 20.0, BandPlanPosition::Bottom), 240.0);
        assert_eq!(row_bottom(area, 0, 20.0, BandPlanPosition::Top), 30.0);
        assert_eq!(row_bottom(area, 1, 20.0, BandPlanPosition::Top), 50.0);
    }

    #[test]
    fn clips_to_view_and_hides_outside_ticks() {
        let plan = BandPlan::new(
            "test",
            vec![
                Allocation::new("wide", "amateur", 0.0, 500.0),
                Allocation::new("inner", "broadcast", 200.0, 300.0),
            ],
        );
        // 1 px per Hz over [100, 1100).
        let projector = FrequencyProjector::new(50.0, 1000.0, 100.0, 1100.0);
        let segments = layout_row(&plan, &projector, fft_area(), 260.0, 20.0, text_size);

        assert_eq!(segments.len(), 3);
        let first = &segments[0];
        // Left edge pinned one pixel inside the plot.
        assert_eq!((first.left, first.right), (51.0, 150.0));
        assert!(!first.cells[0].start_tick);
        assert!(!first.cells[0].end_tick);
        assert!(first.caption.is_some());

        let middle = &segments[1];
        assert_eq!(middle.cells.len(), 2);
        assert_eq!(middle.cells[0].bottom, 260.0);
        assert_eq!(middle.cells[1].bottom, 250.0);
        assert!(middle.cells[1].start_tick && middle.cells[1].end_tick);
        assert!(middle.caption.is_none());

        let last = &segments[2];
        assert!(last.cells[0].end_tick);
    }

    #[test]
    fn guard_is_drawn_as_cross() {
        let plan = BandPlan::new("test", vec![Allocation::new("g", GUARD_TYPE, 100.0, 200.0)]);
        let projector = FrequencyProjector::new(0.0, 1000.0, 0.0, 1000.0);
        let segments = layout_row(&plan, &projector, fft_area(), 260.0, 20.0, text_size);
        assert!(segments[0].cells[0].guard);

        let mut list = DrawList::default();
        draw_row(&mut list, &segments, &BandPlanStore::new(), 1.0);
        let filled = list
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::FilledRect { .. }))
            .count();
        assert_eq!(filled, 0);
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["g"]);
    }

    #[test]
    fn sub_pixel_band_has_no_cells() {
        let plan = BandPlan::new("test", vec![Allocation::new("tiny", "t", 100.0, 100.5)]);
        let projector = FrequencyProjector::new(0.0, 1000.0, 0.0, 1000.0);
        let segments = layout_row(&plan, &projector, fft_area(), 260.0, 20.0, text_size);
        assert!(segments[0].cells.is_empty());
        assert!(segments[0].caption.is_none());
    }
}
