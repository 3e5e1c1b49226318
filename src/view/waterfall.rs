//! Spectrum and waterfall display engine.
//!
//! [`WaterfallView`] owns the spectral history, the view window, the VFOs and
//! the derived display buffers. A producer thread feeds it with
//! [`WaterfallView::push_line`] while the render thread calls
//! [`WaterfallView::frame`] and [`WaterfallView::render`] once per tick.
//!
//! Locking: a reentrant broad lock guards everything except the waterfall
//! pixels, which sit behind a narrow mutex so texture uploads never wait on
//! decimation. The broad lock is always taken first.

mod framebuffer;
mod interaction;
mod render;

pub use framebuffer::FrameUpload;
pub use interaction::Tooltip;

use self::framebuffer::Framebuffer;
use super::layout::{self, DEFAULT_FFT_AREA_HEIGHT, Layout};
use super::meter::SnrMeter;
use super::overlay::BandPlanPosition;
use super::palette::{DEFAULT_RESOLUTION, PaletteMapper};
use super::sink::TextureId;
use super::theme;
use super::vfo::{Vfo, VfoArea, VfoConfig};
use super::{InputState, Point, Rect, RenderSink, ViewWindow, axis};
use crate::bandplan::{BandPlan, BandPlanStore};
use crate::dsp::trace::{DisplayTrace, SnrSmoother, TraceConfig};
use crate::dsp::{DB_FLOOR, Decimator, SignalEstimate, SpectralRingBuffer, estimate_signal};
use crate::settings::ViewSettings;
use crate::util::log;
use parking_lot::{Mutex, ReentrantMutex};
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// Band plans shown at once, one per overlay row.
pub const MAX_BAND_PLANS: usize = 2;
/// Text measured to size the frequency labels.
const LABEL_SAMPLE: &str = "000.000";

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

fn next_texture_id() -> TextureId {
    TextureId(NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed))
}

/// Notifications raised while handling input or view changes.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// Panning past a band edge retuned the centre frequency (Hz).
    CenterFrequencyMoved(f64),
    SelectedVfoChanged(Option<String>),
    VfoMovedByUser { name: String, offset: f64 },
    VfoBandwidthChangedByUser { name: String, bandwidth: f64 },
    /// The FFT/waterfall splitter was released at this height.
    FftAreaResized(f32),
}

pub type Observer = Arc<dyn Fn(&ViewEvent) + Send + Sync>;

/// dB limits of the FFT plot and the waterfall colour scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRanges {
    pub fft_min: f32,
    pub fft_max: f32,
    pub waterfall_min: f32,
    pub waterfall_max: f32,
}

impl Default for DisplayRanges {
    fn default() -> Self {
        Self {
            fft_min: -70.0,
            fft_max: 0.0,
            waterfall_min: -70.0,
            waterfall_max: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
enum Drag {
    #[default]
    Idle,
    Splitter,
    Resize(String),
    Scale,
}

pub(crate) struct ViewCore {
    window: ViewWindow,
    history: SpectralRingBuffer,
    raw_width: usize,
    decimator: Decimator,
    scratch: Vec<f32>,
    trace: DisplayTrace,
    snr: SnrSmoother,
    selected_snr: Option<f32>,
    palette: PaletteMapper,
    ranges: DisplayRanges,
    widget: Rect,
    layout: Option<Layout>,
    fft_area_height: f32,
    pending_fft_area_height: f32,
    label_size: Point,
    ui_scale: f32,
    waterfall_visible: bool,
    full_waterfall_update: bool,
    /// Hz between labelled frequency ticks.
    h_range: f64,
    /// dB between level grid lines.
    v_range: f32,
    vfos: Vec<Vfo>,
    selected: Option<String>,
    store: Arc<BandPlanStore>,
    band_plans: Vec<Arc<BandPlan>>,
    band_plan_position: BandPlanPosition,
    band_plan_visible: bool,
    move_single_click: bool,
    drag: Drag,
    last_position: Option<Point>,
    last_drag_x: f32,
    events: Vec<ViewEvent>,
}

impl ViewCore {
    fn new(store: Arc<BandPlanStore>) -> Self {
        Self {
            window: ViewWindow::default(),
            history: SpectralRingBuffer::new(0, 1),
            raw_width: 0,
            decimator: Decimator::new(),
            scratch: Vec::new(),
            trace: DisplayTrace::new(TraceConfig::default()),
            snr: SnrSmoother::default(),
            selected_snr: None,
            palette: PaletteMapper::default(),
            ranges: DisplayRanges::default(),
            widget: Rect::default(),
            layout: None,
            fft_area_height: DEFAULT_FFT_AREA_HEIGHT,
            pending_fft_area_height: DEFAULT_FFT_AREA_HEIGHT,
            label_size: Point::new(49.0, 13.0),
            ui_scale: 1.0,
            waterfall_visible: true,
            full_waterfall_update: true,
            h_range: 1.0,
            v_range: 10.0,
            vfos: Vec::new(),
            selected: None,
            store,
            band_plans: Vec::new(),
            band_plan_position: BandPlanPosition::default(),
            band_plan_visible: true,
            move_single_click: false,
            drag: Drag::Idle,
            last_position: None,
            last_drag_x: 0.0,
            events: Vec::new(),
        }
    }

    fn data_width(&self) -> usize {
        self.layout.map_or(0, |layout| layout.data_width)
    }

    fn history_capacity(&self) -> usize {
        match self.layout {
            Some(layout) if self.waterfall_visible => layout.waterfall_height.max(1),
            _ => 1,
        }
    }

    fn vfo_index(&self, name: &str) -> Option<usize> {
        self.vfos.iter().position(|vfo| vfo.name() == name)
    }

    fn selected_index(&self) -> Option<usize> {
        self.selected.as_deref().and_then(|name| self.vfo_index(name))
    }

    fn select(&mut self, name: Option<String>) {
        if self.selected == name {
            return;
        }
        self.selected = name.clone();
        self.snr.reset();
        self.selected_snr = None;
        self.events.push(ViewEvent::SelectedVfoChanged(name));
    }

    fn select_first_if_needed(&mut self) {
        if self.selected_index().is_none() {
            let first = self.vfos.first().map(|vfo| vfo.name().to_owned());
            self.select(first);
        }
    }

    fn reconfigure_decimator(&mut self) {
        let data_width = self.data_width();
        self.decimator.configure(
            self.raw_width,
            self.window.whole_bandwidth(),
            self.window.view_offset(),
            self.window.view_bandwidth(),
            data_width,
        );
        self.scratch.resize(data_width, DB_FLOOR);
    }

    fn update_steps(&mut self) {
        if let Some(layout) = self.layout {
            self.h_range = axis::find_best_range(self.window.view_bandwidth(), layout.max_h_steps);
            self.v_range = axis::find_best_range(
                (self.ranges.fft_max - self.ranges.fft_min) as f64,
                layout.max_v_steps,
            ) as f32;
        }
    }

    /// Recomputes the layout and reallocates every buffer sized by it.
    /// Degenerate widget sizes keep the previous layout.
    fn relayout(&mut self, fb: &Mutex<Framebuffer>) {
        let Some(layout) = Layout::compute(
            self.widget,
            self.fft_area_height,
            self.waterfall_visible,
            self.ui_scale,
            self.label_size,
        ) else {
            debug!("[waterfall] widget too small, keeping layout");
            return;
        };

        self.fft_area_height = layout.fft_area_height;
        self.pending_fft_area_height = layout.fft_area_height;
        self.layout = Some(layout);

        self.history.resize(self.raw_width, self.history_capacity());
        self.trace.resize(layout.data_width);
        self.reconfigure_decimator();
        self.update_steps();

        {
            let mut fb = fb.lock();
            if self.waterfall_visible {
                fb.resize(layout.data_width, layout.waterfall_height);
            } else {
                fb.resize(0, 0);
            }
        }

        log::layout_summary(&layout);
        self.redraw_waterfall(fb);
        self.update_vfos(false);
    }

    /// Repaints every waterfall row from the history. Row 0 is the newest
    /// line; rows without history are opaque black.
    fn redraw_waterfall(&mut self, fb: &Mutex<Framebuffer>) {
        if !self.waterfall_visible || self.layout.is_none() {
            return;
        }
        self.reconfigure_decimator();

        let DisplayRanges {
            waterfall_min,
            waterfall_max,
            ..
        } = self.ranges;
        let mut fb = fb.lock();
        let count = self.history.len().min(fb.height());
        let mut row_values = vec![DB_FLOOR; fb.width()];
        for age in 0..count {
            let Some(raw) = self.history.line(age) else {
                break;
            };
            self.decimator.decimate(raw, &mut row_values);
            if let Some(row) = fb.row_mut(age) {
                for (pixel, &value) in row.iter_mut().zip(&row_values) {
                    *pixel = self.palette.map_db(value, waterfall_min, waterfall_max);
                }
            }
        }
        fb.fill_from(count, theme::WATERFALL_EMPTY);
    }

    fn vfo_area(&self) -> Option<(super::FrequencyProjector, VfoArea)> {
        let layout = self.layout?;
        let projector = self
            .window
            .projector(layout.fft_area.min.x as f64, layout.data_width as f64);
        let area = VfoArea {
            fft: layout.fft_area,
            waterfall: layout.waterfall,
            grip: layout.grip_size(),
        };
        Some((projector, area))
    }

    fn update_vfos(&mut self, only_dirty: bool) {
        let Some((projector, area)) = self.vfo_area() else {
            return;
        };
        let center = self.window.center_frequency();
        for vfo in &mut self.vfos {
            if only_dirty && !vfo.redraw_required() {
                continue;
            }
            vfo.update_geometry(&projector, center, &area);
        }
    }

    /// Shared tail of every pan or zoom.
    fn view_changed(&mut self, fb: &Mutex<Framebuffer>) {
        self.reconfigure_decimator();
        self.update_steps();
        if self.full_waterfall_update {
            self.redraw_waterfall(fb);
        }
        self.update_vfos(false);
    }

    /// Pans by `delta` Hz, retuning past the band edges.
    fn pan(&mut self, delta: f64, fb: &Mutex<Framebuffer>) {
        if let Some(shift) = self.window.pan(delta) {
            debug!("[waterfall] retuned by {shift} Hz");
            self.events
                .push(ViewEvent::CenterFrequencyMoved(self.window.center_frequency()));
        }
        self.view_changed(fb);
    }

    fn set_whole_bandwidth(&mut self, bandwidth: f64, fb: &Mutex<Framebuffer>) {
        if !self.window.set_whole_bandwidth(bandwidth) {
            return;
        }
        let half = bandwidth / 2.0;
        for vfo in &mut self.vfos {
            if vfo.lower_offset() < -half {
                vfo.set_center_offset(-half);
            }
            if vfo.upper_offset() > half {
                vfo.set_center_offset(half);
            }
        }
        self.view_changed(fb);
    }

    fn push(&mut self, line: &[f32], fb: &Mutex<Framebuffer>) {
        if self.raw_width == 0 {
            return;
        }
        self.history.push(line);
        self.reconfigure_decimator();
        let Some(raw) = self.history.latest() else {
            return;
        };
        self.decimator.decimate(raw, &mut self.scratch);

        if self.waterfall_visible && self.layout.is_some() {
            let DisplayRanges {
                waterfall_min,
                waterfall_max,
                ..
            } = self.ranges;
            let mut fb = fb.lock();
            let row = fb.scroll_down();
            for (pixel, &value) in row.iter_mut().zip(&self.scratch) {
                *pixel = self.palette.map_db(value, waterfall_min, waterfall_max);
            }
        }

        self.trace.update(&self.scratch);

        self.selected_snr = match self.selected_index() {
            Some(index) => {
                let vfo = &self.vfos[index];
                estimate_signal(
                    raw,
                    self.window.whole_bandwidth(),
                    vfo.center_offset(),
                    vfo.bandwidth(),
                )
                .map(|estimate| self.snr.update(estimate.snr_db))
            }
            None => None,
        };
    }

    fn estimate(&self, index: usize) -> Option<SignalEstimate> {
        let vfo = self.vfos.get(index)?;
        estimate_signal(
            self.history.latest()?,
            self.window.whole_bandwidth(),
            vfo.center_offset(),
            vfo.bandwidth(),
        )
    }

    fn set_band_plans(&mut self, names: &[String]) {
        self.band_plans.clear();
        for name in names.iter().take(MAX_BAND_PLANS) {
            match self.store.get(name) {
                Some(plan) => self.band_plans.push(plan),
                None => warn!("[waterfall] unknown band plan {name}, not shown"),
            }
        }
    }
}

/// Thread-safe handle to the display engine.
pub struct WaterfallView {
    core: ReentrantMutex<RefCell<ViewCore>>,
    framebuffer: Mutex<Framebuffer>,
    observers: Mutex<Vec<Observer>>,
    texture: TextureId,
}

impl fmt::Debug for WaterfallView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaterfallView")
            .field("texture", &self.texture)
            .field("observers", &self.observers.lock().len())
            .finish_non_exhaustive()
    }
}

impl Default for WaterfallView {
    fn default() -> Self {
        Self::new(Arc::new(BandPlanStore::new()))
    }
}

impl WaterfallView {
    pub fn new(store: Arc<BandPlanStore>) -> Self {
        Self {
            core: ReentrantMutex::new(RefCell::new(ViewCore::new(store))),
            framebuffer: Mutex::new(Framebuffer::default()),
            observers: Mutex::new(Vec::new()),
            texture: next_texture_id(),
        }
    }

    /// Runs `f` under the broad lock, then delivers the events it raised.
    /// `f` must not run caller code: the core stays borrowed for its duration.
    fn update<R>(&self, f: impl FnOnce(&mut ViewCore, &Mutex<Framebuffer>) -> R) -> R {
        let (result, events) = {
            let guard = self.core.lock();
            let mut core = guard.borrow_mut();
            let result = f(&mut core, &self.framebuffer);
            (result, std::mem::take(&mut core.events))
        };
        self.dispatch(&events);
        result
    }

    fn read<R>(&self, f: impl FnOnce(&ViewCore) -> R) -> R {
        let guard = self.core.lock();
        let core = guard.borrow();
        f(&core)
    }

    fn dispatch(&self, events: &[ViewEvent]) {
        if events.is_empty() {
            return;
        }
        let observers = self.observers.lock().clone();
        for event in events {
            for observer in &observers {
                observer(event);
            }
        }
    }

    /// Registers `observer`; observers run in registration order.
    pub fn subscribe(&self, observer: impl Fn(&ViewEvent) + Send + Sync + 'static) {
        self.observers.lock().push(Arc::new(observer));
    }

    pub fn texture(&self) -> TextureId {
        self.texture
    }

    // Acquisition side

    /// Number of bins per pushed line. Clears the history.
    pub fn set_raw_fft_size(&self, size: usize) {
        self.update(|core, fb| {
            core.raw_width = size;
            core.history = SpectralRingBuffer::new(size, core.history_capacity());
            core.trace.clear();
            core.selected_snr = None;
            core.redraw_waterfall(fb);
            info!("[waterfall] raw FFT size set to {size}");
        });
    }

    pub fn raw_fft_size(&self) -> usize {
        self.read(|core| core.raw_width)
    }

    /// Commits one spectral line in dB. Lines of another length are padded
    /// or truncated.
    pub fn push_line(&self, line: &[f32]) {
        self.update(|core, fb| core.push(line, fb));
    }

    // Render side

    /// Lays the widget out inside `widget`. Returns `false` when the size is
    /// below the minimum and the previous layout was kept.
    pub fn resize(&self, widget: Rect) -> bool {
        if widget.width() < layout::MIN_WIDGET_SIZE || widget.height() < layout::MIN_WIDGET_SIZE {
            debug!("[waterfall] ignoring resize to {}x{}", widget.width(), widget.height());
            return false;
        }
        self.update(|core, fb| {
            if core.widget == widget && core.layout.is_some() {
                return true;
            }
            core.widget = widget;
            core.relayout(fb);
            core.layout.is_some()
        })
    }

    pub fn layout(&self) -> Option<Layout> {
        self.read(|core| core.layout)
    }

    /// Handles one frame of input. Returns the hover tooltip, if any.
    pub fn frame(&self, input: &InputState) -> Option<Tooltip> {
        self.update(|core, fb| {
            core.select_first_if_needed();
            let tooltip = core.process_input(input, fb);
            core.update_vfos(true);
            tooltip
        })
    }

    /// Draws the FFT plot, waterfall, VFOs and band plan rows.
    pub fn render(&self, sink: &mut dyn RenderSink) {
        let label_size = sink.text_size(LABEL_SAMPLE);
        self.update(|core, fb| {
            if label_size != core.label_size {
                core.label_size = label_size;
                core.relayout(fb);
            }
        });
        if let Some(scene) = self.read(ViewCore::scene) {
            scene.draw(sink, self.texture);
        }
    }

    /// Waterfall pixels changed since the previous call.
    pub fn take_upload(&self) -> Option<FrameUpload> {
        self.framebuffer.lock().take_upload()
    }

    // Query surface

    /// Copy of the displayed line and its width in pixels.
    pub fn latest_decimated_line(&self) -> (Vec<f32>, usize) {
        self.read(|core| {
            let line = core.trace.latest().to_vec();
            let width = line.len();
            (line, width)
        })
    }

    pub fn hold_line(&self) -> Option<Vec<f32>> {
        self.read(|core| core.trace.hold().map(<[f32]>::to_vec))
    }

    /// Strength and SNR of the named VFO over the newest raw line.
    pub fn estimate(&self, name: &str) -> Option<SignalEstimate> {
        self.read(|core| core.estimate(core.vfo_index(name)?))
    }

    /// Smoothed SNR of the selected VFO from the last push.
    pub fn selected_snr(&self) -> Option<f32> {
        self.read(|core| core.selected_snr)
    }

    pub fn snr_meter(&self, origin: Point, width: f32) -> Option<SnrMeter> {
        self.read(|core| {
            core.selected_snr
                .map(|snr| SnrMeter::compute(snr, origin, width, core.ui_scale))
        })
    }

    // View window

    pub fn window(&self) -> ViewWindow {
        self.read(|core| core.window)
    }

    pub fn set_center_frequency(&self, frequency: f64) {
        self.update(|core, _| {
            core.window.set_center_frequency(frequency);
            core.update_vfos(false);
        });
    }

    pub fn set_center_locked(&self, locked: bool) {
        self.update(|core, _| core.window.set_center_locked(locked));
    }

    /// Acquired bandwidth. Keeps the zoom ratio and pulls VFOs back inside.
    pub fn set_whole_bandwidth(&self, bandwidth: f64) {
        self.update(|core, fb| core.set_whole_bandwidth(bandwidth, fb));
    }

    pub fn set_view_bandwidth(&self, bandwidth: f64) {
        self.update(|core, fb| {
            if core.window.set_view_bandwidth(bandwidth) {
                core.view_changed(fb);
            }
        });
    }

    pub fn set_view_offset(&self, offset: f64) {
        self.update(|core, fb| {
            if core.window.set_view_offset(offset) {
                core.view_changed(fb);
            }
        });
    }

    // Display options

    pub fn ranges(&self) -> DisplayRanges {
        self.read(|core| core.ranges)
    }

    pub fn set_fft_range(&self, min: f32, max: f32) {
        self.update(|core, _| {
            core.ranges.fft_min = min;
            core.ranges.fft_max = max;
            core.update_steps();
        });
    }

    pub fn set_waterfall_range(&self, min: f32, max: f32) {
        self.update(|core, fb| {
            if core.ranges.waterfall_min == min && core.ranges.waterfall_max == max {
                return;
            }
            core.ranges.waterfall_min = min;
            core.ranges.waterfall_max = max;
            if core.full_waterfall_update {
                core.redraw_waterfall(fb);
            }
        });
    }

    /// Fits the FFT range around the displayed line. Returns the new range.
    pub fn auto_range(&self) -> Option<(f32, f32)> {
        self.update(|core, _| {
            let (min, max) = core.trace.auto_range()?;
            core.ranges.fft_min = min;
            core.ranges.fft_max = max;
            core.update_steps();
            Some((min, max))
        })
    }

    pub fn set_trace_config(&self, config: TraceConfig) {
        self.update(|core, _| core.trace.set_config(config));
    }

    pub fn trace_config(&self) -> TraceConfig {
        self.read(|core| core.trace.config())
    }

    pub fn set_snr_smoothing(&self, enabled: bool, speed: f32) {
        self.update(|core, _| {
            core.snr.enabled = enabled;
            core.snr.speed = speed.clamp(0.0, 1.0);
        });
    }

    pub fn set_full_waterfall_update(&self, enabled: bool) {
        self.update(|core, _| core.full_waterfall_update = enabled);
    }

    /// Hiding the waterfall collapses the history to the newest line.
    pub fn set_waterfall_visible(&self, visible: bool) {
        self.update(|core, fb| {
            if core.waterfall_visible == visible {
                return;
            }
            core.waterfall_visible = visible;
            core.relayout(fb);
        });
    }

    pub fn waterfall_visible(&self) -> bool {
        self.read(|core| core.waterfall_visible)
    }

    pub fn set_fft_area_height(&self, height: f32) {
        self.update(|core, fb| {
            core.fft_area_height = layout::clamp_fft_area_height(height, core.widget.height());
            core.relayout(fb);
        });
    }

    pub fn fft_area_height(&self) -> f32 {
        self.read(|core| core.fft_area_height)
    }

    pub fn set_color_map(&self, colors: &[[u8; 3]]) {
        self.update(|core, fb| {
            core.palette = PaletteMapper::new(colors, DEFAULT_RESOLUTION);
            core.redraw_waterfall(fb);
        });
    }

    pub fn set_ui_scale(&self, scale: f32) {
        self.update(|core, fb| {
            core.ui_scale = scale;
            core.relayout(fb);
        });
    }

    pub fn set_vfo_move_single_click(&self, single_click: bool) {
        self.update(|core, _| core.move_single_click = single_click);
    }

    // VFOs

    /// Adds a VFO. Names are unique; a duplicate is rejected.
    pub fn add_vfo(&self, name: impl Into<String>, config: VfoConfig) -> bool {
        let name = name.into();
        self.update(|core, _| {
            if core.vfo_index(&name).is_some() {
                warn!("[waterfall] duplicate VFO name ({name}), not adding");
                return false;
            }
            core.vfos.push(Vfo::new(name, config));
            core.update_vfos(true);
            true
        })
    }

    pub fn remove_vfo(&self, name: &str) -> bool {
        self.update(|core, _| {
            let Some(index) = core.vfo_index(name) else {
                return false;
            };
            core.vfos.remove(index);
            if core.selected.as_deref() == Some(name) {
                core.select(None);
            }
            if let Drag::Resize(target) = &core.drag
                && target == name
            {
                core.drag = Drag::Idle;
            }
            true
        })
    }

    pub fn vfo(&self, name: &str) -> Option<Vfo> {
        self.read(|core| core.vfo_index(name).map(|index| core.vfos[index].clone()))
    }

    pub fn vfo_names(&self) -> Vec<String> {
        self.read(|core| core.vfos.iter().map(|vfo| vfo.name().to_owned()).collect())
    }

    /// Mutates a copy of the named VFO and stores it back, refreshing its
    /// geometry. The broad lock is held throughout but the core is not
    /// borrowed while `f` runs, so `f` may call back into the view. Nothing
    /// is stored if `f` removed the VFO.
    pub fn with_vfo_mut<R>(&self, name: &str, f: impl FnOnce(&mut Vfo) -> R) -> Option<R> {
        let (result, events) = {
            let guard = self.core.lock();
            let mut vfo = {
                let core = guard.borrow();
                core.vfos[core.vfo_index(name)?].clone()
            };
            let result = f(&mut vfo);

            let mut core = guard.borrow_mut();
            if let Some(index) = core.vfo_index(name) {
                core.vfos[index] = vfo;
                core.update_vfos(true);
            }
            (result, std::mem::take(&mut core.events))
        };
        self.dispatch(&events);
        Some(result)
    }

    pub fn selected_vfo(&self) -> Option<String> {
        self.read(|core| core.selected.clone())
    }

    pub fn select_vfo(&self, name: &str) -> bool {
        self.update(|core, _| {
            if core.vfo_index(name).is_none() {
                return false;
            }
            core.select(Some(name.to_owned()));
            true
        })
    }

    // Band plans

    pub fn set_band_plan_store(&self, store: Arc<BandPlanStore>) {
        self.update(|core, _| {
            let names: Vec<String> = core.band_plans.iter().map(|plan| plan.name.clone()).collect();
            core.store = store;
            core.set_band_plans(&names);
        });
    }

    /// Shows up to two plans from the store, one per row, in order.
    pub fn set_band_plans(&self, names: &[String]) {
        self.update(|core, _| core.set_band_plans(names));
    }

    pub fn band_plan_names(&self) -> Vec<String> {
        self.read(|core| core.band_plans.iter().map(|plan| plan.name.clone()).collect())
    }

    pub fn set_band_plan_position(&self, position: BandPlanPosition) {
        self.update(|core, _| core.band_plan_position = position);
    }

    pub fn set_band_plan_visible(&self, visible: bool) {
        self.update(|core, _| core.band_plan_visible = visible);
    }

    /// Applies persisted settings with a single relayout.
    pub fn apply_settings(&self, settings: &ViewSettings) {
        let mut settings = settings.clone();
        settings.normalize();
        self.update(|core, fb| {
            core.ranges = DisplayRanges {
                fft_min: settings.fft_min,
                fft_max: settings.fft_max,
                waterfall_min: settings.waterfall_min,
                waterfall_max: settings.waterfall_max,
            };
            core.trace.set_config(TraceConfig {
                hold: settings.fft_hold,
                hold_speed: settings.hold_speed,
                smoothing: settings.fft_smoothing,
                smoothing_speed: settings.smoothing_speed,
            });
            core.snr.enabled = settings.snr_smoothing;
            core.snr.speed = settings.snr_speed;
            core.full_waterfall_update = settings.full_waterfall_update;
            core.waterfall_visible = settings.waterfall_visible;
            core.palette = PaletteMapper::new(&settings.color_map, DEFAULT_RESOLUTION);
            core.fft_area_height = settings.fft_height;
            core.ui_scale = settings.ui_scale;
            core.move_single_click = settings.vfo_move_single_click;
            core.band_plan_position = settings.band_plan_position;
            core.band_plan_visible = settings.band_plan_visible;
            core.set_band_plans(&settings.band_plans);
            core.relayout(fb);
            core.update_steps();
            core.redraw_waterfall(fb);
        });
    }
}
