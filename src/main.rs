use anyhow::{Result, bail};
use specview::bandplan::BandPlanStore;
use specview::settings::SettingsHandle;
use specview::source::{LineSink, SyntheticConfig, SyntheticSource};
use specview::util::{log, telemetry};
use specview::view::vfo::VfoConfig;
use specview::view::{DrawList, InputState, Rect, ViewEvent, WaterfallView};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const RUN_FRAMES: usize = 150;
const FRAME_PERIOD: Duration = Duration::from_millis(16);
const WIDGET_WIDTH: f32 = 1280.0;
const WIDGET_HEIGHT: f32 = 720.0;
const VFO_NAME: &str = "Radio";

fn main() {
    telemetry::init();
    info!("specview starting up");

    if let Err(err) = run() {
        error!("[main] failed: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let settings = SettingsHandle::load_or_default();
    let (view_settings, source_settings) = {
        let manager = settings.borrow();
        info!("[settings] using {}", manager.path().display());
        let data = manager.settings();
        (data.view.clone(), data.source.clone())
    };

    let mut store = BandPlanStore::new();
    if let Err(err) = store.load_from_dir(&view_settings.band_plan_dir) {
        warn!("[bandplan] no band plans loaded: {err:#}");
    }
    log::band_plan_store(&store);

    let mut config = SyntheticConfig::default();
    source_settings.apply_to(&mut config);

    let view = Arc::new(WaterfallView::new(Arc::new(store)));
    view.set_center_frequency(config.center_frequency);
    view.set_whole_bandwidth(config.sample_rate);
    view.set_raw_fft_size(config.fft_size);
    view.apply_settings(&view_settings);
    if !view.resize(Rect::from_coords(0.0, 0.0, WIDGET_WIDTH, WIDGET_HEIGHT)) {
        bail!("widget of {WIDGET_WIDTH}x{WIDGET_HEIGHT} is too small");
    }
    view.add_vfo(
        VFO_NAME,
        VfoConfig {
            offset: config.tones.first().copied().unwrap_or_default(),
            ..VfoConfig::default()
        },
    );

    // Persist the normalised values.
    let mut persisted = config.clone();
    settings.update(|manager| {
        manager.set_view_settings(&view_settings);
        manager.set_source_settings(&persisted);
    });

    let (event_tx, event_rx) = mpsc::channel::<ViewEvent>();
    view.subscribe(move |event| {
        let _ = event_tx.send(event.clone());
    });

    let producer = SyntheticSource::new(config).spawn(Arc::clone(&view) as Arc<dyn LineSink>)?;

    let input = InputState::default();
    let mut list = DrawList::default();
    let mut uploads = 0usize;
    for _ in 0..RUN_FRAMES {
        view.frame(&input);
        list.clear();
        view.render(&mut list);
        if view.take_upload().is_some() {
            uploads += 1;
        }
        for event in event_rx.try_iter() {
            handle_event(&settings, &mut persisted, event);
        }
        thread::sleep(FRAME_PERIOD);
    }

    match view.estimate(VFO_NAME) {
        Some(estimate) => info!(
            "[main] {VFO_NAME}: strength {:.1} dBFS, SNR {:.1} dB",
            estimate.strength_db, estimate.snr_db
        ),
        None => warn!("[main] {VFO_NAME}: no estimate available"),
    }

    let lines = producer.stop();
    info!(
        "[main] rendered {RUN_FRAMES} frames ({} commands in the last), {uploads} texture uploads, {lines} lines acquired",
        list.len()
    );
    Ok(())
}

fn handle_event(settings: &SettingsHandle, source: &mut SyntheticConfig, event: ViewEvent) {
    match event {
        ViewEvent::FftAreaResized(height) => settings.update(|manager| manager.set_fft_height(height)),
        ViewEvent::CenterFrequencyMoved(frequency) => {
            info!("[main] centre frequency moved to {frequency} Hz");
            source.center_frequency = frequency;
            settings.update(|manager| manager.set_source_settings(source));
        }
        other => debug!("[main] view event: {other:?}"),
    }
}
