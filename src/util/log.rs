use crate::bandplan::BandPlanStore;
use crate::view::layout::Layout;
use tracing::{debug, info};

pub fn layout_summary(layout: &Layout) {
    let waterfall = layout
        .waterfall
        .map_or_else(|| "hidden".to_owned(), |_| format!("{} rows", layout.waterfall_height));

    debug!(
        "[waterfall] layout: widget={}x{}, plot={}x{}, scale={}, waterfall={}, steps={}h/{}v",
        layout.widget.width(),
        layout.widget.height(),
        layout.data_width,
        layout.fft_height,
        layout.ui_scale,
        waterfall,
        layout.max_h_steps,
        layout.max_v_steps
    );
}

pub fn band_plan_store(store: &BandPlanStore) {
    for name in store.names() {
        let Some(plan) = store.get(name) else {
            continue;
        };
        let country = if plan.country_code.is_empty() {
            "--"
        } else {
            plan.country_code.as_str()
        };
        info!(
            "[bandplan] {name} ({country}): allocations={}, bands={}",
            plan.allocations.len(),
            plan.bands().len()
        );
    }
}
