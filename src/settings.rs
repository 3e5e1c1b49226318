use crate::source::SyntheticConfig;
use crate::view::layout::{DEFAULT_FFT_AREA_HEIGHT, MIN_FFT_AREA_HEIGHT};
use crate::view::overlay::BandPlanPosition;
use crate::view::theme::DEFAULT_COLOR_MAP;
use crate::view::waterfall::MAX_BAND_PLANS;
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{error, warn};

const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    #[serde(default)]
    pub view: ViewSettings,
    #[serde(default)]
    pub source: SourceSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewSettings {
    pub fft_min: f32,
    pub fft_max: f32,
    pub waterfall_min: f32,
    pub waterfall_max: f32,
    /// FFT area height including the frequency scale.
    pub fft_height: f32,
    pub fft_hold: bool,
    pub hold_speed: f32,
    pub fft_smoothing: bool,
    pub smoothing_speed: f32,
    pub snr_smoothing: bool,
    pub snr_speed: f32,
    pub full_waterfall_update: bool,
    pub waterfall_visible: bool,
    pub color_map: Vec<[u8; 3]>,
    pub band_plans: Vec<String>,
    pub band_plan_position: BandPlanPosition,
    pub band_plan_visible: bool,
    pub band_plan_dir: PathBuf,
    pub ui_scale: f32,
    pub vfo_move_single_click: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            fft_min: -70.0,
            fft_max: 0.0,
            waterfall_min: -70.0,
            waterfall_max: 0.0,
            fft_height: DEFAULT_FFT_AREA_HEIGHT,
            fft_hold: false,
            hold_speed: 0.3,
            fft_smoothing: false,
            smoothing_speed: 0.5,
            snr_smoothing: false,
            snr_speed: 0.2,
            full_waterfall_update: true,
            waterfall_visible: true,
            color_map: DEFAULT_COLOR_MAP.to_vec(),
            band_plans: Vec::new(),
            band_plan_position: BandPlanPosition::Bottom,
            band_plan_visible: true,
            band_plan_dir: PathBuf::from("bandplans"),
            ui_scale: 1.0,
            vfo_move_single_click: false,
        }
    }
}

impl ViewSettings {
    /// Repairs out-of-range values in place.
    pub fn normalize(&mut self) {
        if !(self.fft_max > self.fft_min) {
            self.fft_max = self.fft_min + 1.0;
        }
        if !(self.waterfall_max > self.waterfall_min) {
            self.waterfall_max = self.waterfall_min + 1.0;
        }
        self.fft_height = self.fft_height.max(MIN_FFT_AREA_HEIGHT);
        self.hold_speed = self.hold_speed.max(0.0);
        self.smoothing_speed = self.smoothing_speed.clamp(0.0, 1.0);
        self.snr_speed = self.snr_speed.clamp(0.0, 1.0);
        if self.color_map.is_empty() {
            self.color_map = DEFAULT_COLOR_MAP.to_vec();
        }
        self.band_plans.truncate(MAX_BAND_PLANS);
        self.ui_scale = if self.ui_scale.is_finite() {
            self.ui_scale.clamp(0.5, 4.0)
        } else {
            1.0
        };
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceSettings {
    pub center_frequency: f64,
    pub sample_rate: f64,
    pub fft_size: usize,
    pub frame_rate: f32,
    pub noise_floor_db: f32,
    /// Tone offsets from the centre in Hz.
    pub tones: Vec<f64>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self::from_config(&SyntheticConfig::default())
    }
}

impl SourceSettings {
    pub fn from_config(config: &SyntheticConfig) -> Self {
        Self {
            center_frequency: config.center_frequency,
            sample_rate: config.sample_rate,
            fft_size: config.fft_size,
            frame_rate: config.frame_rate,
            noise_floor_db: config.noise_floor_db,
            tones: config.tones.clone(),
        }
    }

    pub fn apply_to(&self, config: &mut SyntheticConfig) {
        config.center_frequency = self.center_frequency;
        config.sample_rate = self.sample_rate;
        config.fft_size = self.fft_size;
        config.frame_rate = self.frame_rate;
        config.noise_floor_db = self.noise_floor_db;
        config.tones = self.tones.clone();
        config.normalize();
    }
}

fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(dir).join("specview")
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".config").join("specview")
    } else {
        PathBuf::from(".specview")
    }
}

#[derive(Debug)]
pub struct SettingsManager {
    path: PathBuf,
    data: Settings,
}

impl SettingsManager {
    pub fn load_or_default() -> Self {
        Self::load_from(config_dir().join(SETTINGS_FILE_NAME))
    }

    pub fn load_from(path: PathBuf) -> Self {
        let mut data = Self::load_from_disk(&path).unwrap_or_default();
        data.view.normalize();
        Self { path, data }
    }

    fn load_from_disk(path: &Path) -> Option<Settings> {
        let contents = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(settings) => Some(settings),
            Err(err) => {
                warn!("[settings] failed to parse {path:?}: {err}");
                None
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.data
    }

    pub fn set_view_settings(&mut self, view: &ViewSettings) {
        self.data.view = view.clone();
        self.data.view.normalize();
    }

    pub fn set_fft_height(&mut self, height: f32) {
        self.data.view.fft_height = height.max(MIN_FFT_AREA_HEIGHT);
    }

    pub fn set_band_plans(&mut self, names: &[String]) {
        self.data.view.band_plans = names.iter().take(MAX_BAND_PLANS).cloned().collect();
    }

    pub fn set_source_settings(&mut self, config: &SyntheticConfig) {
        self.data.source = SourceSettings::from_config(config);
    }

    pub fn save(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.data)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, &json)?;
        fs::rename(&tmp_path, &self.path)
    }
}

#[derive(Debug, Clone)]
pub struct SettingsHandle {
    inner: Rc<RefCell<SettingsManager>>,
}

impl SettingsHandle {
    pub fn load_or_default() -> Self {
        Self::new(SettingsManager::load_or_default())
    }

    pub fn new(manager: SettingsManager) -> Self {
        Self {
            inner: Rc::new(RefCell::new(manager)),
        }
    }

    pub fn borrow(&self) -> Ref<'_, SettingsManager> {
        self.inner.borrow()
    }

    pub fn update<F, R>(&self, mutator: F) -> R
    where
        F: FnOnce(&mut SettingsManager) -> R,
    {
        let mut manager = self.inner.borrow_mut();
        let result = mutator(&mut manager);
        if let Err(err) = manager.save() {
            error!("[settings] failed to persist settings: {err}");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SettingsManager::load_from(dir.path().join(SETTINGS_FILE_NAME));
        assert_eq!(manager.settings(), &Settings::default());
    }

    #[test]
    fn corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();
        let manager = SettingsManager::load_from(path);
        assert_eq!(manager.settings().view, ViewSettings::default());
    }

    #[test]
    fn update_persists_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE_NAME);
        let handle = SettingsHandle::new(SettingsManager::load_from(path.clone()));

        handle.update(|manager| {
            manager.set_fft_height(420.0);
            manager.set_band_plans(&["a".into(), "b".into(), "c".into()]);
        });

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
        let reloaded = SettingsManager::load_from(path);
        assert_eq!(reloaded.settings().view.fft_height, 420.0);
        assert_eq!(reloaded.settings().view.band_plans, vec!["a", "b"]);
    }

    #[test]
    fn view_and_source_settings_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        let handle = SettingsHandle::new(SettingsManager::load_from(path.clone()));

        let view = ViewSettings {
            fft_min: -20.0,
            fft_max: -40.0,
            band_plan_position: BandPlanPosition::Top,
            ..ViewSettings::default()
        };
        let source = SyntheticConfig {
            center_frequency: 14_200_000.0,
            tones: vec![-1_500.0, 3_000.0],
            ..SyntheticConfig::default()
        };
        handle.update(|manager| {
            manager.set_view_settings(&view);
            manager.set_source_settings(&source);
        });

        let reloaded = SettingsManager::load_from(path);
        let data = reloaded.settings();
        assert_eq!(data.view.fft_max, -19.0);
        assert_eq!(data.view.band_plan_position, BandPlanPosition::Top);
        assert_eq!(data.source.center_frequency, 14_200_000.0);
        assert_eq!(data.source.tones, vec![-1_500.0, 3_000.0]);

        let mut restored = SyntheticConfig::default();
        data.source.apply_to(&mut restored);
        assert_eq!(restored.center_frequency, 14_200_000.0);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(
            &path,
            r#"{ "view": { "fft_hold": true, "band_plan_position": "top" } }"#,
        )
        .unwrap();
        let manager = SettingsManager::load_from(path);
        let view = &manager.settings().view;
        assert!(view.fft_hold);
        assert_eq!(view.band_plan_position, BandPlanPosition::Top);
        assert_eq!(view.hold_speed, 0.3);
        assert_eq!(manager.settings().source, SourceSettings::default());
    }

    #[test]
    fn normalize_repairs_ranges() {
        let mut view = ViewSettings {
            fft_min: 0.0,
            fft_max: -10.0,
            smoothing_speed: 3.0,
            fft_height: 20.0,
            color_map: Vec::new(),
            ui_scale: f32::NAN,
            ..ViewSettings::default()
        };
        view.normalize();
        assert_eq!(view.fft_max, 1.0);
        assert_eq!(view.smoothing_speed, 1.0);
        assert_eq!(view.fft_height, MIN_FFT_AREA_HEIGHT);
        assert_eq!(view.color_map.len(), DEFAULT_COLOR_MAP.len());
        assert_eq!(view.ui_scale, 1.0);
    }
}
