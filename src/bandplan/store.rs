//! Owned registry of loaded band plans and the allocation-type colour table.

use super::BandPlan;
use super::descriptor::{BandPlanDescriptor, ColorTableDescriptor};
use crate::util::color::{Rgba, TRANSLUCENT_ALPHA};
use anyhow::{Context, Result, bail};
use rustc_hash::FxHashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

const COLOR_TABLE_FILE: &str = "config.json";

/// Outline and fill colours for one allocation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandColor {
    pub value: Rgba,
    pub translucent: Rgba,
}

impl BandColor {
    pub fn from_rgba(value: Rgba) -> Self {
        Self {
            value,
            translucent: value.with_alpha(TRANSLUCENT_ALPHA),
        }
    }

    /// Parses `#RRGGBBAA`, falling back to opaque white.
    pub fn parse(text: &str) -> Self {
        match Rgba::parse_hex(text) {
            Some(color) => Self::from_rgba(color),
            None => {
                warn!("[bandplan] malformed colour '{text}', using white");
                Self::default()
            }
        }
    }
}

impl Default for BandColor {
    fn default() -> Self {
        Self::from_rgba(Rgba::WHITE)
    }
}

#[derive(Debug, Default)]
pub struct BandPlanStore {
    plans: FxHashMap<String, Arc<BandPlan>>,
    names: Vec<String>,
    colors: FxHashMap<String, BandColor>,
}

impl BandPlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the store contents with every plan found in `dir`.
    ///
    /// Plans are read in file name order. Individual files that fail to load
    /// are logged and skipped; only an unusable directory is an error.
    pub fn load_from_dir(&mut self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            bail!("band plan directory {} does not exist", dir.display());
        }
        if !dir.is_dir() {
            bail!("band plan path {} is not a directory", dir.display());
        }

        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .with_context(|| format!("failed to list {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();

        self.plans.clear();
        self.names.clear();
        self.colors.clear();

        for path in files {
            let is_color_table = path
                .file_name()
                .is_some_and(|name| name == COLOR_TABLE_FILE);

            let outcome = if is_color_table {
                self.load_color_table_file(&path)
            } else {
                self.load_plan_file(&path)
            };

            if let Err(err) = outcome {
                error!("[bandplan] skipping {}: {err:#}", path.display());
            }
        }

        info!(
            "[bandplan] loaded {} plan(s) and {} colour(s) from {}",
            self.names.len(),
            self.colors.len(),
            dir.display()
        );
        Ok(())
    }

    fn load_plan_file(&mut self, path: &Path) -> Result<()> {
        let json = fs::read_to_string(path).context("failed to read band plan")?;
        self.load_plan_str(&json)
    }

    fn load_color_table_file(&mut self, path: &Path) -> Result<()> {
        let json = fs::read_to_string(path).context("failed to read colour table")?;
        self.load_color_table_str(&json)
    }

    /// Parses one plan descriptor and registers it. A duplicate name is
    /// logged and ignored.
    pub fn load_plan_str(&mut self, json: &str) -> Result<()> {
        let plan = BandPlanDescriptor::parse(json)?.into_plan()?;
        self.insert(plan);
        Ok(())
    }

    pub fn load_color_table_str(&mut self, json: &str) -> Result<()> {
        let table: ColorTableDescriptor =
            serde_json::from_str(json).context("malformed colour table")?;
        self.colors = table
            .band_colors
            .iter()
            .map(|(kind, hex)| (kind.clone(), BandColor::parse(hex)))
            .collect();
        Ok(())
    }

    /// Returns `false` when a plan with the same name is already loaded.
    pub fn insert(&mut self, plan: BandPlan) -> bool {
        if self.plans.contains_key(&plan.name) {
            warn!(
                "[bandplan] duplicate band plan name ({}), not loading",
                plan.name
            );
            return false;
        }

        self.names.push(plan.name.clone());
        self.plans.insert(plan.name.clone(), Arc::new(plan));
        true
    }

    pub fn get(&self, name: &str) -> Option<Arc<BandPlan>> {
        self.plans.get(name).cloned()
    }

    /// Plan names in load order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn set_color(&mut self, kind: impl Into<String>, color: BandColor) {
        self.colors.insert(kind.into(), color);
    }

    pub fn color_for(&self, kind: &str) -> BandColor {
        self.colors.get(kind).copied().unwrap_or_default()
    }

    pub fn color_count(&self) -> usize {
        self.colors.len()
    }
}
