//! Frequency allocation charts ("band plans") and their compiled display rows.

pub mod compile;
pub mod descriptor;
pub mod store;

pub use compile::compile;
pub use store::{BandColor, BandPlanStore};

use std::sync::{Arc, OnceLock};

/// Allocation type rendered as a crossed-out box instead of a fill.
pub const GUARD_TYPE: &str = "guard";

/// Repetition pattern for comb-like allocations such as repeater channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Raster {
    /// Width of each repetition in Hz, always positive.
    pub width: f64,
    /// Distance between repetition starts in Hz. Zero disables the comb.
    pub step: f64,
}

/// A named frequency range with a usage type. `start < end` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub name: String,
    pub kind: String,
    pub start: f64,
    pub end: f64,
    pub raster: Option<Raster>,
}

impl Allocation {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            start,
            end,
            raster: None,
        }
    }

    pub fn with_raster(mut self, width: f64, step: f64) -> Self {
        self.raster = Some(Raster { width, step });
        self
    }

    /// The concrete `[start, end)` intervals this allocation occupies.
    ///
    /// A raster with a positive step repeats every `step` Hz while the
    /// repetition start stays below `end`; each repetition is clipped to `end`.
    /// A zero step keeps the allocation as a single interval.
    pub fn intervals(&self) -> Vec<(f64, f64)> {
        match self.raster {
            Some(Raster { width, step }) if step > 0.0 && width > 0.0 => {
                let mut out = Vec::new();
                let mut k = 0u64;
                loop {
                    let start = self.start + k as f64 * step;
                    if start >= self.end {
                        break;
                    }
                    let end = (start + width).min(self.end);
                    if end > start {
                        out.push((start, end));
                    }
                    k += 1;
                }
                out
            }
            _ if self.start < self.end => vec![(self.start, self.end)],
            _ => Vec::new(),
        }
    }
}

/// One stacked entry of a [`Band`].
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub name: String,
    pub kind: String,
    /// Stack slot the allocation occupies; stable while the allocation stays active.
    pub slot: usize,
    /// The allocation opens exactly at this band's start.
    pub visible_start: bool,
    /// The allocation closes exactly at this band's end.
    pub visible_end: bool,
}

/// A maximal sub-interval over which the active allocation set is constant.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub start: f64,
    pub end: f64,
    pub labels: Vec<Label>,
}

impl Band {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    /// Number of stack rows needed to draw this band with stable slots.
    pub fn depth(&self) -> usize {
        self.labels.iter().map(|label| label.slot + 1).max().unwrap_or(0)
    }
}

#[derive(Debug)]
pub struct BandPlan {
    pub name: String,
    pub country_name: String,
    pub country_code: String,
    pub author_name: String,
    pub author_url: String,
    pub allocations: Vec<Allocation>,
    bands: OnceLock<Arc<[Band]>>,
}

impl BandPlan {
    pub fn new(name: impl Into<String>, allocations: Vec<Allocation>) -> Self {
        Self {
            name: name.into(),
            country_name: String::new(),
            country_code: String::new(),
            author_name: String::new(),
            author_url: String::new(),
            allocations,
            bands: OnceLock::new(),
        }
    }

    /// Compiled display bands, computed on first use and cached for the
    /// lifetime of the plan.
    pub fn bands(&self) -> Arc<[Band]> {
        Arc::clone(
            self.bands
                .get_or_init(|| Arc::from(compile(&self.allocations).into_boxed_slice())),
        )
    }

    /// Bands intersecting `[lower, upper)`, in frequency order.
    pub fn bands_in(&self, lower: f64, upper: f64) -> Vec<Band> {
        self.bands()
            .iter()
            .skip_while(|band| band.end <= lower)
            .take_while(|band| band.start < upper)
            .cloned()
            .collect()
    }
}

impl Clone for BandPlan {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            country_name: self.country_name.clone(),
            country_code: self.country_code.clone(),
            author_name: self.author_name.clone(),
            author_url: self.author_url.clone(),
            allocations: self.allocations.clone(),
            bands: OnceLock::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_expands_into_repetitions() {
        let allocation = Allocation::new("rpt", "repeater", 100.0, 200.0).with_raster(10.0, 20.0);
        assert_eq!(
            allocation.intervals(),
            vec![
                (100.0, 110.0),
                (120.0, 130.0),
                (140.0, 150.0),
                (160.0, 170.0),
                (180.0, 190.0)
            ]
        );
    }

    #[test]
    fn raster_repetition_is_clipped_to_end() {
        let allocation = Allocation::new("rpt", "repeater", 0.0, 25.0).with_raster(10.0, 20.0);
        assert_eq!(allocation.intervals(), vec![(0.0, 10.0), (20.0, 25.0)]);
    }

    #[test]
    fn zero_step_raster_is_one_interval() {
        let allocation = Allocation::new("rpt", "repeater", 100.0, 200.0).with_raster(10.0, 0.0);
        assert_eq!(allocation.intervals(), vec![(100.0, 200.0)]);
    }

    #[test]
    fn bands_are_cached_until_plan_is_replaced() {
        let plan = BandPlan::new("test", vec![Allocation::new("a", "amateur", 1.0, 2.0)]);
        let first = plan.bands();
        let second = plan.bands();
        assert!(Arc::ptr_eq(&first, &second));

        let replaced = plan.clone();
        assert!(!Arc::ptr_eq(&first, &replaced.bands()));
    }

    #[test]
    fn bands_in_window_skips_outside() {
        let plan = BandPlan::new(
            "test",
            vec![
                Allocation::new("a", "amateur", 0.0, 10.0),
                Allocation::new("b", "amateur", 20.0, 30.0),
                Allocation::new("c", "amateur", 40.0, 50.0),
            ],
        );
        let visible = plan.bands_in(15.0, 35.0);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].labels[0].name, "b");
    }

    #[test]
    fn band_touching_window_edge_is_excluded() {
        let plan = BandPlan::new(
            "test",
            vec![
                Allocation::new("a", "amateur", 0.0, 10.0),
                Allocation::new("b", "amateur", 20.0, 30.0),
            ],
        );
        let visible = plan.bands_in(10.0, 20.0);
        assert!(visible.is_empty());

        let visible = plan.bands_in(10.0, 25.0);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].labels[0].name, "b");
    }
}
