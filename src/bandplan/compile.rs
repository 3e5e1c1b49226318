//! Sweep-line compiler turning overlapping allocations into stacked bands.
//!
//! Edges are sorted by frequency with a stable sort and consumed in batches of
//! equal frequency. Within a batch every close is applied before any open, so
//! an allocation opening exactly where another closes can take over the freed
//! stack slot. Freed slots are tombstoned rather than removed, which keeps
//! unrelated allocations on the row they started on.

use super::{Allocation, Band, Label};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeKind {
    Open,
    Close,
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    frequency: f64,
    kind: EdgeKind,
    interval: usize,
}

/// Stack of active intervals. `None` entries are tombstones waiting to be
/// refilled; `free` mirrors them so first-fit lookups stay cheap.
#[derive(Debug, Default)]
struct SlotArena {
    slots: Vec<Option<usize>>,
    free: BTreeSet<usize>,
}

impl SlotArena {
    fn occupy(&mut self, interval: usize) -> usize {
        match self.free.pop_first() {
            Some(slot) => {
                self.slots[slot] = Some(interval);
                slot
            }
            None => {
                self.slots.push(Some(interval));
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, slot: usize) {
        if let Some(entry) = self.slots.get_mut(slot)
            && entry.take().is_some()
        {
            self.free.insert(slot);
        }
    }

    /// Drops trailing tombstones only; interior ones keep their position.
    fn trim(&mut self) {
        while let Some(None) = self.slots.last() {
            let slot = self.slots.len() - 1;
            self.slots.pop();
            self.free.remove(&slot);
        }
    }

    fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    fn live(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, entry)| entry.map(|interval| (slot, interval)))
    }
}

/// Compiles `allocations` into frequency-ordered, non-overlapping bands.
///
/// Deterministic for a fixed input order. Allocations with non-finite or
/// empty ranges contribute nothing.
pub fn compile(allocations: &[Allocation]) -> Vec<Band> {
    // interval id -> owning allocation index
    let mut owners = Vec::new();
    let mut edges = Vec::new();

    for (index, allocation) in allocations.iter().enumerate() {
        for (start, end) in allocation.intervals() {
            if !start.is_finite() || !end.is_finite() || start >= end {
                continue;
            }
            let interval = owners.len();
            owners.push(index);
            edges.push(Edge {
                frequency: start,
                kind: EdgeKind::Open,
                interval,
            });
            edges.push(Edge {
                frequency: end,
                kind: EdgeKind::Close,
                interval,
            });
        }
    }

    edges.sort_by(|a, b| a.frequency.total_cmp(&b.frequency));

    let mut arena = SlotArena::default();
    let mut slot_of: Vec<Option<usize>> = vec![None; owners.len()];
    let mut opened = Vec::new();
    let mut bands: Vec<Band> = Vec::new();

    let mut cursor = 0;
    while cursor < edges.len() {
        let frequency = edges[cursor].frequency;
        let batch_end = edges[cursor..]
            .iter()
            .position(|edge| edge.frequency != frequency)
            .map_or(edges.len(), |offset| cursor + offset);
        let batch = &edges[cursor..batch_end];

        for edge in batch.iter().filter(|edge| edge.kind == EdgeKind::Close) {
            let Some(slot) = slot_of[edge.interval].take() else {
                continue;
            };
            arena.release(slot);

            if let Some(band) = bands.last_mut()
                && band.end == frequency
                && let Some(label) = band.labels.iter_mut().find(|label| label.slot == slot)
            {
                label.visible_end = true;
            }
        }

        opened.clear();
        for edge in batch.iter().filter(|edge| edge.kind == EdgeKind::Open) {
            slot_of[edge.interval] = Some(arena.occupy(edge.interval));
            opened.push(edge.interval);
        }

        arena.trim();

        if batch_end < edges.len() && !arena.is_empty() {
            let next = edges[batch_end].frequency;
            let labels = arena
                .live()
                .map(|(slot, interval)| {
                    let allocation = &allocations[owners[interval]];
                    Label {
                        name: allocation.name.clone(),
                        kind: allocation.kind.clone(),
                        slot,
                        visible_start: opened.contains(&interval),
                        visible_end: false,
                    }
                })
                .collect();

            bands.push(Band {
                start: frequency,
                end: next,
                labels,
            });
        }

        cursor = batch_end;
    }

    bands
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn names(band: &Band) -> Vec<(&str, usize)> {
        band.labels
            .iter()
            .map(|label| (label.name.as_str(), label.slot))
            .collect()
    }

    fn merged_coverage(bands: &[Band]) -> Vec<(f64, f64)> {
        let mut out: Vec<(f64, f64)> = Vec::new();
        for band in bands {
            match out.last_mut() {
                Some(last) if last.1 == band.start => last.1 = band.end,
                _ => out.push((band.start, band.end)),
            }
        }
        out
    }

    fn union_of(allocations: &[Allocation]) -> Vec<(f64, f64)> {
        let mut intervals: Vec<(f64, f64)> =
            allocations.iter().flat_map(Allocation::intervals).collect();
        intervals.sort_by(|a, b| a.0.total_cmp(&b.0));
        let mut out: Vec<(f64, f64)> = Vec::new();
        for (start, end) in intervals {
            match out.last_mut() {
                Some(last) if start <= last.1 => last.1 = last.1.max(end),
                _ => out.push((start, end)),
            }
        }
        out
    }

    #[test]
    fn single_allocation_is_one_band() {
        let bands = compile(&[Allocation::new("a", "amateur", 100.0, 200.0)]);
        assert_eq!(bands.len(), 1);
        assert_eq!((bands[0].start, bands[0].end), (100.0, 200.0));
        let label = &bands[0].labels[0];
        assert!(label.visible_start && label.visible_end);
        assert_eq!(label.slot, 0);
    }

    #[test]
    fn overlapping_allocations_split_into_three_bands() {
        let bands = compile(&[
            Allocation::new("a", "amateur", 100.0, 200.0),
            Allocation::new("b", "broadcast", 150.0, 250.0),
        ]);

        let spans: Vec<_> = bands.iter().map(|band| (band.start, band.end)).collect();
        assert_eq!(spans, vec![(100.0, 150.0), (150.0, 200.0), (200.0, 250.0)]);
        assert_eq!(names(&bands[0]), vec![("a", 0)]);
        assert_eq!(names(&bands[1]), vec![("a", 0), ("b", 1)]);
        assert_eq!(names(&bands[2]), vec![("b", 1)]);

        assert!(bands[0].labels[0].visible_start);
        assert!(!bands[0].labels[0].visible_end);
        assert!(!bands[1].labels[0].visible_start);
        assert!(bands[1].labels[0].visible_end);
        assert!(bands[1].labels[1].visible_start);
        assert!(!bands[1].labels[1].visible_end);
        assert!(!bands[2].labels[0].visible_start);
        assert!(bands[2].labels[0].visible_end);
    }

    #[test]
    fn raster_allocation_yields_separated_bands() {
        let bands = compile(&[
            Allocation::new("rpt", "repeater", 100.0, 200.0).with_raster(10.0, 20.0)
        ]);
        assert_eq!(bands.len(), 5);
        for (index, band) in bands.iter().enumerate() {
            assert_eq!(band.start, 100.0 + 20.0 * index as f64);
            assert_eq!(band.width(), 10.0);
            assert!(band.labels[0].visible_start && band.labels[0].visible_end);
        }
        for pair in bands.windows(2) {
            assert_eq!(pair[1].start - pair[0].end, 10.0);
        }
    }

    #[test]
    fn coincident_close_and_open_share_one_boundary() {
        let bands = compile(&[
            Allocation::new("a", "amateur", 0.0, 10.0),
            Allocation::new("b", "broadcast", 10.0, 20.0),
        ]);
        assert_eq!(bands.len(), 2);
        assert_eq!(bands[0].end, bands[1].start);
        assert!(bands[0].labels[0].visible_end);
        assert!(bands[1].labels[0].visible_start);
        // the freed slot is reused by the allocation opening at the same edge
        assert_eq!(bands[1].labels[0].slot, 0);
    }

    #[test]
    fn persisting_allocation_keeps_its_slot_when_lower_slot_frees() {
        let bands = compile(&[
            Allocation::new("short", "amateur", 0.0, 30.0),
            Allocation::new("long", "broadcast", 0.0, 100.0),
            Allocation::new("late", "fixed", 50.0, 80.0),
        ]);

        let long_slots: Vec<usize> = bands
            .iter()
            .flat_map(|band| band.labels.iter())
            .filter(|label| label.name == "long")
            .map(|label| label.slot)
            .collect();
        assert!(long_slots.iter().all(|slot| *slot == 1));

        let gap = bands.iter().find(|band| band.start == 30.0).unwrap();
        assert_eq!(names(gap), vec![("long", 1)]);
        assert_eq!(gap.depth(), 2);

        let late = bands.iter().find(|band| band.start == 50.0).unwrap();
        assert_eq!(names(late), vec![("late", 0), ("long", 1)]);
    }

    #[test]
    fn trailing_slots_are_trimmed() {
        let bands = compile(&[
            Allocation::new("outer", "amateur", 0.0, 100.0),
            Allocation::new("inner", "fixed", 10.0, 20.0),
            Allocation::new("again", "mobile", 30.0, 40.0),
        ]);
        let again = bands.iter().find(|band| band.start == 30.0).unwrap();
        assert_eq!(names(again), vec![("outer", 0), ("again", 1)]);
        let tail = bands.last().unwrap();
        assert_eq!(tail.depth(), 1);
    }

    #[test]
    fn gaps_produce_no_band() {
        let bands = compile(&[
            Allocation::new("a", "amateur", 0.0, 10.0),
            Allocation::new("b", "amateur", 20.0, 30.0),
        ]);
        assert_eq!(bands.len(), 2);
        assert_eq!(bands[0].end, 10.0);
        assert_eq!(bands[1].start, 20.0);
    }

    #[test]
    fn degenerate_ranges_are_ignored() {
        let bands = compile(&[
            Allocation::new("empty", "amateur", 10.0, 10.0),
            Allocation::new("inverted", "amateur", 20.0, 5.0),
            Allocation::new("nan", "amateur", f64::NAN, 5.0),
        ]);
        assert!(bands.is_empty());
    }

    #[test]
    fn compile_is_deterministic() {
        let allocations = vec![
            Allocation::new("a", "amateur", 0.0, 50.0),
            Allocation::new("b", "amateur", 25.0, 75.0),
            Allocation::new("c", "amateur", 50.0, 100.0),
        ];
        assert_eq!(compile(&allocations), compile(&allocations));
    }

    fn allocation_strategy() -> impl Strategy<Value = Allocation> {
        (0u32..500, 1u32..200, prop::option::of((1u32..20, 0u32..40))).prop_map(
            |(start, len, raster)| {
                let start = f64::from(start);
                let allocation = Allocation::new("x", "amateur", start, start + f64::from(len));
                match raster {
                    Some((width, step)) => allocation.with_raster(f64::from(width), f64::from(step)),
                    None => allocation,
                }
            },
        )
    }

    proptest! {
        #[test]
        fn bands_are_ordered_and_disjoint(allocations in prop::collection::vec(allocation_strategy(), 0..12)) {
            let bands = compile(&allocations);
            for band in &bands {
                prop_assert!(band.start < band.end);
                prop_assert!(!band.labels.is_empty());
            }
            for pair in bands.windows(2) {
                prop_assert!(pair[0].end <= pair[1].start);
            }
        }

        #[test]
        fn coverage_matches_union(allocations in prop::collection::vec(allocation_strategy(), 0..12)) {
            let bands = compile(&allocations);
            prop_assert_eq!(merged_coverage(&bands), union_of(&allocations));
        }

        #[test]
        fn slots_are_unique_within_a_band(allocations in prop::collection::vec(allocation_strategy(), 0..12)) {
            for band in compile(&allocations) {
                let mut slots: Vec<usize> = band.labels.iter().map(|label| label.slot).collect();
                let before = slots.len();
                slots.dedup();
                prop_assert_eq!(before, slots.len());
            }
        }
    }
}
