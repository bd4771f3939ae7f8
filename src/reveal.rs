//! One-shot scroll-reveal tracking
//!
//! Each observed region flips to revealed the first time it is at least
//! `threshold` visible, then stops being observed. Regions live in an arena
//! keyed by `RegionId`, so adding or removing elements never shifts another
//! region's handle.

use std::collections::BTreeMap;

use crate::error::{ConfigError, Result};

/// Largest shortfall below the threshold still treated as a crossing
pub const CROSSING_SLACK: f32 = 1e-4;

/// Stable handle for an observed region
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionId(u32);

impl RegionId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Source of visibility events
pub trait IntersectionHost {
    type Element;

    /// Start observing; return false if the element is no longer in the document
    fn observe(&mut self, id: RegionId, element: &Self::Element) -> bool;

    /// Stop observing (no-op for unknown ids)
    fn unobserve(&mut self, id: RegionId);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RegionState {
    revealed: bool,
    /// Still registered with the host
    tracked: bool,
}

/// Tracks reveal state for a set of regions sharing one threshold
#[derive(Debug, Clone)]
pub struct ViewportRevealTracker {
    threshold: f32,
    regions: BTreeMap<RegionId, RegionState>,
    next_id: u32,
}

impl ViewportRevealTracker {
    pub fn new(threshold: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        Ok(Self {
            threshold,
            regions: BTreeMap::new(),
            next_id: 1,
        })
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Visible fraction for a raw observer report
    ///
    /// Observers can report a threshold crossing a hair under the threshold;
    /// only ratios within `CROSSING_SLACK` below it are snapped up. Reports
    /// that are not intersecting count as zero.
    pub fn sample_fraction(&self, is_intersecting: bool, ratio: f32) -> f32 {
        if !is_intersecting {
            return 0.0;
        }
        if ratio < self.threshold && self.threshold - ratio <= CROSSING_SLACK {
            self.threshold
        } else {
            ratio
        }
    }

    /// Register and observe elements. `None` entries (unmounted refs) and
    /// elements the host reports as detached are skipped.
    ///
    /// Returns the ids of regions now being observed, in input order.
    pub fn observe<H: IntersectionHost>(
        &mut self,
        elements: impl IntoIterator<Item = Option<H::Element>>,
        host: &mut H,
    ) -> Vec<RegionId> {
        let mut observed = Vec::new();
        for element in elements {
            let Some(element) = element else {
                log::debug!("Skipping unmounted reveal region");
                continue;
            };
            let id = RegionId(self.next_id);
            if !host.observe(id, &element) {
                log::debug!("Skipping detached reveal region");
                continue;
            }
            self.next_id += 1;
            self.regions.insert(
                id,
                RegionState {
                    revealed: false,
                    tracked: true,
                },
            );
            observed.push(id);
        }
        observed
    }

    /// Handle a visibility sample. Returns the id if this sample revealed it.
    ///
    /// Zero (or NaN) visibility never reveals, even with a zero threshold.
    pub fn on_intersection(
        &mut self,
        id: RegionId,
        visible_fraction: f32,
        host: &mut impl IntersectionHost,
    ) -> Option<RegionId> {
        let region = self.regions.get_mut(&id)?;
        if region.revealed || !region.tracked {
            return None;
        }
        if !(visible_fraction > 0.0 && visible_fraction >= self.threshold) {
            return None;
        }

        region.revealed = true;
        region.tracked = false;
        host.unobserve(id);
        log::debug!("Region {} revealed at {:.2} visible", id.0, visible_fraction);
        Some(id)
    }

    pub fn is_revealed(&self, id: RegionId) -> bool {
        self.regions.get(&id).is_some_and(|r| r.revealed)
    }

    /// Regions still waiting to be revealed
    pub fn tracked_count(&self) -> usize {
        self.regions.values().filter(|r| r.tracked).count()
    }

    /// Forget a region (e.g. its element was removed), unobserving if needed
    pub fn remove(&mut self, id: RegionId, host: &mut impl IntersectionHost) {
        if let Some(region) = self.regions.remove(&id) {
            if region.tracked {
                host.unobserve(id);
            }
        }
    }

    /// Unobserve every still-tracked region. Revealed state is kept.
    pub fn dispose(&mut self, host: &mut impl IntersectionHost) {
        for (id, region) in self.regions.iter_mut() {
            if region.tracked {
                host.unobserve(*id);
                region.tracked = false;
            }
        }
    }
}
