//! Diagnostics side channel for evaluated regions.

use crate::motion::BoundingRegion;

/// Why a region was recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionTag {
    /// Region of primitive `index` during refinement attempt `attempt` (1-based)
    Trial {
        /// Refinement attempt, starting at 1
        attempt: u32,
        /// Primitive position in that attempt's sequence
        index: usize,
    },
    /// Region of primitive `index` in the approved sequence
    Final {
        /// Primitive position in the approved sequence
        index: usize,
    },
}

impl RegionTag {
    /// True for regions of the approved sequence
    #[inline]
    pub fn is_final(&self) -> bool {
        matches!(self, RegionTag::Final { .. })
    }
}

impl std::fmt::Display for RegionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionTag::Trial { attempt, index } => write!(f, "trial-{}-{}", attempt, index),
            RegionTag::Final { index } => write!(f, "final-{}", index),
        }
    }
}

/// Receiver of every region the refiner evaluates.
///
/// Recording must not influence planning.
pub trait RegionSink {
    /// Take one region with its tag
    fn record(&mut self, tag: RegionTag, region: &BoundingRegion);
}

/// Discards everything
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl RegionSink for NullSink {
    #[inline]
    fn record(&mut self, _tag: RegionTag, _region: &BoundingRegion) {}
}

/// Keeps every record in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    /// Tagged regions in arrival order
    pub records: Vec<(RegionTag, BoundingRegion)>,
}

impl RecordingSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Regions tagged Final, in sequence order
    pub fn final_regions(&self) -> Vec<BoundingRegion> {
        self.records
            .iter()
            .filter(|(tag, _)| tag.is_final())
            .map(|(_, region)| *region)
            .collect()
    }

    /// Number of Trial records
    pub fn trial_count(&self) -> usize {
        self.records.iter().filter(|(tag, _)| !tag.is_final()).count()
    }
}

impl RegionSink for RecordingSink {
    fn record(&mut self, tag: RegionTag, region: &BoundingRegion) {
        self.records.push((tag, *region));
    }
}
