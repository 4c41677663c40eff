use serde::Serialize;
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::filter::visibility::Rejection;

/// One line of the scan trace: how many elements survived each stage.
#[derive(Debug, Default, Serialize)]
pub struct ScanTraceEvent {
    pub timestamp_ms: u128,
    pub scan: u64,

    pub candidates: usize,
    pub skipped_tiers: usize,
    pub skipped_frames: usize,

    pub visible: usize,
    pub rejections: BTreeMap<Rejection, usize>,

    pub resolved: usize,
    pub emitted: usize,

    pub scroll_distance_below: Option<i64>,

    /// Why the page was rejected before collection
    pub malformed: Option<String>,
}

impl ScanTraceEvent {
    pub fn now(scan: u64) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            scan,
            ..Default::default()
        }
    }

    pub fn with_collection(mut self, candidates: usize, skipped_tiers: usize, skipped_frames: usize) -> Self {
        self.candidates = candidates;
        self.skipped_tiers = skipped_tiers;
        self.skipped_frames = skipped_frames;
        self
    }

    pub fn with_filter(mut self, visible: usize, rejections: &BTreeMap<Rejection, usize>) -> Self {
        self.visible = visible;
        self.rejections = rejections.clone();
        self
    }

    pub fn with_resolved(mut self, resolved: usize) -> Self {
        self.resolved = resolved;
        self
    }

    pub fn with_malformed(mut self, reason: String) -> Self {
        self.malformed = Some(reason);
        self
    }

    pub fn with_emitted(mut self, emitted: usize, scroll_distance_below: i64) -> Self {
        self.emitted = emitted;
        self.scroll_distance_below = Some(scroll_distance_below);
        self
    }
}
