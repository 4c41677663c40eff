use std::path::PathBuf;

use tracing::{debug, warn};

use crate::config::GroundingConfig;
use crate::error::GroundingError;
use crate::geometry::rect::Rect;
use crate::registry::record::{Coordinates, ElementRecord, InteractiveElementsData, RecordRect};
use crate::resolve::overlap::{ResolveMode, resolve_overlaps};
use crate::resolve::position::sort_by_position;

/// Screenshot width, in pixels, that external detectors work at.
pub const DETECTOR_REFERENCE_WIDTH: f64 = 1024.0;

/// An out-of-page source of element detections, e.g. a vision model run on
/// a screenshot. Returned records must already be in viewport pixels once
/// multiplied by `scale_factor`.
pub trait Detector {
    fn detect(&self, scale_factor: f64) -> Result<Vec<ElementRecord>, GroundingError>;
}

/// Detections recorded to a JSON file as an array of element records at the
/// reference width.
pub struct FileDetector {
    pub path: PathBuf,
}

impl Detector for FileDetector {
    fn detect(&self, scale_factor: f64) -> Result<Vec<ElementRecord>, GroundingError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| GroundingError::SnapshotIo {
            path: self.path.display().to_string(),
            source: e,
        })?;
        let records: Vec<ElementRecord> =
            serde_json::from_str(&content).map_err(|e| GroundingError::JsonParse {
                context: format!("detections in {}", self.path.display()),
                source: e,
            })?;
        Ok(records.into_iter().map(|r| scale_record(r, scale_factor)).collect())
    }
}

fn scale(v: i64, factor: f64) -> i64 {
    (v as f64 * factor).round() as i64
}

fn scale_coordinates(c: Coordinates, factor: f64) -> Coordinates {
    Coordinates {
        x: scale(c.x, factor),
        y: scale(c.y, factor),
        width: c.width.map(|w| scale(w, factor)),
        height: c.height.map(|h| scale(h, factor)),
    }
}

pub fn scale_record(mut record: ElementRecord, factor: f64) -> ElementRecord {
    if factor == 1.0 {
        return record;
    }
    let r = &record.rect;
    let rect = Rect::from_edges(
        r.left as f64 * factor,
        r.top as f64 * factor,
        r.right as f64 * factor,
        r.bottom as f64 * factor,
    );
    record.rect = RecordRect::from(&rect);
    record.viewport = scale_coordinates(record.viewport, factor);
    record.page = scale_coordinates(record.page, factor);
    record.center = scale_coordinates(record.center, factor);
    record
}

/// Combine in-page records with external detections, drop duplicates across
/// sources and re-index in reading order.
pub fn merge_detections(
    scan: InteractiveElementsData,
    detections: Vec<ElementRecord>,
    config: &GroundingConfig,
) -> InteractiveElementsData {
    let before = scan.elements.len() + detections.len();
    let mut all = scan.elements;
    all.extend(detections);

    let resolved = resolve_overlaps(all, config.resolve.iou_threshold, ResolveMode::Merge);
    let mut elements = sort_by_position(resolved, config.sort.row_threshold);
    for (i, element) in elements.iter_mut().enumerate() {
        element.index = i;
    }

    debug!(before, after = elements.len(), "merged detections");

    InteractiveElementsData {
        viewport: scan.viewport,
        elements,
    }
}

/// Run `detector` and merge its output. A failing detector leaves the scan
/// unchanged.
pub fn detect_and_merge(
    scan: InteractiveElementsData,
    detector: &dyn Detector,
    config: &GroundingConfig,
) -> InteractiveElementsData {
    let scale_factor = scan.viewport.width as f64 / DETECTOR_REFERENCE_WIDTH;
    match detector.detect(scale_factor) {
        Ok(detections) => merge_detections(scan, detections, config),
        Err(e) => {
            warn!(error = %e, "detector failed, keeping in-page elements only");
            scan
        }
    }
}
