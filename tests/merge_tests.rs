mod common;

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::common::utils::*;
use element_grounding::config::GroundingConfig;
use element_grounding::error::GroundingError;
use element_grounding::geometry::rect::Rect;
use element_grounding::merge::{Detector, FileDetector, detect_and_merge, merge_detections, scale_record};
use element_grounding::registry::record::{Coordinates, ElementRecord, InteractiveElementsData, RecordRect};
use element_grounding::{PaintOrderHitTester, scan};

fn detection(id: &str, left: f64, top: f64, width: f64, height: f64, weight: u32) -> ElementRecord {
    let rect = Rect::from_ltwh(left, top, width, height);
    let (cx, cy) = rect.center();
    let at = |x: f64, y: f64| Coordinates {
        x: x.round() as i64,
        y: y.round() as i64,
        width: Some(width.round() as i64),
        height: Some(height.round() as i64),
    };
    ElementRecord {
        browser_agent_id: id.to_string(),
        tag_name: "div".to_string(),
        text: String::new(),
        attributes: BTreeMap::new(),
        input_type: None,
        index: 0,
        weight,
        viewport: at(left, top),
        page: at(left, top),
        center: Coordinates {
            x: cx.round() as i64,
            y: cy.round() as i64,
            width: None,
            height: None,
        },
        rect: RecordRect::from(&rect),
        z_index: 0,
        context: None,
    }
}

/// Two buttons side by side at the top of a 1024px page.
fn toolbar_scan() -> InteractiveElementsData {
    let mut page = page(1024.0, 768.0);
    let root = page.root();
    add(&mut page, root, el("button", 10.0, 10.0, 100.0, 30.0).text("New"));
    add(&mut page, root, el("button", 200.0, 10.0, 100.0, 30.0).text("Open"));
    scan(&mut page, &PaintOrderHitTester)
}

struct FixedDetector(Vec<ElementRecord>);

impl Detector for FixedDetector {
    fn detect(&self, scale_factor: f64) -> Result<Vec<ElementRecord>, GroundingError> {
        Ok(self.0.iter().cloned().map(|r| scale_record(r, scale_factor)).collect())
    }
}

struct OfflineDetector;

impl Detector for OfflineDetector {
    fn detect(&self, _scale_factor: f64) -> Result<Vec<ElementRecord>, GroundingError> {
        Err(GroundingError::SnapshotIo {
            path: "vision-model".into(),
            source: std::io::Error::other("model offline"),
        })
    }
}

// =========================================================================
// Merging
// =========================================================================

#[test]
fn duplicate_detection_is_dropped() {
    let scan = toolbar_scan();
    let original_ids: Vec<String> = scan.elements.iter().map(|e| e.browser_agent_id.clone()).collect();

    let merged = merge_detections(
        scan,
        vec![detection("vision-1", 10.0, 10.0, 100.0, 30.0, 1)],
        &GroundingConfig::default(),
    );

    let ids: Vec<String> = merged.elements.iter().map(|e| e.browser_agent_id.clone()).collect();
    assert_eq!(ids, original_ids);
}

#[test]
fn new_detection_is_added_and_indexes_rebuilt() {
    let scan = toolbar_scan();

    let merged = merge_detections(
        scan,
        vec![detection("vision-canvas", 400.0, 12.0, 80.0, 26.0, 2)],
        &GroundingConfig::default(),
    );

    let ids: Vec<&str> = merged.elements.iter().map(|e| e.browser_agent_id.as_str()).collect();
    assert_eq!(ids.len(), 3);
    assert_eq!(ids[2], "vision-canvas");
    let indexes: Vec<usize> = merged.elements.iter().map(|e| e.index).collect();
    assert_eq!(indexes, vec![0, 1, 2]);
}

#[test]
fn detections_slot_into_reading_order() {
    let scan = toolbar_scan();

    let merged = merge_detections(
        scan,
        vec![detection("vision-banner", 600.0, 200.0, 80.0, 26.0, 2), detection("vision-logo", 900.0, 10.0, 40.0, 30.0, 2)],
        &GroundingConfig::default(),
    );

    let ids: Vec<&str> = merged.elements.iter().map(|e| e.browser_agent_id.as_str()).collect();
    assert_eq!(ids[2], "vision-logo");
    assert_eq!(ids[3], "vision-banner");
    assert_eq!(merged.elements[3].index, 3);
}

#[test]
fn detector_box_around_control_is_evicted() {
    // Vision model boxed the row; the real button covers more than half of it
    let scan = toolbar_scan();

    let merged = merge_detections(
        scan,
        vec![detection("vision-row", 10.0, 10.0, 150.0, 30.0, 2)],
        &GroundingConfig::default(),
    );

    assert!(merged.elements.iter().all(|e| e.browser_agent_id != "vision-row"));
    assert_eq!(merged.elements.len(), 2);
}

#[test]
fn detections_are_scaled_from_reference_width() {
    let record = detection("vision-1", 100.0, 50.0, 40.0, 20.0, 2);

    let scaled = scale_record(record.clone(), 2.0);

    assert_eq!((scaled.rect.left, scaled.rect.top, scaled.rect.right, scaled.rect.bottom), (200, 100, 280, 140));
    assert_eq!((scaled.rect.width, scaled.rect.height), (80, 40));
    assert_eq!((scaled.center.x, scaled.center.y), (240, 120));
    assert_eq!(scaled.viewport.width, Some(80));
    assert_eq!(scaled.center.width, None);

    assert_eq!(scale_record(record.clone(), 1.0), record);
}

#[test]
fn detect_and_merge_uses_viewport_scale() {
    let mut page = page(2048.0, 1536.0);
    let root = page.root();
    add(&mut page, root, el("button", 10.0, 10.0, 100.0, 30.0));
    let scan = scan(&mut page, &PaintOrderHitTester);

    // At reference width this sits at 500,300; on a 2048px viewport at 1000,600
    let detector = FixedDetector(vec![detection("vision-1", 500.0, 300.0, 50.0, 20.0, 2)]);
    let merged = detect_and_merge(scan, &detector, &GroundingConfig::default());

    let added = merged
        .elements
        .iter()
        .find(|e| e.browser_agent_id == "vision-1")
        .unwrap();
    assert_eq!((added.rect.left, added.rect.top, added.rect.width), (1000, 600, 100));
}

#[test]
fn failing_detector_leaves_scan_unchanged() {
    let scan = toolbar_scan();
    let expected = scan.clone();

    let merged = detect_and_merge(scan, &OfflineDetector, &GroundingConfig::default());

    assert_eq!(merged, expected);
}

// =========================================================================
// File detector
// =========================================================================

#[test]
fn file_detector_missing_file_is_io_error() {
    let detector = FileDetector {
        path: PathBuf::from("/nonexistent/detections.json"),
    };
    assert!(matches!(detector.detect(1.0), Err(GroundingError::SnapshotIo { .. })));
}

#[test]
fn file_detector_reads_and_scales_records() {
    let path = std::env::temp_dir().join("element_grounding_detections.json");
    let records = vec![detection("vision-7", 100.0, 100.0, 50.0, 50.0, 3)];
    std::fs::write(&path, serde_json::to_string(&records).unwrap()).unwrap();

    let detector = FileDetector { path: path.clone() };
    let detected = detector.detect(0.5).unwrap();

    assert_eq!(detected.len(), 1);
    assert_eq!(detected[0].browser_agent_id, "vision-7");
    assert_eq!((detected[0].rect.left, detected[0].rect.width), (50, 25));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn file_detector_rejects_malformed_json() {
    let path = std::env::temp_dir().join("element_grounding_bad_detections.json");
    std::fs::write(&path, "[{\"tagName\": 3}]").unwrap();

    let detector = FileDetector { path: path.clone() };
    assert!(matches!(detector.detect(1.0), Err(GroundingError::JsonParse { .. })));

    let _ = std::fs::remove_file(&path);
}
