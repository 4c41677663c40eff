use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use crate::collector::collector::collect;
use crate::config::GroundingConfig;
use crate::dom::hit_test::HitTester;
use crate::dom::page::Page;
use crate::filter::visibility::filter_visible;
use crate::registry::builder::{build_records, viewport_info};
use crate::registry::record::InteractiveElementsData;
use crate::resolve::overlap::{ResolveMode, resolve_overlaps};
use crate::resolve::position::sort_by_position;
use crate::scoring::weight::score;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::ScanTraceEvent;

/// Runs the collect → filter → score → resolve → sort → serialize pipeline.
///
/// A scan always produces a result; elements that fail along the way are
/// left out, and a page whose links do not form a tree scans to no elements. The only state written to `page` is each emitted element's
/// stable identifier.
pub struct Scanner {
    config: GroundingConfig,
    scans: AtomicU64,
}

impl Scanner {
    pub fn new(config: GroundingConfig) -> Self {
        Self {
            config,
            scans: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &GroundingConfig {
        &self.config
    }

    pub fn scan(&self, page: &mut Page, hit: &dyn HitTester) -> InteractiveElementsData {
        self.scan_traced(page, hit, &TraceLogger::disabled())
    }

    pub fn scan_traced(
        &self,
        page: &mut Page,
        hit: &dyn HitTester,
        tracer: &TraceLogger,
    ) -> InteractiveElementsData {
        let scan_no = self.scans.fetch_add(1, Ordering::Relaxed);
        let config = &self.config;

        if let Err(e) = page.validate() {
            warn!(scan = scan_no, error = %e, "snapshot rejected");
            let viewport = viewport_info(&page.metrics);
            tracer.log(
                &ScanTraceEvent::now(scan_no)
                    .with_malformed(e.to_string())
                    .with_emitted(0, viewport.scroll_distance_below_viewport),
            );
            return InteractiveElementsData {
                viewport,
                elements: vec![],
            };
        }

        let collection = collect(page, &config.selectors);
        let filtered = filter_visible(page, hit, &config.filter, &collection);
        let scored = score(page, &filtered.visible);
        let resolved = resolve_overlaps(scored, config.resolve.iou_threshold, ResolveMode::InPage);
        let resolved_count = resolved.len();
        let ordered = sort_by_position(resolved, config.sort.row_threshold);

        let elements = build_records(page, &ordered);
        let viewport = viewport_info(&page.metrics);

        debug!(
            scan = scan_no,
            candidates = collection.candidates.len(),
            visible = filtered.visible.len(),
            resolved = resolved_count,
            emitted = elements.len(),
            "scan complete"
        );

        tracer.log(
            &ScanTraceEvent::now(scan_no)
                .with_collection(
                    collection.candidates.len(),
                    collection.skipped_tiers,
                    collection.skipped_frames,
                )
                .with_filter(filtered.visible.len(), &filtered.rejections)
                .with_resolved(resolved_count)
                .with_emitted(elements.len(), viewport.scroll_distance_below_viewport),
        );

        InteractiveElementsData { viewport, elements }
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Scanner::new(GroundingConfig::default())
    }
}

/// Scan with the default configuration.
pub fn scan(page: &mut Page, hit: &dyn HitTester) -> InteractiveElementsData {
    Scanner::default().scan(page, hit)
}
