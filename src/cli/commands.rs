use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::GroundingConfig;
use crate::dom::hit_test::PaintOrderHitTester;
use crate::dom::page::Page;
use crate::error::GroundingError;
use crate::merge::{FileDetector, detect_and_merge};
use crate::registry::lookup::ElementRegistry;
use crate::registry::record::InteractiveElementsData;
use crate::scan::Scanner;
use crate::trace::logger::TraceLogger;

// ============================================================================
// scan subcommand
// ============================================================================

pub fn cmd_scan(
    config: GroundingConfig,
    snapshot: &str,
    format: &str,
    output: Option<&str>,
    trace: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = Page::load(Path::new(snapshot))?;
    let tracer = match trace {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };

    let scanner = Scanner::new(config);
    let data = scanner.scan_traced(&mut page, &PaintOrderHitTester, &tracer);
    info!(snapshot, elements = data.elements.len(), "scanned snapshot");

    write_output(&render(data, format)?, output)?;
    Ok(())
}

// ============================================================================
// merge subcommand
// ============================================================================

pub fn cmd_merge(
    config: GroundingConfig,
    snapshot: &str,
    detections: &str,
    format: &str,
    output: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = Page::load(Path::new(snapshot))?;
    let scanner = Scanner::new(config);
    let data = scanner.scan(&mut page, &PaintOrderHitTester);

    let detector = FileDetector {
        path: PathBuf::from(detections),
    };
    let merged = detect_and_merge(data, &detector, scanner.config());
    info!(snapshot, detections, elements = merged.elements.len(), "merged detections");

    write_output(&render(merged, format)?, output)?;
    Ok(())
}

// ============================================================================
// Output
// ============================================================================

/// Render a scan as pretty JSON, or as the agent-facing text listing.
pub fn render(data: InteractiveElementsData, format: &str) -> Result<String, GroundingError> {
    match format {
        "text" => {
            let registry = ElementRegistry::from_scan(data);
            let v = &registry.viewport;
            Ok(format!(
                "Viewport {}x{} (scroll {}, {} px above, {} px below)\n{}\n",
                v.width,
                v.height,
                v.scroll_y,
                v.scroll_distance_above_viewport,
                v.scroll_distance_below_viewport,
                registry.listing()
            ))
        }
        _ => serde_json::to_string_pretty(&data)
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| GroundingError::JsonSerialize {
                context: "scan result".into(),
                source: e,
            }),
    }
}

fn write_output(content: &str, output: Option<&str>) -> Result<(), GroundingError> {
    match output {
        Some(path) => std::fs::write(path, content).map_err(|e| GroundingError::SnapshotIo {
            path: path.to_string(),
            source: e,
        }),
        None => {
            print!("{}", content);
            Ok(())
        }
    }
}
