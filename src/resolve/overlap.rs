use crate::model::Placed;

/// How contained elements are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// A contained element is dropped when its container is at least as
    /// heavy and on the same stacking level; otherwise both stay.
    InPage,
    /// As `InPage`, and a heavier contained element covering at least half
    /// of its container evicts the container. Used when merging detections
    /// from several sources.
    Merge,
}

/// Drop redundant detections.
///
/// Largest boxes are considered first (heavier first on equal area), so
/// containers are seen before the controls nested in them.
pub fn resolve_overlaps<T: Placed>(mut items: Vec<T>, iou_threshold: f64, mode: ResolveMode) -> Vec<T> {
    items.sort_by(|a, b| {
        b.rect()
            .area()
            .total_cmp(&a.rect().area())
            .then_with(|| b.weight().cmp(&a.weight()))
    });

    let mut kept: Vec<T> = Vec::with_capacity(items.len());

    for current in items {
        let rect = current.rect();
        let mut keep = true;
        let mut evict = None;

        for (i, existing) in kept.iter().enumerate() {
            let existing_rect = existing.rect();

            if rect.iou(&existing_rect) > iou_threshold {
                keep = false;
                break;
            }

            if rect.is_contained_in(&existing_rect) {
                if existing.weight() >= current.weight() && existing.z_index() == current.z_index() {
                    keep = false;
                    break;
                }
                if mode == ResolveMode::Merge && rect.area() >= existing_rect.area() * 0.5 {
                    evict = Some(i);
                    break;
                }
            }
        }

        if let Some(i) = evict {
            kept.remove(i);
        }
        if keep {
            kept.push(current);
        }
    }

    kept
}
