use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::collector::collector::{Candidate, Collection, ContextDescriptor};
use crate::config::FilterConfig;
use crate::dom::hit_test::HitTester;
use crate::dom::page::{NodeId, Page};
use crate::error::GroundingError;
use crate::geometry::rect::Rect;
use crate::model::VisibleCandidate;

/// Why a candidate was dropped by the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    TooSmall,
    MostlyOffscreen,
    Oversized,
    Disabled,
    Occluded,
    Unreadable,
}

#[derive(Debug, Default)]
pub struct FilterOutcome {
    pub visible: Vec<VisibleCandidate>,
    pub rejections: BTreeMap<Rejection, usize>,
}

pub fn filter_visible(
    page: &Page,
    hit: &dyn HitTester,
    config: &FilterConfig,
    collection: &Collection,
) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();

    for candidate in &collection.candidates {
        let context = collection.context_of(candidate.node);
        match check_candidate(page, hit, config, candidate, context) {
            Ok(rect) => outcome.visible.push(VisibleCandidate {
                candidate: *candidate,
                context,
                rect,
            }),
            Err(reason) => *outcome.rejections.entry(reason).or_insert(0) += 1,
        }
    }

    outcome
}

/// Box of `node` in top-level viewport coordinates.
///
/// Only the directly enclosing iframe is accounted for.
pub fn bounding_box(page: &Page, node: NodeId, context: ContextDescriptor) -> Result<Rect, GroundingError> {
    let rect = page.element(node)?.rect;
    match context.iframe {
        Some(frame) => {
            let frame_rect = page.element(frame)?.rect;
            Ok(rect.translate(frame_rect.left, frame_rect.top))
        }
        None => Ok(rect),
    }
}

pub fn check_candidate(
    page: &Page,
    hit: &dyn HitTester,
    config: &FilterConfig,
    candidate: &Candidate,
    context: ContextDescriptor,
) -> Result<Rect, Rejection> {
    let rect = bounding_box(page, candidate.node, context).map_err(|_| Rejection::Unreadable)?;

    if rect.width < config.min_size || rect.height < config.min_size {
        return Err(Rejection::TooSmall);
    }

    let viewport = page.metrics.viewport_rect();
    if rect.visible_fraction(&viewport) < config.min_visible_fraction {
        return Err(Rejection::MostlyOffscreen);
    }

    if rect.intersection_area(&viewport) > viewport.area() * config.max_viewport_fraction {
        return Err(Rejection::Oversized);
    }

    let element = page.element(candidate.node).map_err(|_| Rejection::Unreadable)?;
    if element.is_disabled() {
        return Err(Rejection::Disabled);
    }

    match is_topmost(page, hit, candidate.node, context, &rect) {
        Ok(true) => Ok(rect),
        Ok(false) => Err(Rejection::Occluded),
        Err(e) => {
            debug!(node = ?candidate.node, error = %e, "hit test failed");
            Err(Rejection::Occluded)
        }
    }
}

/// Whether `node` is what the user would hit at the centre of `rect`.
///
/// Inside a shadow tree only the host is tested; occlusion within the
/// shadow tree itself is not detected.
pub fn is_topmost(
    page: &Page,
    hit: &dyn HitTester,
    node: NodeId,
    context: ContextDescriptor,
    rect: &Rect,
) -> Result<bool, GroundingError> {
    let (cx, cy) = rect.center();
    let top = hit.element_from_point(page, page.root(), cx, cy)?;

    let (hit_node, target) = match context.iframe {
        Some(frame) => {
            if top != Some(frame) {
                return Ok(false);
            }
            let frame_rect = page.element(frame)?.rect;
            let document = page.content_document(frame)?;
            let local = hit.element_from_point(page, document, cx - frame_rect.left, cy - frame_rect.top)?;
            (local, context.shadow_host.unwrap_or(node))
        }
        None => (top, context.shadow_host.unwrap_or(node)),
    };

    let Some(hit_node) = hit_node else {
        return Ok(false);
    };

    Ok(match context.shadow_host {
        Some(host) => hit_node == host || page.is_ancestor_of(host, hit_node),
        None => page.are_related(hit_node, target),
    })
}
