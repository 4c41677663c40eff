#![allow(dead_code)]

use element_grounding::{
    collector::{
        collector::{Candidate, ContextDescriptor, MatchSource},
        selector::Tier,
    },
    dom::page::{ElementNode, NodeId, Page, PageMetrics},
    geometry::rect::Rect,
    model::ViewportElement,
};

/// Empty page with the given viewport, no scroll.
pub fn page(width: f64, height: f64) -> Page {
    Page::new(PageMetrics {
        viewport_width: width,
        viewport_height: height,
        scroll_x: 0.0,
        scroll_y: 0.0,
        device_pixel_ratio: 1.0,
        scroll_height: height,
    })
}

pub fn el(tag: &str, left: f64, top: f64, width: f64, height: f64) -> ElementNode {
    ElementNode::new(tag, Rect::from_ltwh(left, top, width, height))
}

pub fn add(page: &mut Page, parent: NodeId, element: ElementNode) -> NodeId {
    page.append(parent, element).unwrap()
}

pub fn high(node: NodeId) -> Candidate {
    Candidate {
        node,
        source: MatchSource::Selector(Tier::High),
    }
}

/// Viewport element detached from any page, for resolver and sorter tests.
pub fn placed(node: usize, rect: Rect, weight: u32, z_index: i32) -> ViewportElement {
    ViewportElement {
        candidate: high(NodeId(node)),
        context: ContextDescriptor::default(),
        rect,
        weight,
        z_index,
    }
}

pub fn nodes_of(items: &[ViewportElement]) -> Vec<usize> {
    items.iter().map(|e| e.candidate.node.0).collect()
}
