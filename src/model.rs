use crate::collector::collector::{Candidate, ContextDescriptor};
use crate::geometry::rect::Rect;

/// A candidate that passed the visibility filter, with its box in top-level
/// viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleCandidate {
    pub candidate: Candidate,
    pub context: ContextDescriptor,
    pub rect: Rect,
}

/// Unit of work for scoring, overlap resolution and ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportElement {
    pub candidate: Candidate,
    pub context: ContextDescriptor,
    pub rect: Rect,
    pub weight: u32,
    pub z_index: i32,
}

/// Anything with a box, a weight and a stacking level. Overlap resolution and
/// reading-order sorting work on this so they apply both to in-page elements
/// and to serialized records merged from other detectors.
pub trait Placed {
    fn rect(&self) -> Rect;
    fn weight(&self) -> u32;
    fn z_index(&self) -> i32;
}

impl Placed for ViewportElement {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn weight(&self) -> u32 {
        self.weight
    }

    fn z_index(&self) -> i32 {
        self.z_index
    }
}
