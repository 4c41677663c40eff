use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::collector::selector::{SelectorList, Tier};
use crate::config::SelectorConfig;
use crate::dom::page::{ElementNode, FrameDocumentNode, NodeId, Page, ShadowRootNode};
use crate::dom::visit::{RenderVisitor, walk_children};
use crate::error::GroundingError;

/// Nesting under which a candidate was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContextDescriptor {
    pub iframe: Option<NodeId>,
    pub shadow_host: Option<NodeId>,
}

/// How a candidate was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    Selector(Tier),
    /// Only the `cursor: pointer` fallback matched
    CursorPointer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub node: NodeId,
    pub source: MatchSource,
}

/// Context descriptors for one scan, keyed by node.
pub type ContextMap = HashMap<NodeId, ContextDescriptor>;

#[derive(Debug, Default)]
pub struct Collection {
    pub candidates: Vec<Candidate>,
    pub contexts: ContextMap,
    pub skipped_tiers: usize,
    pub skipped_frames: usize,
}

impl Collection {
    pub fn context_of(&self, node: NodeId) -> ContextDescriptor {
        self.contexts.get(&node).copied().unwrap_or_default()
    }
}

/// Gather candidate elements from the top-level document, its shadow roots
/// and its same-origin iframes.
pub fn collect(page: &Page, selectors: &SelectorConfig) -> Collection {
    let tiers = [
        (Tier::High, selectors.high.as_slice()),
        (Tier::Medium, selectors.medium.as_slice()),
        (Tier::Low, selectors.low.as_slice()),
    ];

    let parsed: Vec<_> = tiers
        .iter()
        .map(|(tier, list)| (*tier, SelectorList::parse(&list.join(", "))))
        .collect();

    let mut collector = Collector {
        page,
        tiers: &parsed,
        visited: HashSet::new(),
        out: Collection::default(),
    };

    collector.collect_scope(page.root(), ContextDescriptor::default());
    collector.out
}

struct Collector<'a> {
    page: &'a Page,
    tiers: &'a [(Tier, Result<SelectorList, GroundingError>)],
    visited: HashSet<NodeId>,
    out: Collection,
}

impl Collector<'_> {
    fn collect_scope(&mut self, scope: NodeId, ctx: ContextDescriptor) {
        let node = match self.page.node(scope) {
            Ok(node) => node,
            Err(e) => {
                warn!(?scope, error = %e, "skipping unreadable scope");
                return;
            }
        };

        let mut walk = ScopeWalk::default();
        walk_children(self.page, node.children(), &mut walk);

        let tiers = self.tiers;
        for (tier, selector) in tiers {
            let list = match selector {
                Ok(list) => list,
                Err(e) => {
                    warn!(?tier, ?scope, error = %e, "selector tier skipped");
                    self.out.skipped_tiers += 1;
                    continue;
                }
            };
            for &(id, el) in &walk.elements {
                if list.matches(el) && self.visited.insert(id) {
                    self.accept(id, MatchSource::Selector(*tier), ctx);
                }
            }
        }

        for &(id, el) in &walk.elements {
            if el.style.has_pointer_cursor() && self.visited.insert(id) {
                self.accept(id, MatchSource::CursorPointer, ctx);
            }
        }

        for &(host, root) in &walk.shadow_roots {
            let nested = ContextDescriptor {
                iframe: ctx.iframe,
                shadow_host: ctx.shadow_host.or(Some(host)),
            };
            self.collect_scope(root, nested);
        }

        for &frame in &walk.frames {
            if ctx.iframe.is_some() {
                debug!(?frame, "nested iframe not scanned");
                continue;
            }
            match self.page.content_document(frame) {
                Ok(doc) => self.collect_scope(
                    doc,
                    ContextDescriptor {
                        iframe: Some(frame),
                        shadow_host: None,
                    },
                ),
                Err(e) => {
                    debug!(?frame, error = %e, "frame skipped");
                    self.out.skipped_frames += 1;
                }
            }
        }
    }

    fn accept(&mut self, node: NodeId, source: MatchSource, ctx: ContextDescriptor) {
        self.out.candidates.push(Candidate { node, source });
        self.out.contexts.insert(node, ctx);
    }
}

/// Light-DOM elements of one scope, plus the shadow roots and frames that
/// open nested scopes.
#[derive(Default)]
struct ScopeWalk<'p> {
    elements: Vec<(NodeId, &'p ElementNode)>,
    shadow_roots: Vec<(NodeId, NodeId)>,
    frames: Vec<NodeId>,
}

impl<'p> RenderVisitor<'p> for ScopeWalk<'p> {
    fn visit_element(&mut self, page: &'p Page, id: NodeId, element: &'p ElementNode) {
        self.elements.push((id, element));
        if matches!(element.tag.as_str(), "iframe" | "frame") {
            self.frames.push(id);
        }
        if let Some(root) = element.shadow_root {
            self.shadow_roots.push((id, root));
        }
        walk_children(page, &element.children, self);
    }

    fn visit_shadow_root(&mut self, _page: &'p Page, _id: NodeId, _root: &'p ShadowRootNode) {}

    fn visit_frame_document(&mut self, page: &'p Page, _id: NodeId, document: &'p FrameDocumentNode) {
        walk_children(page, &document.children, self);
    }
}
