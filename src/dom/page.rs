use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dom::style::ComputedStyle;
use crate::dom::visit::RenderVisitor;
use crate::error::GroundingError;
use crate::geometry::rect::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

// ============================================================================
// Render nodes
// ============================================================================

/// A rendered element. `rect` is relative to the viewport of the frame
/// document that owns the element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementNode {
    /// Lowercase tag name
    pub tag: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub style: ComputedStyle,
    #[serde(default)]
    pub rect: Rect,
    /// Rendered text of the element and its descendants
    #[serde(default)]
    pub inner_text: String,
    /// Direct text-node children, in order
    #[serde(default)]
    pub text_nodes: Vec<String>,
    #[serde(default)]
    pub parent: Option<NodeId>,
    #[serde(default)]
    pub children: Vec<NodeId>,
    #[serde(default)]
    pub shadow_root: Option<NodeId>,
    /// Frame document of an `<iframe>`; absent when the frame is not readable
    #[serde(default)]
    pub content_document: Option<NodeId>,
    /// Stable identifier persisted by an earlier scan
    #[serde(default)]
    pub marker: Option<String>,
}

impl ElementNode {
    pub fn new(tag: &str, rect: Rect) -> Self {
        ElementNode {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            style: ComputedStyle::default(),
            rect,
            inner_text: String::new(),
            text_nodes: vec![],
            parent: None,
            children: vec![],
            shadow_root: None,
            content_document: None,
            marker: None,
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn cursor(mut self, cursor: &str) -> Self {
        self.style.cursor = Some(cursor.to_string());
        self
    }

    pub fn z_index(mut self, z: i32) -> Self {
        self.style.z_index = Some(z);
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.inner_text = text.to_string();
        self
    }

    pub fn text_node(mut self, text: &str) -> Self {
        self.text_nodes.push(text.to_string());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn class_list(&self) -> impl Iterator<Item = &str> {
        self.attribute("class").unwrap_or("").split_whitespace()
    }

    /// Explicit `disabled` flag or `aria-disabled="true"`.
    pub fn is_disabled(&self) -> bool {
        self.has_attribute("disabled")
            || self
                .attribute("aria-disabled")
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowRootNode {
    pub host: NodeId,
    #[serde(default)]
    pub children: Vec<NodeId>,
}

/// A document: the top-level page (no owner) or the content of an iframe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDocumentNode {
    #[serde(default)]
    pub owner: Option<NodeId>,
    #[serde(default = "default_true")]
    pub accessible: bool,
    #[serde(default)]
    pub children: Vec<NodeId>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RenderNode {
    Element(ElementNode),
    ShadowRoot(ShadowRootNode),
    FrameDocument(FrameDocumentNode),
}

impl RenderNode {
    pub fn children(&self) -> &[NodeId] {
        match self {
            RenderNode::Element(el) => &el.children,
            RenderNode::ShadowRoot(root) => &root.children,
            RenderNode::FrameDocument(doc) => &doc.children,
        }
    }

    pub fn accept<'p, V: RenderVisitor<'p> + ?Sized>(&'p self, page: &'p Page, id: NodeId, visitor: &mut V) {
        match self {
            RenderNode::Element(el) => visitor.visit_element(page, id, el),
            RenderNode::ShadowRoot(root) => visitor.visit_shadow_root(page, id, root),
            RenderNode::FrameDocument(doc) => visitor.visit_frame_document(page, id, doc),
        }
    }
}

// ============================================================================
// Page snapshot
// ============================================================================

#[derive(Clone, Copy)]
enum LinkKind {
    Child,
    ShadowRoot,
    ContentDocument,
}

impl LinkKind {
    fn name(self) -> &'static str {
        match self {
            LinkKind::Child => "child",
            LinkKind::ShadowRoot => "shadow root",
            LinkKind::ContentDocument => "content document",
        }
    }
}

fn malformed(node: NodeId, reason: String) -> GroundingError {
    GroundingError::MalformedSnapshot { node, reason }
}

/// Window-level measurements of the top-level document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetrics {
    pub viewport_width: f64,
    pub viewport_height: f64,
    #[serde(default)]
    pub scroll_x: f64,
    #[serde(default)]
    pub scroll_y: f64,
    #[serde(default = "default_pixel_ratio")]
    pub device_pixel_ratio: f64,
    /// Total scrollable height of the top-level document
    #[serde(default)]
    pub scroll_height: f64,
}

fn default_pixel_ratio() -> f64 {
    1.0
}

impl Default for PageMetrics {
    fn default() -> Self {
        Self {
            viewport_width: 1024.0,
            viewport_height: 768.0,
            scroll_x: 0.0,
            scroll_y: 0.0,
            device_pixel_ratio: 1.0,
            scroll_height: 768.0,
        }
    }
}

impl PageMetrics {
    pub fn viewport_rect(&self) -> Rect {
        Rect::from_ltwh(0.0, 0.0, self.viewport_width, self.viewport_height)
    }
}

/// Arena snapshot of a rendered page. Node 0 is the top-level document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default)]
    pub metrics: PageMetrics,
    pub nodes: Vec<RenderNode>,
}

impl Page {
    pub fn new(metrics: PageMetrics) -> Self {
        Page {
            metrics,
            nodes: vec![RenderNode::FrameDocument(FrameDocumentNode {
                owner: None,
                accessible: true,
                children: vec![],
            })],
        }
    }

    /// Parse a driver snapshot and check its links with [`Page::validate`].
    pub fn from_json(json: &str) -> Result<Self, GroundingError> {
        let page: Page = serde_json::from_str(json).map_err(|e| GroundingError::JsonParse {
            context: "page snapshot".into(),
            source: e,
        })?;
        page.validate()?;
        Ok(page)
    }

    pub fn load(path: &Path) -> Result<Self, GroundingError> {
        let content = std::fs::read_to_string(path).map_err(|e| GroundingError::SnapshotIo {
            path: path.display().to_string(),
            source: e,
        })?;
        Page::from_json(&content)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> Result<&RenderNode, GroundingError> {
        self.nodes.get(id.0).ok_or(GroundingError::UnknownNode(id))
    }

    pub fn element(&self, id: NodeId) -> Result<&ElementNode, GroundingError> {
        match self.node(id)? {
            RenderNode::Element(el) => Ok(el),
            _ => Err(GroundingError::NotAnElement {
                node: id,
                context: "element lookup".into(),
            }),
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementNode, GroundingError> {
        match self.nodes.get_mut(id.0) {
            Some(RenderNode::Element(el)) => Ok(el),
            Some(_) => Err(GroundingError::NotAnElement {
                node: id,
                context: "element update".into(),
            }),
            None => Err(GroundingError::UnknownNode(id)),
        }
    }

    /// Readable document of an iframe element.
    pub fn content_document(&self, frame: NodeId) -> Result<NodeId, GroundingError> {
        let el = self.element(frame)?;
        let doc_id = el
            .content_document
            .ok_or(GroundingError::CrossOriginFrame { frame })?;
        match self.node(doc_id)? {
            RenderNode::FrameDocument(doc) if doc.accessible => Ok(doc_id),
            RenderNode::FrameDocument(_) => Err(GroundingError::CrossOriginFrame { frame }),
            _ => Err(GroundingError::NotAnElement {
                node: doc_id,
                context: "iframe content document".into(),
            }),
        }
    }

    /// Parent in the composed tree: a shadow root hands over to its host,
    /// a frame document ends the walk.
    pub fn composed_parent(&self, id: NodeId) -> Option<NodeId> {
        let parent = match self.node(id).ok()? {
            RenderNode::Element(el) => el.parent?,
            RenderNode::ShadowRoot(root) => return Some(root.host),
            RenderNode::FrameDocument(_) => return None,
        };
        match self.node(parent).ok()? {
            RenderNode::Element(_) => Some(parent),
            RenderNode::ShadowRoot(root) => Some(root.host),
            RenderNode::FrameDocument(_) => None,
        }
    }

    /// Composed-tree ancestors of `node`, nearest first, up to the frame
    /// document. Never yields more than the arena holds.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.composed_parent(node), |&id| self.composed_parent(id))
            .take(self.nodes.len())
    }

    pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|id| id == ancestor)
    }

    /// Same node, or one contains the other.
    pub fn are_related(&self, a: NodeId, b: NodeId) -> bool {
        a == b || self.is_ancestor_of(a, b) || self.is_ancestor_of(b, a)
    }

    /// Check that the snapshot is a tree: node 0 is a document, every link
    /// names an existing node of the right kind, each node is reached at most
    /// once from the root, and back links agree with the node that lists it.
    ///
    /// The walks over a page assume this holds.
    pub fn validate(&self) -> Result<(), GroundingError> {
        let root = self.root();
        if !matches!(self.nodes.first(), Some(RenderNode::FrameDocument(_))) {
            return Err(malformed(root, "node 0 is not a document".into()));
        }

        let mut seen = vec![false; self.nodes.len()];
        seen[root.0] = true;
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            let node = self.node(id)?;
            let mut links: Vec<(NodeId, LinkKind)> =
                node.children().iter().map(|&c| (c, LinkKind::Child)).collect();
            if let RenderNode::Element(el) = node {
                links.extend(el.shadow_root.map(|s| (s, LinkKind::ShadowRoot)));
                links.extend(el.content_document.map(|d| (d, LinkKind::ContentDocument)));
            }

            for (link, kind) in links {
                let target = self
                    .nodes
                    .get(link.0)
                    .ok_or_else(|| malformed(id, format!("{} {} does not exist", kind.name(), link.0)))?;

                let back = match (kind, target) {
                    (LinkKind::Child, RenderNode::Element(el)) => el.parent,
                    (LinkKind::ShadowRoot, RenderNode::ShadowRoot(shadow)) => Some(shadow.host),
                    (LinkKind::ContentDocument, RenderNode::FrameDocument(doc)) => doc.owner,
                    _ => return Err(malformed(link, format!("wrong node kind for {}", kind.name()))),
                };
                if let Some(back) = back.filter(|&b| b != id) {
                    return Err(malformed(
                        link,
                        format!("listed by {} but points back at {}", id.0, back.0),
                    ));
                }

                if std::mem::replace(&mut seen[link.0], true) {
                    return Err(malformed(link, "reached twice (cycle or shared node)".into()));
                }
                stack.push(link);
            }
        }
        Ok(())
    }

    pub fn marker(&self, id: NodeId) -> Option<&str> {
        self.element(id).ok()?.marker.as_deref()
    }

    pub fn set_marker(&mut self, id: NodeId, marker: String) -> Result<(), GroundingError> {
        self.element_mut(id)?.marker = Some(marker);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------------

    fn push(&mut self, node: RenderNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn children_mut(&mut self, id: NodeId) -> Result<&mut Vec<NodeId>, GroundingError> {
        match self.nodes.get_mut(id.0) {
            Some(RenderNode::Element(el)) => Ok(&mut el.children),
            Some(RenderNode::ShadowRoot(root)) => Ok(&mut root.children),
            Some(RenderNode::FrameDocument(doc)) => Ok(&mut doc.children),
            None => Err(GroundingError::UnknownNode(id)),
        }
    }

    /// Append `element` under `parent` (an element, shadow root or document).
    pub fn append(&mut self, parent: NodeId, mut element: ElementNode) -> Result<NodeId, GroundingError> {
        self.node(parent)?;
        element.parent = Some(parent);
        let id = self.push(RenderNode::Element(element));
        self.children_mut(parent)?.push(id);
        Ok(id)
    }

    pub fn attach_shadow(&mut self, host: NodeId) -> Result<NodeId, GroundingError> {
        self.element(host)?;
        let id = self.push(RenderNode::ShadowRoot(ShadowRootNode {
            host,
            children: vec![],
        }));
        self.element_mut(host)?.shadow_root = Some(id);
        Ok(id)
    }

    /// Give an iframe element its document. Inaccessible documents model
    /// cross-origin frames.
    pub fn attach_frame_document(&mut self, frame: NodeId, accessible: bool) -> Result<NodeId, GroundingError> {
        self.element(frame)?;
        let id = self.push(RenderNode::FrameDocument(FrameDocumentNode {
            owner: Some(frame),
            accessible,
            children: vec![],
        }));
        self.element_mut(frame)?.content_document = Some(id);
        Ok(id)
    }
}
