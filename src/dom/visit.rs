use crate::dom::page::{ElementNode, FrameDocumentNode, NodeId, Page, ShadowRootNode};

/// Double dispatch over the three render node kinds.
///
/// Implementors decide whether and how to descend; `walk_children` is the
/// plain recursion most visits end with. `'p` is the page borrow, so visitors
/// may keep references to the nodes they see.
pub trait RenderVisitor<'p> {
    fn visit_element(&mut self, page: &'p Page, id: NodeId, element: &'p ElementNode);

    fn visit_shadow_root(&mut self, page: &'p Page, id: NodeId, root: &'p ShadowRootNode);

    fn visit_frame_document(&mut self, page: &'p Page, id: NodeId, document: &'p FrameDocumentNode);
}

/// Visit every child of `children` in document order.
pub fn walk_children<'p, V: RenderVisitor<'p> + ?Sized>(
    page: &'p Page,
    children: &[NodeId],
    visitor: &mut V,
) {
    for &child in children {
        if let Ok(node) = page.node(child) {
            node.accept(page, child, visitor);
        }
    }
}
