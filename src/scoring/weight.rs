use crate::collector::collector::MatchSource;
use crate::dom::page::{ElementNode, Page};
use crate::dom::style::effective_z_index;
use crate::model::{ViewportElement, VisibleCandidate};

/// Base interactivity weight by tag.
pub fn tag_weight(tag: &str) -> u32 {
    match tag {
        "button" | "a" | "input" | "select" | "textarea" => 10,
        "li" | "summary" => 8,
        "details" | "option" => 7,
        "label" => 5,
        "tr" => 4,
        "th" | "td" | "svg" | "path" => 3,
        "div" | "img" => 2,
        "span" => 1,
        _ => 1,
    }
}

/// Heuristic weight of an element. Boosts only ever raise the weight.
/// Elements found solely through the pointer-cursor fallback score 1.
pub fn element_weight(element: &ElementNode, source: MatchSource) -> u32 {
    if source == MatchSource::CursorPointer {
        return 1;
    }

    let mut weight = tag_weight(&element.tag);

    if element.attribute("role") == Some("button") {
        weight = weight.max(8);
    }
    if element.has_attribute("onclick") {
        weight = weight.max(7);
    }
    if element.has_attribute("href") {
        weight = weight.max(8);
    }
    if element.style.has_pointer_cursor() {
        weight = weight.max(4);
    }

    weight
}

/// Attach weight and effective z-index to each visible candidate.
pub fn score(page: &Page, visible: &[VisibleCandidate]) -> Vec<ViewportElement> {
    visible
        .iter()
        .filter_map(|v| {
            let element = page.element(v.candidate.node).ok()?;
            Some(ViewportElement {
                candidate: v.candidate,
                context: v.context,
                rect: v.rect,
                weight: element_weight(element, v.candidate.source),
                z_index: effective_z_index(page, v.candidate.node),
            })
        })
        .collect()
}
