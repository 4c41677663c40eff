use std::collections::{BTreeMap, HashSet};

use sha1::{Digest, Sha1};
use tracing::{debug, warn};

use crate::collector::collector::ContextDescriptor;
use crate::dom::page::{ElementNode, NodeId, Page, PageMetrics};
use crate::error::GroundingError;
use crate::filter::visibility::bounding_box;
use crate::model::ViewportElement;
use crate::registry::record::{
    Coordinates, ElementContext, ElementRecord, FrameContext, RecordRect, ShadowHostContext,
    ViewportInfo,
};

pub const ATTRIBUTE_ALLOW_LIST: [&str; 10] = [
    "id",
    "class",
    "href",
    "type",
    "name",
    "value",
    "placeholder",
    "aria-label",
    "title",
    "role",
];

const ID_PREFIX: &str = "ba-";

/// Turn ordered elements into records, persisting a stable identifier on
/// each node. `elements` must already be in reading order.
pub fn build_records(page: &mut Page, elements: &[ViewportElement]) -> Vec<ElementRecord> {
    let mut taken = HashSet::new();
    let mut records = Vec::with_capacity(elements.len());

    for element in elements {
        let node = element.candidate.node;
        let id = match stable_id(page, node, &mut taken) {
            Ok(id) => id,
            Err(e) => {
                warn!(?node, error = %e, "element dropped: identifier could not be attached");
                continue;
            }
        };
        match build_record(page, element, id, records.len()) {
            Ok(record) => records.push(record),
            Err(e) => warn!(?node, error = %e, "element dropped while serializing"),
        }
    }

    records
}

/// Reuse the identifier persisted on `node`, or mint one and attach it.
///
/// The first node to claim a marker keeps it; a later node carrying the same
/// marker (a cloned subtree, say) is re-minted.
pub fn stable_id(
    page: &mut Page,
    node: NodeId,
    taken: &mut HashSet<String>,
) -> Result<String, GroundingError> {
    if let Some(existing) = page.marker(node) {
        if !taken.contains(existing) {
            let existing = existing.to_string();
            taken.insert(existing.clone());
            return Ok(existing);
        }
        debug!(?node, marker = existing, "duplicate marker replaced");
    }

    let tag = page.element(node)?.tag.clone();
    let mut id = mint_id(node, &tag, 0);
    let mut attempt = 1;
    while taken.contains(&id) {
        id = mint_id(node, &tag, attempt);
        attempt += 1;
    }

    page.set_marker(node, id.clone())?;
    taken.insert(id.clone());
    Ok(id)
}

fn mint_id(node: NodeId, tag: &str, attempt: u32) -> String {
    let mut hasher = Sha1::new();
    hasher.update(format!("{}:{}:{}", node.0, tag, attempt).as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("{}{}", ID_PREFIX, &digest[..10])
}

fn build_record(
    page: &Page,
    element: &ViewportElement,
    browser_agent_id: String,
    index: usize,
) -> Result<ElementRecord, GroundingError> {
    let node = page.element(element.candidate.node)?;
    let rect = &element.rect;
    let metrics = &page.metrics;

    let width = rect.width.round() as i64;
    let height = rect.height.round() as i64;
    let (cx, cy) = rect.center();

    Ok(ElementRecord {
        browser_agent_id,
        tag_name: node.tag.clone(),
        text: visible_text(node),
        attributes: allowed_attributes(node),
        input_type: input_type(node),
        index,
        weight: element.weight,
        viewport: Coordinates {
            x: rect.left.round() as i64,
            y: rect.top.round() as i64,
            width: Some(width),
            height: Some(height),
        },
        page: Coordinates {
            x: (rect.left + metrics.scroll_x).round() as i64,
            y: (rect.top + metrics.scroll_y).round() as i64,
            width: Some(width),
            height: Some(height),
        },
        center: Coordinates {
            x: cx.round() as i64,
            y: cy.round() as i64,
            width: None,
            height: None,
        },
        rect: RecordRect::from(rect),
        z_index: element.z_index,
        context: element_context(page, element.context)?,
    })
}

/// Trimmed rendered text, or the element's own text nodes when that is empty.
pub fn visible_text(node: &ElementNode) -> String {
    let text = node.inner_text.trim();
    if !text.is_empty() {
        return text.to_string();
    }
    node.text_nodes
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn allowed_attributes(node: &ElementNode) -> BTreeMap<String, String> {
    ATTRIBUTE_ALLOW_LIST
        .iter()
        .filter_map(|name| node.attribute(name).map(|v| (name.to_string(), v.to_string())))
        .collect()
}

pub fn input_type(node: &ElementNode) -> Option<String> {
    match node.tag.as_str() {
        "input" => Some(
            node.attribute("type")
                .map(|t| t.trim().to_ascii_lowercase())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "text".to_string()),
        ),
        "textarea" => Some("textarea".to_string()),
        "select" if node.has_attribute("multiple") => Some("select-multiple".to_string()),
        "select" => Some("select-one".to_string()),
        _ => None,
    }
}

fn element_context(
    page: &Page,
    context: ContextDescriptor,
) -> Result<Option<ElementContext>, GroundingError> {
    if context.iframe.is_none() && context.shadow_host.is_none() {
        return Ok(None);
    }

    let iframe = match context.iframe {
        Some(frame) => {
            let el = page.element(frame)?;
            Some(FrameContext {
                id: el.attribute("id").map(str::to_string),
                name: el.attribute("name").map(str::to_string),
                src: el.attribute("src").map(str::to_string),
                rect: RecordRect::from(&el.rect),
            })
        }
        None => None,
    };

    let shadow_host = match context.shadow_host {
        Some(host) => {
            let el = page.element(host)?;
            let host_ctx = ContextDescriptor {
                iframe: context.iframe,
                shadow_host: None,
            };
            let rect = bounding_box(page, host, host_ctx)?;
            Some(ShadowHostContext {
                tag_name: el.tag.clone(),
                id: el.attribute("id").map(str::to_string),
                rect: RecordRect::from(&rect),
            })
        }
        None => None,
    };

    Ok(Some(ElementContext {
        iframe,
        shadow_host,
    }))
}

/// Page-level viewport metadata, including how far the document extends
/// above and below the visible area.
pub fn viewport_info(metrics: &PageMetrics) -> ViewportInfo {
    let below = (metrics.scroll_height - metrics.viewport_height - metrics.scroll_y).max(0.0);
    ViewportInfo {
        width: metrics.viewport_width.round() as i64,
        height: metrics.viewport_height.round() as i64,
        scroll_x: metrics.scroll_x.round() as i64,
        scroll_y: metrics.scroll_y.round() as i64,
        device_pixel_ratio: metrics.device_pixel_ratio,
        scroll_distance_above_viewport: metrics.scroll_y.max(0.0).round() as i64,
        scroll_distance_below_viewport: below.round() as i64,
    }
}
