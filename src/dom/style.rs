use serde::{Deserialize, Serialize};

use crate::dom::page::{NodeId, Page};

/// The subset of computed style the grounding pipeline reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedStyle {
    #[serde(default)]
    pub cursor: Option<String>,
    /// `None` stands for `z-index: auto`.
    #[serde(default)]
    pub z_index: Option<i32>,
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub pointer_events: Option<String>,
}

impl ComputedStyle {
    pub fn has_pointer_cursor(&self) -> bool {
        self.cursor.as_deref() == Some("pointer")
    }

    /// Whether the renderer would consider this element as a hit-test target.
    pub fn is_hit_testable(&self) -> bool {
        self.display.as_deref() != Some("none")
            && !matches!(self.visibility.as_deref(), Some("hidden") | Some("collapse"))
            && self.pointer_events.as_deref() != Some("none")
    }
}

/// Stacking value inherited from the nearest element (self included) with an
/// explicit z-index, walking the composed tree outward. 0 when none is found.
///
/// The walk stops at the frame document boundary.
pub fn effective_z_index(page: &Page, node: NodeId) -> i32 {
    for id in std::iter::once(node).chain(page.ancestors(node)) {
        match page.element(id) {
            Ok(el) => {
                if let Some(z) = el.style.z_index {
                    return z;
                }
            }
            Err(_) => return 0,
        }
    }
    0
}
