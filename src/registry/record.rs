use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::rect::Rect;
use crate::model::Placed;

// ============================================================================
// Output contract consumed by the browser-automation driver
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: i64,
    pub y: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRect {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
    pub width: i64,
    pub height: i64,
}

impl From<&Rect> for RecordRect {
    fn from(r: &Rect) -> Self {
        RecordRect {
            left: r.left.round() as i64,
            top: r.top.round() as i64,
            right: r.right.round() as i64,
            bottom: r.bottom.round() as i64,
            width: r.width.round() as i64,
            height: r.height.round() as i64,
        }
    }
}

impl RecordRect {
    pub fn to_rect(&self) -> Rect {
        Rect::from_edges(
            self.left as f64,
            self.top as f64,
            self.right as f64,
            self.bottom as f64,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameContext {
    pub id: Option<String>,
    pub name: Option<String>,
    pub src: Option<String>,
    pub rect: RecordRect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowHostContext {
    pub tag_name: String,
    pub id: Option<String>,
    pub rect: RecordRect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iframe: Option<FrameContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_host: Option<ShadowHostContext>,
}

/// One addressable element, as handed to the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    pub browser_agent_id: String,
    pub tag_name: String,
    pub text: String,
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    pub index: usize,
    pub weight: u32,
    pub viewport: Coordinates,
    pub page: Coordinates,
    pub center: Coordinates,
    pub rect: RecordRect,
    pub z_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ElementContext>,
}

impl Placed for ElementRecord {
    fn rect(&self) -> Rect {
        self.rect.to_rect()
    }

    fn weight(&self) -> u32 {
        self.weight
    }

    fn z_index(&self) -> i32 {
        self.z_index
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportInfo {
    pub width: i64,
    pub height: i64,
    pub scroll_x: i64,
    pub scroll_y: i64,
    pub device_pixel_ratio: f64,
    pub scroll_distance_above_viewport: i64,
    pub scroll_distance_below_viewport: i64,
}

/// Result of one scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractiveElementsData {
    pub viewport: ViewportInfo,
    pub elements: Vec<ElementRecord>,
}
