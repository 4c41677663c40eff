use std::collections::BTreeMap;

use crate::error::GroundingError;
use crate::registry::record::{ElementRecord, InteractiveElementsData, ViewportInfo};

/// Elements of the latest scan, addressable by index or identifier.
#[derive(Debug, Clone)]
pub struct ElementRegistry {
    pub viewport: ViewportInfo,
    by_index: BTreeMap<usize, ElementRecord>,
}

impl ElementRegistry {
    pub fn from_scan(data: InteractiveElementsData) -> Self {
        Self {
            viewport: data.viewport,
            by_index: data.elements.into_iter().map(|e| (e.index, e)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ElementRecord> {
        self.by_index.get(&index)
    }

    pub fn by_agent_id(&self, browser_agent_id: &str) -> Option<&ElementRecord> {
        self.by_index
            .values()
            .find(|e| e.browser_agent_id == browser_agent_id)
    }

    /// Element at `index` if it is a `<select>`, for dropdown actions.
    pub fn select_at(&self, index: usize) -> Result<&ElementRecord, GroundingError> {
        let element = self.get(index).ok_or_else(|| GroundingError::ElementNotFound {
            element: format!("#{}", index),
            context: "no element with this index in the latest scan".into(),
        })?;
        if element.tag_name != "select" {
            return Err(GroundingError::ElementNotFound {
                element: format!("#{}", index),
                context: format!("expected a select element, found <{}>", element.tag_name),
            });
        }
        Ok(element)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElementRecord> {
        self.by_index.values()
    }

    /// Agent-facing listing, one `[index]<tag>text</tag>` line per element.
    pub fn listing(&self) -> String {
        let mut out = String::from("<highlighted_elements>\n");
        for element in self.iter() {
            out.push_str(&listing_line(element));
            out.push('\n');
        }
        out.push_str("</highlighted_elements>");
        out
    }
}

pub fn listing_line(element: &ElementRecord) -> String {
    let mut start_tag = format!("[{}]<{}", element.index, element.tag_name);
    if let Some(input_type) = &element.input_type {
        start_tag.push_str(&format!(" type=\"{}\"", input_type));
    }
    start_tag.push('>');

    let text = element.text.replace('\n', " ");
    format!("{}{}</{}>", start_tag, text, element.tag_name)
}
