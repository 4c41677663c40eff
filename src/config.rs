use serde::{Deserialize, Serialize};

// ============================================================================
// Grounding pipeline configuration (YAML section of element-grounding.yaml)
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundingConfig {
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub resolve: ResolveConfig,
    #[serde(default)]
    pub sort: SortConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Minimum width and height in pixels
    #[serde(default = "default_min_size")]
    pub min_size: f64,

    /// Share of an element's area that must be inside the viewport
    #[serde(default = "default_min_visible_fraction")]
    pub min_visible_fraction: f64,

    /// Elements whose visible area exceeds this share of the viewport are dropped
    #[serde(default = "default_max_viewport_fraction")]
    pub max_viewport_fraction: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_size: 2.0,
            min_visible_fraction: 0.30,
            max_viewport_fraction: 0.50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolveConfig {
    #[serde(default = "default_iou_threshold")]
    pub iou_threshold: f64,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self { iou_threshold: 0.70 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortConfig {
    /// Max vertical distance in pixels between tops on the same row
    #[serde(default = "default_row_threshold")]
    pub row_threshold: f64,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self { row_threshold: 20.0 }
    }
}

/// Selector tiers, evaluated high to low. Each entry is one selector; a tier
/// with an unparseable entry is skipped as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorConfig {
    #[serde(default = "default_high")]
    pub high: Vec<String>,
    #[serde(default = "default_medium")]
    pub medium: Vec<String>,
    #[serde(default = "default_low")]
    pub low: Vec<String>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            high: default_high(),
            medium: default_medium(),
            low: default_low(),
        }
    }
}

// Serde default helpers
fn default_min_size() -> f64 { 2.0 }
fn default_min_visible_fraction() -> f64 { 0.30 }
fn default_max_viewport_fraction() -> f64 { 0.50 }
fn default_iou_threshold() -> f64 { 0.70 }
fn default_row_threshold() -> f64 { 20.0 }

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_high() -> Vec<String> {
    strings(&[
        "a",
        "button",
        "input:not([type='hidden'])",
        "select",
        "textarea",
        "summary",
        "details",
        "[role='button']",
        "[role='link']",
        "[role='checkbox']",
        "[role='radio']",
        "[role='switch']",
        "[role='tab']",
        "[role='menuitem']",
        "[role='option']",
        "[role='combobox']",
        "[role='textbox']",
        "[role='searchbox']",
        "[contenteditable='true']",
    ])
}

fn default_medium() -> Vec<String> {
    strings(&[
        "[onclick]",
        "[tabindex]:not([tabindex='-1'])",
        "[aria-haspopup]",
        "[aria-expanded]",
        "[aria-controls]",
        "label[for]",
        "option",
        "li[role]",
        "li[onclick]",
        "tr[onclick]",
        "th[onclick]",
        "td[onclick]",
        "svg[role]",
        "[draggable='true']",
    ])
}

fn default_low() -> Vec<String> {
    strings(&[
        ".btn",
        ".button",
        ".clickable",
        "[class*='btn-']",
        "[class*='button']",
        "[class*='clickable']",
        "[data-action]",
        "[data-toggle]",
        "[data-click]",
        "[jsaction]",
    ])
}
