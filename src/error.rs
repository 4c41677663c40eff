use thiserror::Error;

use crate::dom::page::NodeId;

#[derive(Debug, Error)]
pub enum GroundingError {
    /// Node id does not exist in the page snapshot
    #[error("Unknown node {0:?}")]
    UnknownNode(NodeId),

    /// Operation needs an element but the node is a shadow root or document
    #[error("Node {node:?} is not an element ({context})")]
    NotAnElement { node: NodeId, context: String },

    /// Snapshot links do not form a tree rooted at node 0
    #[error("Malformed snapshot at node {node:?}: {reason}")]
    MalformedSnapshot { node: NodeId, reason: String },

    /// Frame document cannot be read from the top-level document
    #[error("Cross-origin frame {frame:?} is not accessible")]
    CrossOriginFrame { frame: NodeId },

    /// Selector string could not be parsed
    #[error("Invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    /// Hit-testing at a point failed in the host renderer
    #[error("Hit test failed at ({x}, {y}): {reason}")]
    HitTest { x: f64, y: f64, reason: String },

    /// Element not present in the latest scan, or not of the expected kind
    #[error("Element '{element}' not found: {context}")]
    ElementNotFound { element: String, context: String },

    /// Reading or writing a snapshot/result file failed
    #[error("I/O error on {path}: {source}")]
    SnapshotIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing failed (snapshot or detections file)
    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization failed (scan result)
    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// YAML config was present but malformed
    #[error("Config parse error in {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}
