//! Interactive-element discovery and grounding for browser agents.
//!
//! A page snapshot is scanned for every actionable element (main document,
//! same-origin iframes, shadow roots), filtered to what is visible and on
//! top, deduplicated, put in reading order and returned as records with
//! stable identifiers the agent can target.

pub mod cli;
pub mod collector;
pub mod config;
pub mod dom;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod merge;
pub mod model;
pub mod registry;
pub mod resolve;
pub mod scan;
pub mod scoring;
pub mod trace;

pub use config::GroundingConfig;
pub use dom::hit_test::{HitTester, PaintOrderHitTester};
pub use dom::page::{ElementNode, NodeId, Page, PageMetrics};
pub use error::GroundingError;
pub use registry::record::{ElementRecord, InteractiveElementsData};
pub use scan::{Scanner, scan};
