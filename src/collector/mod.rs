pub mod collector;
pub mod selector;
