pub mod page;
pub mod style;
pub mod visit;
