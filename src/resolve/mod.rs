pub mod overlap;
pub mod position;
