pub mod builder;
pub mod lookup;
pub mod record;
