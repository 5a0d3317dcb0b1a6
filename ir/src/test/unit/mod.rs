pub mod category;
pub mod pattern;
pub mod types;
