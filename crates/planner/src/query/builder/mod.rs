pub mod condition;
pub mod select;
