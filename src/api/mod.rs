pub mod pagination;
pub mod types;
pub mod validate;
