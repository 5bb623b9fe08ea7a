pub mod content_store;
pub mod queries;
