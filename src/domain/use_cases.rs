pub mod content;
pub mod project_filter;
