pub mod author;
pub mod image;
pub mod option_fields;
pub mod post;
pub mod project;
pub mod rich_text;
