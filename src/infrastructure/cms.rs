pub mod image;
pub mod sanity;
