pub mod dates;
pub mod html;
