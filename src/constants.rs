use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Projects shown on the homepage.
pub const FEATURED_PROJECTS_LIMIT: usize = 4;

/// Posts shown on the homepage.
pub const LATEST_POSTS_LIMIT: usize = 2;
