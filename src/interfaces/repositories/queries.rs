//! GROQ queries issued by the content fetchers.
//!
//! Field projections must stay in sync with the `project`, `post` and
//! `author` schema types in the studio.

use once_cell::sync::Lazy;

use crate::constants::{FEATURED_PROJECTS_LIMIT, LATEST_POSTS_LIMIT};

const PROJECT_FIELDS: &str = r#"{
  _id,
  _createdAt,
  title,
  slug,
  description,
  projectImage,
  technologies,
  githubUrl,
  liveUrl,
  featured,
  order
}"#;

const POST_LIST_FIELDS: &str = r#"{
  _id,
  title,
  slug,
  mainImage,
  publishedAt,
  excerpt,
  author->{
    name,
    image
  },
  tags
}"#;

const POST_DETAIL_FIELDS: &str = r#"{
  _id,
  title,
  slug,
  content,
  mainImage,
  publishedAt,
  excerpt,
  author->{
    name,
    image,
    bio
  },
  tags
}"#;

pub static PROJECTS_QUERY: Lazy<String> =
    Lazy::new(|| format!(r#"*[_type == "project"] | order(order asc) {PROJECT_FIELDS}"#));

pub static FEATURED_PROJECTS_QUERY: Lazy<String> = Lazy::new(|| {
    format!(
        r#"*[_type == "project" && featured == true] | order(order asc)[0...{FEATURED_PROJECTS_LIMIT}] {PROJECT_FIELDS}"#
    )
});

pub static POSTS_QUERY: Lazy<String> =
    Lazy::new(|| format!(r#"*[_type == "post"] | order(publishedAt desc) {POST_LIST_FIELDS}"#));

pub static LATEST_POSTS_QUERY: Lazy<String> = Lazy::new(|| {
    format!(r#"*[_type == "post"] | order(publishedAt desc)[0...{LATEST_POSTS_LIMIT}] {POST_LIST_FIELDS}"#)
});

pub static POST_BY_SLUG_QUERY: Lazy<String> = Lazy::new(|| {
    format!(r#"*[_type == "post" && slug.current == $slug][0] {POST_DETAIL_FIELDS}"#)
});

pub const PING_QUERY: &str = "now()";
