use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    entities::{
        author::{Author, AuthorView},
        image::ImageRef,
        option_fields::{null_as_default, Slug},
        rich_text::RichText,
    },
    infrastructure::cms::image::ImageUrlBuilder,
    utils::dates::format_display_date,
};

// ───── Store Models ──────────────────────────────────────────────────

/// A post as returned by the listing projections (no body).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub slug: Slug,
    #[serde(default)]
    pub main_image: Option<ImageRef>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub excerpt: String,
    pub author: Author,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub slug: Slug,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: RichText,
    #[serde(default)]
    pub main_image: Option<ImageRef>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub author: Author,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub excerpt: String,
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostListItem {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub href: String,
    pub cover_image_url: Option<String>,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub published_on: Option<String>,
    pub author: AuthorView,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetail {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub cover_image_url: Option<String>,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub published_on: Option<String>,
    pub author: AuthorView,
    pub content_html: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomePageResponse {
    pub featured_projects: Vec<crate::entities::project::ProjectCard>,
    pub latest_posts: Vec<PostListItem>,
}

// ───── Conversions ──────────────────────────────────────────────────

pub fn post_href(slug: &str) -> String {
    format!("/blog/{}", urlencoding::encode(slug))
}

impl PostListItem {
    pub fn from_summary(post: &PostSummary, images: &ImageUrlBuilder) -> Self {
        PostListItem {
            id: post.id.clone(),
            title: post.title.clone(),
            slug: post.slug.current.clone(),
            href: post_href(post.slug.as_str()),
            cover_image_url: images.url_for_opt(post.main_image.as_ref()),
            excerpt: post.excerpt.clone(),
            tags: post.tags.clone(),
            published_at: post.published_at,
            published_on: post.published_at.as_ref().map(format_display_date),
            author: AuthorView::from_author(&post.author, images),
        }
    }
}

impl PostDetail {
    pub fn from_post(post: &Post, images: &ImageUrlBuilder) -> Self {
        PostDetail {
            id: post.id.clone(),
            title: post.title.clone(),
            slug: post.slug.current.clone(),
            cover_image_url: images.url_for_opt(post.main_image.as_ref()),
            excerpt: post.excerpt.clone(),
            tags: post.tags.clone(),
            published_at: post.published_at,
            published_on: post.published_at.as_ref().map(format_display_date),
            author: AuthorView::from_author(&post.author, images),
            content_html: post.content.to_html(images),
        }
    }
}
