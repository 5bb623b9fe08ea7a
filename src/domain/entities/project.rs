use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use validator::{Validate, ValidationError};

use crate::{
    entities::{
        image::ImageRef,
        option_fields::{lenient_url, null_as_default, Slug},
        rich_text::RichText,
    },
    infrastructure::cms::image::ImageUrlBuilder,
};

// ───── Constants ──────────────────────────────────────────────────────
const MAX_SEARCH_LENGTH: u64 = 100;
const MAX_SELECTED_TECHNOLOGIES: u64 = 25;
const MAX_TECHNOLOGY_LENGTH: usize = 50;

// ───── Store Model ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    pub title: String,
    #[serde(default)]
    pub slug: Option<Slug>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub project_image: Option<ImageRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
    #[serde(default, deserialize_with = "lenient_url")]
    pub github_url: Option<Url>,
    #[serde(default, deserialize_with = "lenient_url")]
    pub live_url: Option<Url>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub featured: bool,
    /// Sanity `number`, which may be fractional.
    #[serde(default, deserialize_with = "null_as_default")]
    pub order: f64,
    #[serde(default)]
    pub long_description: Option<RichText>,
}

// ───── API Response Models ──────────────────────────────────────────

/// What a project tile needs: text, a resolved image and outbound links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectCard {
    pub id: String,
    pub title: String,
    pub slug: Option<String>,
    pub description: String,
    pub image_url: Option<String>,
    pub technologies: Vec<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub featured: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectCard>,
    pub technologies: Vec<String>,
    pub total: usize,
    pub visible: usize,
    pub filtered: bool,
    pub summary: String,
}

impl ProjectCard {
    pub fn from_project(project: &Project, images: &ImageUrlBuilder) -> Self {
        ProjectCard {
            id: project.id.clone(),
            title: project.title.clone(),
            slug: project
                .slug
                .as_ref()
                .filter(|s| !s.is_empty())
                .map(|s| s.current.clone()),
            description: project.description.clone(),
            image_url: images.url_for_opt(project.project_image.as_ref()),
            technologies: project.technologies.clone(),
            github_url: project.github_url.as_ref().map(Url::to_string),
            live_url: project.live_url.as_ref().map(Url::to_string),
            featured: project.featured,
        }
    }
}

// ───── Input & Validation Requests ──────────────────────────────────

/// Gallery filter inputs taken from `?search=...&tech=...&tech=...`.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct ProjectQuery {
    #[validate(length(max = MAX_SEARCH_LENGTH, message = "Search term is too long"))]
    pub search: String,

    #[validate(
        length(max = MAX_SELECTED_TECHNOLOGIES, message = "Too many technologies selected"),
        custom(function = "validate_technologies")
    )]
    pub tech: Vec<String>,
}

impl ProjectQuery {
    /// The search term is kept verbatim. Repeated `tech` keys accumulate;
    /// empty values are ignored.
    pub fn from_query_string(query: &str) -> Self {
        let mut parsed = ProjectQuery::default();

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "search" => parsed.search = value.into_owned(),
                "tech" if !value.is_empty() => parsed.tech.push(value.into_owned()),
                _ => {}
            }
        }

        parsed
    }
}

pub fn validate_technologies(tech: &[String]) -> Result<(), ValidationError> {
    if tech.iter().any(|t| t.chars().count() > MAX_TECHNOLOGY_LENGTH) {
        return Err(new_validation_error(
            "invalid_technology_length",
            "Technology names must be at most 50 characters",
        ));
    }
    Ok(())
}

fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}
