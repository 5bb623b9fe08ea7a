use serde::{Deserialize, Serialize};

use crate::{
    entities::{image::ImageRef, rich_text::RichText},
    infrastructure::cms::image::ImageUrlBuilder,
};

const AVATAR_SIZE: u32 = 96;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub image: Option<ImageRef>,
    #[serde(default)]
    pub bio: Option<RichText>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorView {
    pub name: String,
    pub image_url: Option<String>,
    pub bio_html: Option<String>,
}

impl AuthorView {
    pub fn from_author(author: &Author, images: &ImageUrlBuilder) -> Self {
        AuthorView {
            name: author.name.clone(),
            image_url: author
                .image
                .as_ref()
                .and_then(|img| images.image(img))
                .map(|url| url.width(AVATAR_SIZE).height(AVATAR_SIZE).url()),
            bio_html: author
                .bio
                .as_ref()
                .filter(|bio| !bio.is_empty())
                .map(|bio| bio.to_html(images)),
        }
    }
}
