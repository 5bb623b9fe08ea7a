use url::Url;

use crate::{entities::image::ImageRef, errors::ContentError};

const CDN_BASE: &str = "https://cdn.sanity.io";

/// Resolves image references into CDN URLs for one project/dataset.
#[derive(Debug, Clone)]
pub struct ImageUrlBuilder {
    base: Url,
}

/// The parts encoded in an asset reference such as
/// `image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetId<'a> {
    pub id: &'a str,
    pub width: u32,
    pub height: u32,
    pub format: &'a str,
}

pub fn parse_asset_ref(reference: &str) -> Option<AssetId<'_>> {
    let rest = reference.strip_prefix("image-")?;
    let (rest, format) = rest.rsplit_once('-')?;
    let (id, dimensions) = rest.rsplit_once('-')?;
    let (width, height) = dimensions.split_once('x')?;

    if id.is_empty() || format.is_empty() || !format.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    Some(AssetId {
        id,
        width: width.parse().ok()?,
        height: height.parse().ok()?,
        format,
    })
}

impl ImageUrlBuilder {
    pub fn new(project_id: &str, dataset: &str) -> Result<Self, ContentError> {
        Self::with_base(CDN_BASE, project_id, dataset)
    }

    pub fn with_base(cdn_base: &str, project_id: &str, dataset: &str) -> Result<Self, ContentError> {
        if project_id.trim().is_empty() || dataset.trim().is_empty() {
            return Err(ContentError::InvalidConfig(
                "project id and dataset are required to build image URLs".into(),
            ));
        }

        let base = Url::parse(&format!(
            "{}/images/{}/{}/",
            cdn_base.trim_end_matches('/'),
            project_id,
            dataset
        ))?;

        Ok(ImageUrlBuilder { base })
    }

    /// Starts a transform chain for `image`, or `None` when the reference
    /// cannot be resolved.
    pub fn image(&self, image: &ImageRef) -> Option<ImageUrl> {
        if let Some(url) = image.expanded_url() {
            return Some(ImageUrl::new(url.clone()));
        }

        let asset = parse_asset_ref(image.reference()?)?;
        let file_name = format!("{}-{}x{}.{}", asset.id, asset.width, asset.height, asset.format);

        self.base.join(&file_name).ok().map(ImageUrl::new)
    }

    /// Plain URL with no transforms.
    pub fn url_for(&self, image: &ImageRef) -> Option<String> {
        self.image(image).map(ImageUrl::url)
    }

    pub fn url_for_opt(&self, image: Option<&ImageRef>) -> Option<String> {
        image.and_then(|img| self.url_for(img))
    }
}

#[derive(Debug, Clone)]
pub struct ImageUrl {
    url: Url,
    width: Option<u32>,
    height: Option<u32>,
}

impl ImageUrl {
    fn new(url: Url) -> Self {
        ImageUrl {
            url,
            width: None,
            height: None,
        }
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn url(self) -> String {
        let mut url = self.url;

        if self.width.is_some() || self.height.is_some() {
            let mut pairs = url.query_pairs_mut();
            if let Some(w) = self.width {
                pairs.append_pair("w", &w.to_string());
            }
            if let Some(h) = self.height {
                pairs.append_pair("h", &h.to_string());
            }
        }

        url.to_string()
    }
}
