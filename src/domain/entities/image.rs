use serde::{Deserialize, Serialize};
use url::Url;

/// An image field as stored in the CMS: an asset reference plus the
/// editorial metadata attached to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub asset: Option<AssetRef>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

/// Either a bare reference (`image-<id>-<w>x<h>-<ext>`) or an expanded
/// asset document carrying its own `url`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetRef {
    #[serde(rename = "_ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<Url>,
}

impl ImageRef {
    pub fn reference(&self) -> Option<&str> {
        self.asset.as_ref()?.reference.as_deref()
    }

    pub fn expanded_url(&self) -> Option<&Url> {
        self.asset.as_ref()?.url.as_ref()
    }
}
