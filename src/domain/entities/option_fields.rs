use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

/// Deserializes a field that the content store may send as `null`,
/// falling back to `T::default()`.
///
/// Pair with `#[serde(default)]` so a missing key behaves the same way:
///
/// - missing → `T::default()`
/// - `null` → `T::default()`
/// - value → value
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserializes an optional link, dropping values that are not absolute
/// URLs (e.g. `github.com/me/repo` typed without a scheme) instead of
/// failing the whole record.
pub fn lenient_url<'de, D>(deserializer: D) -> Result<Option<Url>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|link| Url::parse(link.trim()).ok()))
}

/// The store's slug object, `{ "current": "my-post" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slug {
    #[serde(default, deserialize_with = "null_as_default")]
    pub current: String,
}

impl Slug {
    pub fn as_str(&self) -> &str {
        &self.current
    }

    pub fn is_empty(&self) -> bool {
        self.current.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Tagged {
        #[serde(default, deserialize_with = "null_as_default")]
        tags: Vec<String>,
    }

    #[test]
    fn null_and_missing_decode_to_default() {
        let missing: Tagged = serde_json::from_str("{}").unwrap();
        let null: Tagged = serde_json::from_str(r#"{"tags": null}"#).unwrap();
        let present: Tagged = serde_json::from_str(r#"{"tags": ["rust"]}"#).unwrap();

        assert!(missing.tags.is_empty());
        assert!(null.tags.is_empty());
        assert_eq!(present.tags, vec!["rust"]);
    }

    #[derive(Debug, Deserialize)]
    struct Linked {
        #[serde(default, deserialize_with = "lenient_url")]
        link: Option<Url>,
    }

    #[test]
    fn lenient_url_drops_unparseable_links() {
        let good: Linked = serde_json::from_str(r#"{"link": "https://github.com/me/repo"}"#).unwrap();
        let bare: Linked = serde_json::from_str(r#"{"link": "github.com/me/repo"}"#).unwrap();
        let null: Linked = serde_json::from_str(r#"{"link": null}"#).unwrap();
        let missing: Linked = serde_json::from_str("{}").unwrap();

        assert_eq!(good.link.unwrap().as_str(), "https://github.com/me/repo");
        assert!(bare.link.is_none());
        assert!(null.link.is_none());
        assert!(missing.link.is_none());
    }

    #[test]
    fn slug_decodes_from_store_shape() {
        let slug: Slug = serde_json::from_str(r#"{"_type": "slug", "current": "hello-world"}"#).unwrap();
        assert_eq!(slug.as_str(), "hello-world");
        assert!(!slug.is_empty());
    }
}
