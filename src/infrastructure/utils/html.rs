use ammonia::{Builder, UrlRelative};

/// Sanitizes rendered rich text to remove unsafe HTML.
///
/// Links get `rel="nofollow noopener noreferrer"`, relative URLs are dropped
/// and `class` survives on `<code>` so syntax highlighters can pick up the
/// `language-*` hint.
pub fn sanitize_html(content: &str) -> String {
    Builder::default()
        .link_rel(Some("nofollow noopener noreferrer"))
        .url_relative(UrlRelative::Deny)
        .add_tag_attributes("code", &["class"])
        .clean(content)
        .to_string()
}
