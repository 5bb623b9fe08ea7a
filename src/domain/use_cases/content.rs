use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::{
    constants::{FEATURED_PROJECTS_LIMIT, LATEST_POSTS_LIMIT},
    entities::{
        post::{Post, PostSummary},
        project::Project,
    },
    errors::ContentError,
    repositories::{
        content_store::{params, ContentStore, QueryParams},
        queries::{
            FEATURED_PROJECTS_QUERY, LATEST_POSTS_QUERY, PING_QUERY, POSTS_QUERY, POST_BY_SLUG_QUERY,
            PROJECTS_QUERY,
        },
    },
};

/// Read-only fetchers over the content store.
///
/// None of these return an error: a failed fetch is logged and comes back
/// as an empty list or `None`, so one broken query never takes down a page.
pub struct ContentHandler<S>
where
    S: ContentStore,
{
    pub store: S,
}

impl<S> ContentHandler<S>
where
    S: ContentStore,
{
    pub fn new(store: S) -> Self {
        ContentHandler { store }
    }

    /// All projects, `order` ascending.
    pub async fn list_projects(&self) -> Vec<Project> {
        self.fetch_list(&PROJECTS_QUERY, &QueryParams::new(), "projects", None).await
    }

    /// Featured projects for the homepage, at most four.
    pub async fn featured_projects(&self) -> Vec<Project> {
        self.fetch_list(
            &FEATURED_PROJECTS_QUERY,
            &QueryParams::new(),
            "featured projects",
            Some(FEATURED_PROJECTS_LIMIT),
        )
        .await
    }

    /// All posts, newest first.
    pub async fn list_posts(&self) -> Vec<PostSummary> {
        self.fetch_list(&POSTS_QUERY, &QueryParams::new(), "posts", None).await
    }

    /// The newest posts for the homepage, at most two.
    pub async fn latest_posts(&self) -> Vec<PostSummary> {
        self.fetch_list(
            &LATEST_POSTS_QUERY,
            &QueryParams::new(),
            "latest posts",
            Some(LATEST_POSTS_LIMIT),
        )
        .await
    }

    /// One post with its body and author bio; `None` when missing or when
    /// the store could not be reached.
    pub async fn post_by_slug(&self, slug: &str) -> Option<Post> {
        if slug.trim().is_empty() {
            return None;
        }

        let query_params = params([("slug", json!(slug))]);
        match self.fetch_as::<Option<Post>>(&POST_BY_SLUG_QUERY, &query_params).await {
            Ok(post) => post,
            Err(e) => {
                error!(error = %e, slug, "Error fetching post");
                None
            }
        }
    }

    /// Whether the store answers at all.
    pub async fn ping(&self) -> bool {
        match self.store.fetch(PING_QUERY, &QueryParams::new()).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Content store ping failed");
                false
            }
        }
    }

    /// Each record decodes on its own; malformed ones are logged and skipped.
    async fn fetch_list<T>(
        &self,
        query: &str,
        query_params: &QueryParams,
        what: &str,
        limit: Option<usize>,
    ) -> Vec<T>
    where
        T: DeserializeOwned,
    {
        let records = match self.fetch_as::<Option<Vec<Value>>>(query, query_params).await {
            Ok(records) => records.unwrap_or_default(),
            Err(e) => {
                error!(error = %e, "Error fetching {}", what);
                return Vec::new();
            }
        };

        let mut items: Vec<T> = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match decode_record(record) {
                Ok(item) => Some(item),
                Err(e) => {
                    error!(error = %e, index, "Skipping malformed record in {}", what);
                    None
                }
            })
            .collect();

        if let Some(limit) = limit {
            items.truncate(limit);
        }
        items
    }

    async fn fetch_as<T>(&self, query: &str, query_params: &QueryParams) -> Result<T, ContentError>
    where
        T: DeserializeOwned,
    {
        let value = self.store.fetch(query, query_params).await?;
        decode_record(value)
    }
}

fn decode_record<T: DeserializeOwned>(value: Value) -> Result<T, ContentError> {
    let id = value.get("_id").and_then(Value::as_str).map(str::to_string);
    serde_json::from_value(value).map_err(|e| match id {
        Some(id) => ContentError::MalformedContent(format!("{id}: {e}")),
        None => ContentError::MalformedContent(e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;

    mock! {
        pub Store {}

        #[async_trait]
        impl ContentStore for Store {
            async fn fetch(&self, query: &str, params: &QueryParams) -> Result<Value, ContentError>;
        }
    }

    fn project_json(n: usize, featured: bool) -> Value {
        json!({
            "_id": format!("project-{n}"),
            "title": format!("Project {n}"),
            "description": "desc",
            "technologies": ["Rust"],
            "featured": featured,
            "order": n
        })
    }

    fn post_summary_json(n: usize) -> Value {
        json!({
            "_id": format!("post-{n}"),
            "title": format!("Post {n}"),
            "slug": {"current": format!("post-{n}")},
            "publishedAt": "2024-01-24T09:30:00Z",
            "excerpt": "short",
            "author": {"name": "Ada"}
        })
    }

    fn outage() -> ContentError {
        ContentError::Transport("connection refused".into())
    }

    #[actix_rt::test]
    async fn list_projects_decodes_in_store_order() {
        let mut store = MockStore::new();
        store
            .expect_fetch()
            .withf(|query, params| query == PROJECTS_QUERY.as_str() && params.is_empty())
            .times(1)
            .returning(|_, _| Ok(json!([project_json(2, false), project_json(1, true)])));

        let projects = ContentHandler::new(store).list_projects().await;
        let ids: Vec<&str> = projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["project-2", "project-1"]);
    }

    #[actix_rt::test]
    async fn failed_fetch_degrades_to_empty_list() {
        let mut store = MockStore::new();
        store.expect_fetch().returning(|_, _| Err(outage()));

        let handler = ContentHandler::new(store);
        assert!(handler.list_projects().await.is_empty());
        assert!(handler.list_posts().await.is_empty());
    }

    #[actix_rt::test]
    async fn malformed_content_degrades_to_empty_list() {
        let mut store = MockStore::new();
        store
            .expect_fetch()
            .returning(|_, _| Ok(json!([{"_id": "no-title"}])));

        assert!(ContentHandler::new(store).list_projects().await.is_empty());
    }

    #[actix_rt::test]
    async fn malformed_record_is_skipped_not_the_list() {
        let mut store = MockStore::new();
        store.expect_fetch().returning(|_, _| {
            let mut bare_link = project_json(2, true);
            bare_link["githubUrl"] = json!("github.com/me/beta");
            let mut fractional = project_json(3, true);
            fractional["order"] = json!(2.5);
            Ok(json!([project_json(1, true), {"_id": "no-title"}, bare_link, fractional]))
        });

        let projects = ContentHandler::new(store).list_projects().await;
        let ids: Vec<&str> = projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["project-1", "project-2", "project-3"]);
        assert!(projects[1].github_url.is_none());
    }

    #[actix_rt::test]
    async fn cap_counts_only_decoded_records() {
        let mut store = MockStore::new();
        store.expect_fetch().returning(|_, _| {
            let mut records = vec![json!({"_id": "broken"}), json!({"_id": "broken-too"})];
            records.extend((0..4).map(|n| project_json(n, true)));
            Ok(Value::Array(records))
        });

        let featured = ContentHandler::new(store).featured_projects().await;
        assert_eq!(featured.len(), FEATURED_PROJECTS_LIMIT);
        assert_eq!(featured[0].id, "project-0");
    }

    #[actix_rt::test]
    async fn null_result_is_an_empty_list() {
        let mut store = MockStore::new();
        store.expect_fetch().returning(|_, _| Ok(Value::Null));

        assert!(ContentHandler::new(store).list_posts().await.is_empty());
    }

    #[actix_rt::test]
    async fn featured_projects_capped_at_four() {
        let mut store = MockStore::new();
        store
            .expect_fetch()
            .withf(|query, _| query == FEATURED_PROJECTS_QUERY.as_str())
            .returning(|_, _| Ok(Value::Array((0..7).map(|n| project_json(n, true)).collect())));

        let featured = ContentHandler::new(store).featured_projects().await;
        assert_eq!(featured.len(), FEATURED_PROJECTS_LIMIT);
        assert_eq!(featured[0].id, "project-0");
    }

    #[actix_rt::test]
    async fn latest_posts_capped_at_two() {
        let mut store = MockStore::new();
        store
            .expect_fetch()
            .withf(|query, _| query == LATEST_POSTS_QUERY.as_str())
            .returning(|_, _| Ok(Value::Array((0..5).map(post_summary_json).collect())));

        let latest = ContentHandler::new(store).latest_posts().await;
        assert_eq!(latest.len(), LATEST_POSTS_LIMIT);
    }

    #[actix_rt::test]
    async fn post_by_slug_passes_slug_param() {
        let mut store = MockStore::new();
        store
            .expect_fetch()
            .withf(|query, params| {
                query == POST_BY_SLUG_QUERY.as_str() && params.get("slug") == Some(&json!("hello"))
            })
            .times(1)
            .returning(|_, _| {
                let mut post = post_summary_json(1);
                post["content"] = json!([]);
                Ok(post)
            });

        let post = ContentHandler::new(store).post_by_slug("hello").await;
        assert_eq!(post.map(|p| p.id), Some("post-1".to_string()));
    }

    #[actix_rt::test]
    async fn post_by_slug_outage_is_absent() {
        let mut store = MockStore::new();
        store.expect_fetch().returning(|_, _| Err(outage()));

        assert!(ContentHandler::new(store).post_by_slug("hello").await.is_none());
    }

    #[actix_rt::test]
    async fn post_by_slug_missing_is_absent() {
        let mut store = MockStore::new();
        store.expect_fetch().returning(|_, _| Ok(Value::Null));

        assert!(ContentHandler::new(store).post_by_slug("nope").await.is_none());
    }

    #[actix_rt::test]
    async fn blank_slug_skips_the_store() {
        let mut store = MockStore::new();
        store.expect_fetch().never();

        assert!(ContentHandler::new(store).post_by_slug("  ").await.is_none());
    }

    #[actix_rt::test]
    async fn ping_reports_store_health() {
        let mut up = MockStore::new();
        up.expect_fetch()
            .withf(|query, _| query == PING_QUERY)
            .returning(|_, _| Ok(json!("2024-01-24T00:00:00Z")));
        assert!(ContentHandler::new(up).ping().await);

        let mut down = MockStore::new();
        down.expect_fetch().returning(|_, _| Err(outage()));
        assert!(!ContentHandler::new(down).ping().await);
    }
}
