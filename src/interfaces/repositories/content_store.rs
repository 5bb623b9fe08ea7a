use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ContentError;

/// Named query parameters, sent as `$name` with a JSON-encoded value.
pub type QueryParams = BTreeMap<String, Value>;

/// A read-only content store answering fixed queries with JSON.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Runs `query` and returns its `result` document (an array, an object
    /// or `null`).
    async fn fetch(&self, query: &str, params: &QueryParams) -> Result<Value, ContentError>;
}

#[async_trait]
impl<T> ContentStore for Arc<T>
where
    T: ContentStore + ?Sized,
{
    async fn fetch(&self, query: &str, params: &QueryParams) -> Result<Value, ContentError> {
        (**self).fetch(query, params).await
    }
}

pub fn params<const N: usize>(pairs: [(&str, Value); N]) -> QueryParams {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}
