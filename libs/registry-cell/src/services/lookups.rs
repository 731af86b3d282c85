use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;

use shared_gateway::ApiGateway;
use shared_models::envelope::ItemsEnvelope;
use shared_models::error::ApiError;
use shared_models::refs::{Duration, NamedRef};
use shared_query::{QueryCache, QueryKey, STALE_LIST};

const DURATIONS_SCOPE: &str = "durations";
const GENDERS_SCOPE: &str = "genders";
const DOCUMENT_TYPES_SCOPE: &str = "documentTypes";

/// Read-only catalogs that feed form selectors. These change rarely, so
/// everything here rides the list staleness window.
pub struct LookupService {
    gateway: Arc<ApiGateway>,
    cache: Arc<QueryCache>,
}

impl LookupService {
    pub fn new(gateway: Arc<ApiGateway>, cache: Arc<QueryCache>) -> Self {
        Self { gateway, cache }
    }

    pub async fn durations(&self) -> Result<Vec<Duration>, ApiError> {
        self.catalog(DURATIONS_SCOPE, "/durations").await
    }

    pub async fn genders(&self) -> Result<Vec<NamedRef>, ApiError> {
        self.catalog(GENDERS_SCOPE, "/genders").await
    }

    pub async fn document_types(&self) -> Result<Vec<NamedRef>, ApiError> {
        self.catalog(DOCUMENT_TYPES_SCOPE, "/documentTypes").await
    }

    async fn catalog<T>(&self, scope: &'static str, path: &str) -> Result<Vec<T>, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let key = QueryKey::new(scope, "all");
        let gateway = self.gateway.clone();
        let path = path.to_string();

        let value = self
            .cache
            .fetch(key, STALE_LIST, move || {
                async move {
                    let envelope: ItemsEnvelope<Value> = gateway.get(&path, &[]).await?;
                    Ok(envelope.into_items().unwrap_or_else(|| Value::Array(Vec::new())))
                }
                .boxed()
            })
            .await?;
        shared_query::decode(value)
    }
}
