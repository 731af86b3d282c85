use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tracing::debug;

use shared_gateway::ApiGateway;
use shared_models::envelope::ItemsEnvelope;
use shared_models::error::ApiError;
use shared_models::params::ListParams;
use shared_query::{QueryCache, QueryKey, STALE_LIST};

use crate::models::{Office, OfficeRequest, OfficeUpdateRequest};

const OFFICES_SCOPE: &str = "offices";

pub struct OfficeService {
    gateway: Arc<ApiGateway>,
    cache: Arc<QueryCache>,
}

impl OfficeService {
    pub fn new(gateway: Arc<ApiGateway>, cache: Arc<QueryCache>) -> Self {
        Self { gateway, cache }
    }

    pub async fn list(&self, params: &ListParams) -> Result<Vec<Office>, ApiError> {
        let key = QueryKey::new(OFFICES_SCOPE, params.cache_key());
        let gateway = self.gateway.clone();
        let query = params.to_query();

        let value = self
            .cache
            .fetch(key, STALE_LIST, move || {
                async move {
                    let envelope: ItemsEnvelope<Value> = gateway.get("/offices", &query).await?;
                    Ok(envelope.into_items().unwrap_or_else(|| Value::Array(Vec::new())))
                }
                .boxed()
            })
            .await?;
        shared_query::decode(value)
    }

    pub async fn create(&self, request: &OfficeRequest) -> Result<(), ApiError> {
        self.gateway.post_unit("/offices", request).await?;
        debug!(office = %request.name, "office created");
        self.cache.invalidate_scope(OFFICES_SCOPE);
        Ok(())
    }

    pub async fn update(&self, request: &OfficeUpdateRequest) -> Result<(), ApiError> {
        self.gateway.put_unit("/offices", request).await?;
        self.cache.invalidate_scope(OFFICES_SCOPE);
        Ok(())
    }
}
