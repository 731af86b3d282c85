use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tracing::debug;

use shared_gateway::ApiGateway;
use shared_models::envelope::ItemsEnvelope;
use shared_models::error::ApiError;
use shared_models::params::ListParams;
use shared_query::{QueryCache, QueryKey, STALE_LIST, STALE_NONE};

use crate::models::{User, UserRequest, UserUpdateRequest};

const USERS_SCOPE: &str = "users";
const USER_SCOPE: &str = "user";

pub struct UserService {
    gateway: Arc<ApiGateway>,
    cache: Arc<QueryCache>,
}

impl UserService {
    pub fn new(gateway: Arc<ApiGateway>, cache: Arc<QueryCache>) -> Self {
        Self { gateway, cache }
    }

    pub async fn list(&self, params: &ListParams) -> Result<Vec<User>, ApiError> {
        let key = QueryKey::new(USERS_SCOPE, params.cache_key());
        let gateway = self.gateway.clone();
        let query = params.to_query();

        let value = self
            .cache
            .fetch(key, STALE_LIST, move || {
                async move {
                    let envelope: ItemsEnvelope<Value> = gateway.get("/users", &query).await?;
                    Ok(envelope.into_items().unwrap_or_else(|| Value::Array(Vec::new())))
                }
                .boxed()
            })
            .await?;
        shared_query::decode(value)
    }

    pub async fn by_id(&self, id: i64) -> Result<User, ApiError> {
        if id <= 0 {
            return Err(ApiError::InvalidRequest("a user id is required".to_string()));
        }

        let key = QueryKey::new(USER_SCOPE, id.to_string());
        let gateway = self.gateway.clone();

        let value = self
            .cache
            .fetch(key, STALE_NONE, move || {
                async move {
                    let envelope: ItemsEnvelope<Value> =
                        gateway.get(&format!("/users/{}", id), &[]).await?;
                    envelope.into_items().ok_or_else(|| {
                        ApiError::Decode("user response carried no items".to_string())
                    })
                }
                .boxed()
            })
            .await?;
        shared_query::decode(value)
    }

    pub async fn create(&self, request: &UserRequest) -> Result<(), ApiError> {
        self.gateway.post_unit("/users", request).await?;
        debug!(username = %request.username, "user created");
        self.cache.invalidate_scope(USERS_SCOPE);
        Ok(())
    }

    pub async fn update(&self, request: &UserUpdateRequest) -> Result<(), ApiError> {
        self.gateway.put_unit("/users", request).await?;
        self.cache.invalidate_scope(USERS_SCOPE);
        self.cache
            .invalidate(&QueryKey::new(USER_SCOPE, request.id.to_string()));
        Ok(())
    }
}
