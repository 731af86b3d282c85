use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tracing::debug;

use shared_gateway::ApiGateway;
use shared_models::envelope::ItemsEnvelope;
use shared_models::error::ApiError;
use shared_models::params::ListParams;
use shared_query::{QueryCache, QueryKey, STALE_LIST, STALE_NONE};

use crate::models::{Doctor, DoctorRequest, DoctorUpdateRequest};

const DOCTORS_SCOPE: &str = "doctors";
const DOCTOR_SCOPE: &str = "doctor";

pub struct DoctorService {
    gateway: Arc<ApiGateway>,
    cache: Arc<QueryCache>,
}

impl DoctorService {
    pub fn new(gateway: Arc<ApiGateway>, cache: Arc<QueryCache>) -> Self {
        Self { gateway, cache }
    }

    pub async fn list(&self, params: &ListParams) -> Result<Vec<Doctor>, ApiError> {
        let key = QueryKey::new(DOCTORS_SCOPE, params.cache_key());
        let gateway = self.gateway.clone();
        let query = params.to_query();

        let value = self
            .cache
            .fetch(key, STALE_LIST, move || {
                async move {
                    let envelope: ItemsEnvelope<Value> = gateway.get("/doctors", &query).await?;
                    Ok(envelope.into_items().unwrap_or_else(|| Value::Array(Vec::new())))
                }
                .boxed()
            })
            .await?;
        shared_query::decode(value)
    }

    pub async fn by_id(&self, id: i64) -> Result<Doctor, ApiError> {
        if id <= 0 {
            return Err(ApiError::InvalidRequest("a doctor id is required".to_string()));
        }

        let key = QueryKey::new(DOCTOR_SCOPE, id.to_string());
        let gateway = self.gateway.clone();

        let value = self
            .cache
            .fetch(key, STALE_NONE, move || {
                async move {
                    let envelope: ItemsEnvelope<Value> =
                        gateway.get(&format!("/doctors/{}", id), &[]).await?;
                    envelope.into_items().ok_or_else(|| {
                        ApiError::Decode("doctor response carried no items".to_string())
                    })
                }
                .boxed()
            })
            .await?;
        shared_query::decode(value)
    }

    pub async fn create(&self, request: &DoctorRequest) -> Result<(), ApiError> {
        self.gateway.post_unit("/doctors", request).await?;
        debug!(name = %request.name, "doctor created");
        self.cache.invalidate_scope(DOCTORS_SCOPE);
        Ok(())
    }

    /// The backend takes doctor updates with the id in the body, not the path.
    pub async fn update(&self, request: &DoctorUpdateRequest) -> Result<(), ApiError> {
        self.gateway.put_unit("/doctors", request).await?;
        self.cache.invalidate_scope(DOCTORS_SCOPE);
        self.cache
            .invalidate(&QueryKey::new(DOCTOR_SCOPE, request.id.to_string()));
        Ok(())
    }
}
