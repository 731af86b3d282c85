use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tracing::debug;

use shared_gateway::ApiGateway;
use shared_models::envelope::ItemsEnvelope;
use shared_models::error::ApiError;
use shared_models::params::ListParams;
use shared_query::{QueryCache, QueryKey, STALE_LIST, STALE_NONE};

use crate::models::{Patient, PatientRequest, PatientUpdateRequest};

const PATIENTS_SCOPE: &str = "patients";
const PATIENT_SCOPE: &str = "patient";

pub struct PatientService {
    gateway: Arc<ApiGateway>,
    cache: Arc<QueryCache>,
}

impl PatientService {
    pub fn new(gateway: Arc<ApiGateway>, cache: Arc<QueryCache>) -> Self {
        Self { gateway, cache }
    }

    /// Also serves the assignment dialog's search box: each search string is
    /// its own cache key, so retyping a previous query is answered locally.
    pub async fn list(&self, params: &ListParams) -> Result<Vec<Patient>, ApiError> {
        let key = QueryKey::new(PATIENTS_SCOPE, params.cache_key());
        let gateway = self.gateway.clone();
        let query = params.to_query();

        let value = self
            .cache
            .fetch(key, STALE_LIST, move || {
                async move {
                    let envelope: ItemsEnvelope<Value> = gateway.get("/patients", &query).await?;
                    Ok(envelope.into_items().unwrap_or_else(|| Value::Array(Vec::new())))
                }
                .boxed()
            })
            .await?;
        shared_query::decode(value)
    }

    pub async fn by_id(&self, id: i64) -> Result<Patient, ApiError> {
        if id <= 0 {
            return Err(ApiError::InvalidRequest("a patient id is required".to_string()));
        }

        let key = QueryKey::new(PATIENT_SCOPE, id.to_string());
        let gateway = self.gateway.clone();

        let value = self
            .cache
            .fetch(key, STALE_NONE, move || {
                async move {
                    let envelope: ItemsEnvelope<Value> =
                        gateway.get(&format!("/patients/{}", id), &[]).await?;
                    envelope.into_items().ok_or_else(|| {
                        ApiError::Decode("patient response carried no items".to_string())
                    })
                }
                .boxed()
            })
            .await?;
        shared_query::decode(value)
    }

    pub async fn create(&self, request: &PatientRequest) -> Result<(), ApiError> {
        self.gateway.post_unit("/patients", request).await?;
        debug!(name = %request.name, "patient created");
        self.cache.invalidate_scope(PATIENTS_SCOPE);
        Ok(())
    }

    /// Patient updates take the id in the path, unlike doctors and
    /// specialities.
    pub async fn update(&self, request: &PatientUpdateRequest) -> Result<(), ApiError> {
        self.gateway
            .put_unit(&format!("/patients/{}", request.id), request)
            .await?;
        self.cache.invalidate_scope(PATIENTS_SCOPE);
        self.cache
            .invalidate(&QueryKey::new(PATIENT_SCOPE, request.id.to_string()));
        Ok(())
    }
}
