use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tracing::debug;

use shared_gateway::ApiGateway;
use shared_models::envelope::ItemsEnvelope;
use shared_models::error::ApiError;
use shared_models::params::ListParams;
use shared_models::refs::DoctorRef;
use shared_query::{QueryCache, QueryKey, STALE_LIST, STALE_NONE};

use crate::models::{AttachDoctorsRequest, Speciality, SpecialityRequest, SpecialityUpdateRequest};

const SPECIALITIES_SCOPE: &str = "specialities";
const SPECIALITY_SCOPE: &str = "speciality";
const DOCTORS_BY_SPECIALITY_SCOPE: &str = "doctorsBySpeciality";

pub struct SpecialityService {
    gateway: Arc<ApiGateway>,
    cache: Arc<QueryCache>,
}

impl SpecialityService {
    pub fn new(gateway: Arc<ApiGateway>, cache: Arc<QueryCache>) -> Self {
        Self { gateway, cache }
    }

    pub async fn list(&self, params: &ListParams) -> Result<Vec<Speciality>, ApiError> {
        let key = QueryKey::new(SPECIALITIES_SCOPE, params.cache_key());
        let gateway = self.gateway.clone();
        let query = params.to_query();

        let value = self
            .cache
            .fetch(key, STALE_LIST, move || {
                async move {
                    let envelope: ItemsEnvelope<Value> =
                        gateway.get("/specialities", &query).await?;
                    Ok(envelope.into_items().unwrap_or_else(|| Value::Array(Vec::new())))
                }
                .boxed()
            })
            .await?;
        shared_query::decode(value)
    }

    pub async fn by_id(&self, id: i64) -> Result<Speciality, ApiError> {
        if id <= 0 {
            return Err(ApiError::InvalidRequest(
                "a speciality id is required".to_string(),
            ));
        }

        let key = QueryKey::new(SPECIALITY_SCOPE, id.to_string());
        let gateway = self.gateway.clone();

        let value = self
            .cache
            .fetch(key, STALE_NONE, move || {
                async move {
                    let envelope: ItemsEnvelope<Value> =
                        gateway.get(&format!("/specialities/{}", id), &[]).await?;
                    envelope.into_items().ok_or_else(|| {
                        ApiError::Decode("speciality response carried no items".to_string())
                    })
                }
                .boxed()
            })
            .await?;
        shared_query::decode(value)
    }

    /// Doctors attached to a speciality, the source of the cascaded doctor
    /// selector. Scoped to the speciality id so each speciality caches its
    /// own roster.
    pub async fn doctors_by_speciality(
        &self,
        speciality_id: i64,
    ) -> Result<Vec<DoctorRef>, ApiError> {
        if speciality_id <= 0 {
            return Err(ApiError::InvalidRequest(
                "a speciality id is required".to_string(),
            ));
        }

        let key = QueryKey::new(DOCTORS_BY_SPECIALITY_SCOPE, speciality_id.to_string());
        let gateway = self.gateway.clone();

        let value = self
            .cache
            .fetch(key, STALE_LIST, move || {
                async move {
                    let envelope: ItemsEnvelope<Value> = gateway
                        .get(
                            &format!("/DoctorsHasSpecialities/specialities/{}", speciality_id),
                            &[],
                        )
                        .await?;
                    Ok(envelope.into_items().unwrap_or_else(|| Value::Array(Vec::new())))
                }
                .boxed()
            })
            .await?;
        shared_query::decode(value)
    }

    pub async fn create(&self, request: &SpecialityRequest) -> Result<(), ApiError> {
        self.gateway.post_unit("/specialities", request).await?;
        debug!(name = %request.name, "speciality created");
        self.cache.invalidate_scope(SPECIALITIES_SCOPE);
        Ok(())
    }

    pub async fn update(&self, request: &SpecialityUpdateRequest) -> Result<(), ApiError> {
        self.gateway.put_unit("/specialities", request).await?;
        self.cache.invalidate_scope(SPECIALITIES_SCOPE);
        self.cache
            .invalidate(&QueryKey::new(SPECIALITY_SCOPE, request.id.to_string()));
        Ok(())
    }

    /// Attaches doctors to a speciality. Drops the cached roster for that
    /// speciality as well, so the cascade reflects the new mapping at once.
    pub async fn attach_doctors(&self, request: &AttachDoctorsRequest) -> Result<(), ApiError> {
        self.gateway
            .post_unit("/DoctorsHasSpecialities", request)
            .await?;
        self.cache.invalidate_scope(SPECIALITIES_SCOPE);
        self.cache.invalidate(&QueryKey::new(
            SPECIALITY_SCOPE,
            request.speciality_id.to_string(),
        ));
        self.cache.invalidate(&QueryKey::new(
            DOCTORS_BY_SPECIALITY_SCOPE,
            request.speciality_id.to_string(),
        ));
        Ok(())
    }
}
