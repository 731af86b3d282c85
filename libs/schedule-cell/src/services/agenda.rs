use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;

use shared_gateway::ApiGateway;
use shared_models::envelope::ItemsEnvelope;
use shared_models::error::ApiError;
use shared_query::{QueryCache, QueryKey, STALE_LIST, STALE_NONE};

use crate::models::{AgendaQuery, Appointment};
use crate::services::{APPOINTMENTS_SCOPE, APPOINTMENT_SCOPE};

/// Read side of the schedule board: the appointments of one day, paged and
/// filtered.
pub struct AgendaService {
    gateway: Arc<ApiGateway>,
    cache: Arc<QueryCache>,
}

impl AgendaService {
    pub fn new(gateway: Arc<ApiGateway>, cache: Arc<QueryCache>) -> Self {
        Self { gateway, cache }
    }

    pub async fn for_day(&self, query: &AgendaQuery) -> Result<Vec<Appointment>, ApiError> {
        let key = QueryKey::new(APPOINTMENTS_SCOPE, query.cache_key());
        let gateway = self.gateway.clone();
        let date = query.date;
        let params = query.to_query();

        let value = self
            .cache
            .fetch(key, STALE_LIST, move || {
                async move {
                    let envelope: ItemsEnvelope<Value> = gateway
                        .get(&format!("/appointments/dates/{}/filters", date), &params)
                        .await?;
                    Ok(envelope.into_items().unwrap_or_else(|| Value::Array(Vec::new())))
                }
                .boxed()
            })
            .await?;
        shared_query::decode(value)
    }

    pub async fn by_id(&self, id: i64) -> Result<Appointment, ApiError> {
        if id <= 0 {
            return Err(ApiError::InvalidRequest(
                "an appointment id is required".to_string(),
            ));
        }

        let key = QueryKey::new(APPOINTMENT_SCOPE, id.to_string());
        let gateway = self.gateway.clone();

        let value = self
            .cache
            .fetch(key, STALE_NONE, move || {
                async move {
                    let envelope: ItemsEnvelope<Value> =
                        gateway.get(&format!("/appointments/{}", id), &[]).await?;
                    envelope.into_items().ok_or_else(|| {
                        ApiError::Decode("appointment response carried no items".to_string())
                    })
                }
                .boxed()
            })
            .await?;
        shared_query::decode(value)
    }
}
