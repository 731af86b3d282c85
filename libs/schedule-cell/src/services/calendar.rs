use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;

use shared_gateway::ApiGateway;
use shared_models::envelope::ItemsEnvelope;
use shared_models::error::ApiError;
use shared_query::{QueryCache, QueryKey, STALE_LIST};

use crate::models::{DayOccupancy, MonthGrid};
use crate::services::DAY_OCCUPANCY_SCOPE;

/// Month view of the board calendar: one occupancy row per day that carries
/// any schedule at all.
pub struct CalendarService {
    gateway: Arc<ApiGateway>,
    cache: Arc<QueryCache>,
}

impl CalendarService {
    pub fn new(gateway: Arc<ApiGateway>, cache: Arc<QueryCache>) -> Self {
        Self { gateway, cache }
    }

    pub async fn month_occupancy(&self, grid: MonthGrid) -> Result<Vec<DayOccupancy>, ApiError> {
        let key = QueryKey::new(
            DAY_OCCUPANCY_SCOPE,
            format!("{}-{:02}", grid.year, grid.month),
        );
        let gateway = self.gateway.clone();

        let value = self
            .cache
            .fetch(key, STALE_LIST, move || {
                async move {
                    let envelope: ItemsEnvelope<Value> = gateway
                        .get(
                            &format!(
                                "/appointments/occupation/month/{}/{}",
                                grid.year, grid.month
                            ),
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
}
