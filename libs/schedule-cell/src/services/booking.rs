use std::sync::Arc;

use tracing::{debug, info};

use shared_gateway::ApiGateway;
use shared_models::error::ApiError;
use shared_query::{QueryCache, QueryKey};

use crate::models::{AppointmentBatchRequest, AssignmentRequest};
use crate::services::{APPOINTMENTS_SCOPE, APPOINTMENT_SCOPE, DAY_OCCUPANCY_SCOPE};

/// Write side of the schedule board: batch slot creation and patient
/// assignment.
pub struct BookingService {
    gateway: Arc<ApiGateway>,
    cache: Arc<QueryCache>,
}

impl BookingService {
    pub fn new(gateway: Arc<ApiGateway>, cache: Arc<QueryCache>) -> Self {
        Self { gateway, cache }
    }

    /// Creates one appointment per date in the request, then drops the
    /// agenda and month-view caches so the new slots show up on the next
    /// read.
    pub async fn create_batch(&self, request: &AppointmentBatchRequest) -> Result<(), ApiError> {
        self.gateway.post_unit("/appointments", request).await?;
        debug!(dates = request.dates.len(), "appointment batch created");
        self.cache.invalidate_scope(APPOINTMENTS_SCOPE);
        self.cache.invalidate_scope(DAY_OCCUPANCY_SCOPE);
        Ok(())
    }

    /// Books a patient into a slot, then drops every cache the slot feeds:
    /// the day's agenda pages, the slot itself, and the month occupancy view.
    pub async fn assign(&self, request: &AssignmentRequest) -> Result<(), ApiError> {
        self.gateway.post_unit("/appointments/assign", request).await?;
        info!(
            appointment = request.appointment_id,
            patient = request.patient_id,
            "appointment assigned"
        );
        self.cache.invalidate_scope(APPOINTMENTS_SCOPE);
        self.cache.invalidate(&QueryKey::new(
            APPOINTMENT_SCOPE,
            request.appointment_id.to_string(),
        ));
        self.cache.invalidate_scope(DAY_OCCUPANCY_SCOPE);
        Ok(())
    }
}
