use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use shared_gateway::ApiGateway;
use shared_models::envelope::ItemsEnvelope;
use shared_models::error::ApiError;

use crate::models::{Credentials, SessionUser, VerifyResponse};
use crate::state::SessionState;

pub struct SessionService {
    gateway: Arc<ApiGateway>,
    state: Arc<SessionState>,
}

impl SessionService {
    pub fn new(gateway: Arc<ApiGateway>, state: Arc<SessionState>) -> Self {
        Self { gateway, state }
    }

    /// Exchanges credentials for a session cookie. The backend sets the
    /// cookie on this response; the body only carries the operator identity.
    pub async fn login(&self, credentials: &Credentials) -> Result<SessionUser, ApiError> {
        let envelope: ItemsEnvelope<SessionUser> =
            self.gateway.post("/auth/login", credentials).await.map_err(|err| {
                self.state.clear();
                err
            })?;

        let user = envelope
            .into_items()
            .ok_or_else(|| ApiError::Decode("login response carried no user".to_string()))?;

        info!(operator = %user.full_name, "session established");
        self.state.establish(user.clone());
        Ok(user)
    }

    /// Asks the backend whether the cookie is still good. Any failure, wire
    /// or otherwise, resolves to an anonymous session rather than an error;
    /// guarded screens only need a yes or no.
    pub async fn probe(&self) -> bool {
        let verified = match self.gateway.get::<VerifyResponse>("/auth/verify", &[]).await {
            Ok(response) => response.success,
            Err(err) => {
                debug!("session probe failed: {}", err);
                false
            }
        };
        if !verified {
            self.state.clear();
        }
        verified
    }

    /// Ends the session. Local state is dropped first so the operator is
    /// signed out even when the backend cannot be reached; the return value
    /// only reports whether the backend acknowledged it.
    pub async fn logout(&self) -> bool {
        self.state.clear();
        match self.gateway.post_unit("/auth/logout", &json!({})).await {
            Ok(()) => true,
            Err(err) => {
                warn!("backend logout failed: {}", err);
                false
            }
        }
    }
}
