use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_config::AppConfig;
use shared_models::error::ApiError;
use shared_models::envelope::ErrorBody;
use tracing::{debug, error, warn};

/// Callback fired whenever the backend answers 401, before the error is
/// returned to the caller. The session layer registers one to drop its
/// cached identity.
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

const GENERIC_REJECTION: &str = "The request was rejected by the backend";

/// Single egress point for the ConfirmaMed REST backend.
///
/// Every cell talks to the backend through this client. It owns the cookie
/// jar (the session credential never surfaces as a value), the request
/// timeout, and the mapping from HTTP status codes to [`ApiError`].
pub struct ApiGateway {
    client: Client,
    base_url: String,
    unauthorized_hook: RwLock<Option<UnauthorizedHook>>,
}

impl ApiGateway {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            unauthorized_hook: RwLock::new(None),
        })
    }

    /// Registers the callback fired on every 401 response. Only one hook is
    /// held; a second registration replaces the first.
    pub fn set_unauthorized_hook(&self, hook: UnauthorizedHook) {
        match self.unauthorized_hook.write() {
            Ok(mut slot) => *slot = Some(hook),
            Err(poisoned) => *poisoned.into_inner() = Some(hook),
        }
    }

    pub async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        self.send(Method::GET, path, query, None::<&()>).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, &[], Some(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::PUT, path, &[], Some(body)).await
    }

    /// POST where only the status matters; the response body is discarded.
    pub async fn post_unit<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.send_unit(Method::POST, path, body).await
    }

    /// PUT counterpart of [`post_unit`](Self::post_unit).
    pub async fn put_unit<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.send_unit(Method::PUT, path, body).await
    }

    async fn send_unit<B>(&self, method: Method, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let response = self
            .client
            .request(method, &url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.status_error(status, &body));
        }
        Ok(())
    }

    async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self.client.request(method, &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(self.status_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            error!("undecodable body from {}: {}", url, e);
            ApiError::Decode(format!("unexpected response shape: {}", e))
        })
    }

    /// Maps a non-2xx response to the error taxonomy. The backend reports
    /// business rejections as `{"Message": "..."}`; that text is surfaced
    /// verbatim so the operator sees exactly what the backend said.
    fn status_error(&self, status: StatusCode, body: &str) -> ApiError {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message);

        match status {
            StatusCode::UNAUTHORIZED => {
                warn!("backend rejected the session credential");
                self.fire_unauthorized();
                ApiError::Unauthorized(
                    message.unwrap_or_else(|| "session rejected by the backend".to_string()),
                )
            }
            StatusCode::FORBIDDEN => ApiError::Forbidden(
                message.unwrap_or_else(|| "operation not allowed for this account".to_string()),
            ),
            StatusCode::NOT_FOUND => {
                ApiError::NotFound(message.unwrap_or_else(|| "resource not found".to_string()))
            }
            s if s.is_client_error() => {
                ApiError::Rejected(message.unwrap_or_else(|| GENERIC_REJECTION.to_string()))
            }
            s => {
                error!("backend fault {}: {}", s, body);
                ApiError::Server(message.unwrap_or_else(|| format!("backend error ({})", s)))
            }
        }
    }

    fn fire_unauthorized(&self) {
        let hook = match self.unauthorized_hook.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        if let Some(hook) = hook {
            hook();
        }
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(err.to_string())
    }
}
