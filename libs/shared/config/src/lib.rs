use std::env;
use std::time::Duration;
use tracing::warn;

/// Default request timeout in seconds. Every call into the backend fails
/// with a transport error once this window elapses.
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Default page size of the schedule board appointment listing.
const DEFAULT_PAGE_SIZE: u32 = 37;

/// Default result cap for the assignment dialog's patient search.
const DEFAULT_PATIENT_SEARCH_LIMIT: u32 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub schedule_page_size: u32,
    pub patient_search_limit: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            api_base_url: env::var("CONFIRMAMED_API_URL").unwrap_or_else(|_| {
                warn!("CONFIRMAMED_API_URL not set, using empty value");
                String::new()
            }),
            request_timeout_secs: read_numeric("CONFIRMAMED_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
            schedule_page_size: read_numeric("CONFIRMAMED_PAGE_SIZE", DEFAULT_PAGE_SIZE),
            patient_search_limit: read_numeric(
                "CONFIRMAMED_PATIENT_SEARCH_LIMIT",
                DEFAULT_PATIENT_SEARCH_LIMIT,
            ),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    /// Build a config pointing at an explicit backend URL with the stock
    /// defaults for everything else.
    pub fn with_base_url(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            schedule_page_size: DEFAULT_PAGE_SIZE,
            patient_search_limit: DEFAULT_PATIENT_SEARCH_LIMIT,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.is_empty()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn read_numeric<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} is not a valid number ({}), using {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
