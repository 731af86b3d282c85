use thiserror::Error;

/// Client-side error taxonomy for calls into the ConfirmaMed backend.
///
/// Cloneable on purpose: a deduplicated in-flight query fans a single
/// failure out to every caller awaiting the same key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("authorization required: {0}")]
    Unauthorized(String),

    #[error("access denied: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Backend business-rule rejection. The message is the response body's
    /// `Message` field verbatim when present.
    #[error("{0}")]
    Rejected(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response body: {0}")]
    Decode(String),

    /// Request refused locally, before any network call was issued.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Text suitable for a transient console notice. Whatever the backend
    /// said passes through verbatim; transport faults collapse into a
    /// generic line.
    pub fn notice(&self) -> String {
        match self {
            ApiError::Rejected(message)
            | ApiError::NotFound(message)
            | ApiError::InvalidRequest(message)
            | ApiError::Unauthorized(message)
            | ApiError::Forbidden(message) => message.clone(),
            ApiError::Server(_) => {
                "Error del servidor. Por favor, intente más tarde".to_string()
            }
            ApiError::Timeout | ApiError::Network(_) | ApiError::Decode(_) => {
                "Ocurrió un error inesperado".to_string()
            }
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_messages_pass_through_verbatim() {
        let err = ApiError::Rejected("La cita ya se encuentra asignada".to_string());
        assert_eq!(err.notice(), "La cita ya se encuentra asignada");
    }

    #[test]
    fn transport_faults_collapse_into_the_generic_lines() {
        assert_eq!(
            ApiError::Server("500".to_string()).notice(),
            "Error del servidor. Por favor, intente más tarde"
        );
        assert_eq!(ApiError::Timeout.notice(), "Ocurrió un error inesperado");
        assert_eq!(
            ApiError::Network("connection refused".to_string()).notice(),
            "Ocurrió un error inesperado"
        );
    }
}
