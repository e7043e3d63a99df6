//! Backend API-specific error types.

/// Errors that can occur during backend API operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// API returned a non-2xx response
    #[error("API error (status {status}): {detail}")]
    Api { status: u16, detail: String },

    /// Failed to deserialize API response
    #[error("Failed to deserialize API response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// Failed to read a file for upload
    #[error("Failed to read upload file: {0}")]
    Upload(#[from] std::io::Error),
}

impl ApiError {
    /// Message suitable for a user-facing notification. Server-provided
    /// `detail` strings are surfaced verbatim; transport and decoding
    /// failures fall back to their display form.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Api { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let error = ApiError::Api {
            status: 404,
            detail: "Campaign not found".to_string(),
        };
        let error_str = error.to_string();
        assert!(error_str.contains("404"));
        assert!(error_str.contains("Campaign not found"));
    }

    #[test]
    fn test_user_message_is_verbatim_detail() {
        let error = ApiError::Api {
            status: 500,
            detail: "User list not found".to_string(),
        };
        assert_eq!(error.user_message(), "User list not found");
    }
}
