use serde_json::Value;

/// Failures of a single backend call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend error: {status}")]
    Backend { status: u16, detail: Option<String> },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Builds a backend error from a non-success response body.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        ApiError::Backend {
            status,
            detail: extract_detail(body),
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Backend { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text shown to the user: the backend's `detail` when it sent one,
    /// otherwise the caller's generic message.
    pub fn user_message(&self, fallback: &str) -> String {
        match self.detail() {
            Some(detail) => detail.to_string(),
            None => fallback.to_string(),
        }
    }
}

/// Reads the `detail` field of a FastAPI-style error body. Validation
/// errors carry a list of objects with a `msg` each.
fn extract_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_detail() {
        let err = ApiError::from_response(500, br#"{"detail": "Error generating cards: boom"}"#);
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.user_message("generic"), "Error generating cards: boom");
    }

    #[test]
    fn test_validation_detail_list() {
        let body = br#"{"detail": [{"loc": ["body", "topic"], "msg": "field required"},
                                   {"loc": ["body", "count"], "msg": "value is not a valid integer"}]}"#;
        let err = ApiError::from_response(422, body);
        assert_eq!(
            err.detail(),
            Some("field required; value is not a valid integer")
        );
    }

    #[test]
    fn test_falls_back_to_generic_message() {
        let err = ApiError::from_response(502, b"<html>Bad Gateway</html>");
        assert_eq!(err.detail(), None);
        assert_eq!(err.user_message("Failed to export decks"), "Failed to export decks");

        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(err.user_message("Failed"), "Failed");
    }
}
