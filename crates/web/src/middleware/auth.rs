use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::WebError;

/// Reject requests that lack a known bearer key.
pub async fn require_auth(
    State(api_keys): State<ApiKeys>,
    req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let presented = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| api_keys.is_valid(token.trim()));

    match presented {
        Some(true) => Ok(next.run(req).await),
        Some(false) => {
            tracing::warn!(path = %req.uri().path(), "Invalid API key attempt");
            Err(WebError::Unauthorized)
        }
        None => Err(WebError::Unauthorized),
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    keys: Arc<HashSet<String>>,
}

impl ApiKeys {
    pub fn from_comma_separated(keys_str: &str) -> Self {
        let keys = keys_str
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self {
            keys: Arc::new(keys),
        }
    }

    /// The application secret key also grants write access.
    pub fn with_secret_key(self, secret_key: &str) -> Self {
        let secret_key = secret_key.trim();
        if secret_key.is_empty() {
            return self;
        }

        let mut keys = (*self.keys).clone();
        keys.insert(secret_key.to_string());

        Self {
            keys: Arc::new(keys),
        }
    }

    pub fn is_valid(&self, key: &str) -> bool {
        self.keys.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_comma_separated_keys() {
        let keys = ApiKeys::from_comma_separated(" alpha, beta ,,gamma ");
        assert!(keys.is_valid("alpha"));
        assert!(keys.is_valid("beta"));
        assert!(keys.is_valid("gamma"));
        assert!(!keys.is_valid(""));
        assert!(!keys.is_valid("delta"));
    }

    #[test]
    fn test_secret_key_is_accepted() {
        let keys = ApiKeys::from_comma_separated("").with_secret_key("s3cret");
        assert!(keys.is_valid("s3cret"));

        let unchanged = ApiKeys::from_comma_separated("alpha").with_secret_key("  ");
        assert!(unchanged.is_valid("alpha"));
        assert!(!unchanged.is_valid(""));
    }
}
