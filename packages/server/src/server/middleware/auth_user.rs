use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::debug;

use crate::server::error::ApiError;

/// Header the gateway sets after authenticating the caller
pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated user, taken from the gateway's `x-user-id` header
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ApiError::Unauthorized)?;

        debug!("Authenticated user: {}", user_id);
        Ok(AuthUser {
            user_id: user_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn extract(request: axum::http::Request<()>) -> Result<AuthUser, ApiError> {
        let (mut parts, _) = request.into_parts();
        AuthUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_reads_user_header() {
        let request = axum::http::Request::builder()
            .header(USER_ID_HEADER, " user-42 ")
            .body(())
            .unwrap();

        let user = extract(request).await.unwrap();
        assert_eq!(user.user_id, "user-42");
    }

    #[tokio::test]
    async fn test_missing_or_blank_header_is_rejected() {
        let missing = axum::http::Request::builder().body(()).unwrap();
        assert!(matches!(extract(missing).await, Err(ApiError::Unauthorized)));

        let blank = axum::http::Request::builder()
            .header(USER_ID_HEADER, "   ")
            .body(())
            .unwrap();
        assert!(matches!(extract(blank).await, Err(ApiError::Unauthorized)));
    }
}
