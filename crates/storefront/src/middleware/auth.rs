//! Authentication extractor for dashboard handlers.
//!
//! Authentication itself lives outside this service: the fronting identity
//! provider verifies the merchant's session and injects the verified user id
//! as the `x-auth-user` header. This extractor only checks presence and
//! shape; requests reaching the service without the header are rejected.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use ventalink_core::UserId;

use crate::error::AppError;

/// Header carrying the verified merchant identity.
pub const AUTH_USER_HEADER: &str = "x-auth-user";

/// Extractor that requires a verified merchant identity.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     AuthMerchant(user_id): AuthMerchant,
/// ) -> impl IntoResponse {
///     format!("Hello, {user_id}!")
/// }
/// ```
pub struct AuthMerchant(pub UserId);

impl<S> FromRequestParts<S> for AuthMerchant
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTH_USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing identity header".to_owned()))?;

        let user_id = header
            .parse::<Uuid>()
            .map_err(|_| AppError::Unauthorized("malformed identity header".to_owned()))?;

        Ok(Self(UserId::new(user_id)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;

    use super::*;

    async fn extract(request: Request<()>) -> Result<AuthMerchant, AppError> {
        let (mut parts, ()) = request.into_parts();
        AuthMerchant::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_valid_header_extracts_user_id() {
        let user_id = Uuid::new_v4();
        let request = Request::builder()
            .header(AUTH_USER_HEADER, user_id.to_string())
            .body(())
            .unwrap();

        let AuthMerchant(extracted) = extract(request).await.unwrap();
        assert_eq!(extracted, UserId::new(user_id));
    }

    #[tokio::test]
    async fn test_missing_header_rejected() {
        let request = Request::builder().body(()).unwrap();
        assert!(matches!(
            extract(request).await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_header_rejected() {
        let request = Request::builder()
            .header(AUTH_USER_HEADER, "not-a-uuid")
            .body(())
            .unwrap();
        assert!(matches!(
            extract(request).await,
            Err(AppError::Unauthorized(_))
        ));
    }
}
