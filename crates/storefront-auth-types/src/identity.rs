//! Gateway-injected identity headers extractors.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use storefront_domain::role::StaffRole;

pub const USER_ID_HEADER: &str = "x-storefront-user-id";
pub const USER_ROLE_HEADER: &str = "x-storefront-user-role";

/// Staff identity injected by the gateway via `x-storefront-user-id` and
/// `x-storefront-user-role` headers.
///
/// Returns 401 if either header is absent or unparseable.
#[derive(Debug, Clone)]
pub struct IdentityHeaders {
    pub user_id: Uuid,
    pub user_role: u8,
}

impl IdentityHeaders {
    fn from_parts(parts: &Parts) -> Result<Self, StatusCode> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<Uuid>().ok())
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let user_role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u8>().ok())
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(Self { user_id, user_role })
    }

    pub fn role(&self) -> Option<StaffRole> {
        StaffRole::from_u8(self.user_role)
    }
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 declares this as `fn -> impl Future + Send`; extract
    // synchronously and hand back a 'static future.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = Self::from_parts(parts);
        async move { identity }
    }
}

/// Identity that passed the admin role check: 401 without headers, 403 for
/// any role other than `StaffRole::Admin`.
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub user_id: Uuid,
}

impl<S> FromRequestParts<S> for AdminIdentity
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let admin = IdentityHeaders::from_parts(parts).and_then(|identity| {
            match identity.role() {
                Some(role) if role.is_admin() => Ok(Self {
                    user_id: identity.user_id,
                }),
                _ => Err(StatusCode::FORBIDDEN),
            }
        });
        async move { admin }
    }
}
