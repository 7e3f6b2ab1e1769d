//! Mock gateway identity for admin endpoint tests.
//!
//! Services behind the gateway receive `x-storefront-user-id` +
//! `x-storefront-user-role` headers. `MockAuth` builds them directly so no
//! real gateway is needed.

use axum::http::{HeaderName, HeaderValue};
use uuid::Uuid;

use storefront_auth_types::{USER_ID_HEADER, USER_ROLE_HEADER};
use storefront_domain::role::StaffRole;

pub struct MockAuth {
    pub user_id: Uuid,
    pub role: StaffRole,
}

impl MockAuth {
    pub fn admin() -> Self {
        Self {
            user_id: Uuid::new_v4(),
            role: StaffRole::Admin,
        }
    }

    pub fn customer() -> Self {
        Self {
            user_id: Uuid::new_v4(),
            role: StaffRole::Customer,
        }
    }

    /// Header pairs as the gateway would inject them.
    pub fn headers(&self) -> Vec<(HeaderName, HeaderValue)> {
        vec![
            (
                HeaderName::from_static(USER_ID_HEADER),
                HeaderValue::from_str(&self.user_id.to_string()).unwrap(),
            ),
            (
                HeaderName::from_static(USER_ROLE_HEADER),
                HeaderValue::from(u16::from(self.role.as_u8())),
            ),
        ]
    }
}
