//! Identity types shared between the gateway and storefront services.

pub mod identity;

pub use identity::{AdminIdentity, IdentityHeaders, USER_ID_HEADER, USER_ROLE_HEADER};
