//! Domain types shared across all storefront services.
//!
//! Pure types with no framework dependencies.

pub mod email;
pub mod order;
pub mod role;
