//! Test utilities for storefront services.
//!
//! Provides gateway identity headers and the contract fixture loader.
//! Import in `#[cfg(test)]` blocks and `tests/` only.

pub mod auth;
pub mod fixture;
