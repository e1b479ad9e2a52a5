//! Authentication primitives.
//!
//! - [`jwt`] -- access-token validation (and minting for tooling/tests).

pub mod jwt;
