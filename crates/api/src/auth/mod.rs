//! Authentication primitives: JWT access tokens.

pub mod jwt;
