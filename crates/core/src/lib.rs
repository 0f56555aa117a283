//! Domain logic for the markup backend.
//!
//! Everything in this crate is pure: no database, no filesystem, no HTTP.
//! The storage and API crates build on these types and rules.

pub mod annotation;
pub mod emotion;
pub mod error;
pub mod export;
pub mod media;
pub mod stats;
pub mod traversal;
pub mod types;
