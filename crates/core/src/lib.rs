//! Domain building blocks for the geozone presence service.
//!
//! Everything here is synchronous and storage-agnostic: credential checks,
//! webhook parsing, identifier naming and timestamp formatting.

pub mod auth;
pub mod error;
pub mod event;
pub mod naming;
pub mod parse;
pub mod timestamp;
pub mod types;
