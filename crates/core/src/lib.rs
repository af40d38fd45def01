//! Shopkeep Core - Shared types library.
//!
//! This crate provides the domain types used by the web front end.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. The hosted
//! backend is the source of truth for every persisted value; these types are
//! the client-side view of its `products` table.
//!
//! # Modules
//!
//! - [`types`] - The product row, its write payloads, and the typed id

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
