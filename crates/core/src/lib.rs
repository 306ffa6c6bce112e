//! BuzzVar Core - Shared types library.
//!
//! This crate provides common types used across all BuzzVar dashboard
//! components:
//! - `dashboard` - Role-scoped administrative panel
//! - `integration-tests` - End-to-end HTTP tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and emails, plus the
//!   role and permission model

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
