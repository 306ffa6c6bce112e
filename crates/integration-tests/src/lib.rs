//! Integration tests for BuzzVar.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database
//! task db:start
//!
//! # Run the dashboard
//! cargo run -p buzzvar-dashboard
//!
//! # Run integration tests
//! cargo test -p buzzvar-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `dashboard_auth` - Session lifecycle against the auth routes
//! - `owner_venues` - Owner-area venue and promotion flows
//! - `super_admin` - Super-admin user and overview flows
//!
//! All tests hit a running dashboard over HTTP with a cookie-holding
//! client; they are ignored by default so the unit suite stays hermetic.
