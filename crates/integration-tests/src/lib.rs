//! Integration tests for Spicejar.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the storefront
//! cargo run -p spicejar-storefront
//!
//! # Run integration tests against it
//! cargo test -p spicejar-integration-tests -- --ignored
//! ```
//!
//! The tests drive the public HTTP surface with a cookie-holding
//! reqwest client, so each test function is an independent browser
//! session. They are `#[ignore]`d by default because they need a
//! running server.
