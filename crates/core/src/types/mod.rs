//! Core types for Spicejar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod money;
pub mod username;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::Rupees;
pub use username::{Username, UsernameError};
