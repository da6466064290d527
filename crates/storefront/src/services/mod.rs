//! Business services for the storefront.

pub mod auth;
pub mod notify;
pub mod orders;

pub use auth::{AuthError, AuthService};
pub use notify::{DisabledNotifier, Notifier, NotifyError, RelayNotifier};
pub use orders::OrderService;
