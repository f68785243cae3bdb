//! Business-logic services.
//!
//! Services compose repositories and external clients; route handlers stay
//! thin. Single-query operations go straight from handler to repository,
//! multi-step flows (registration, login, order placement) live here.

pub mod auth;
pub mod orders;
pub mod payments;

pub use auth::{AuthError, AuthService, Claims};
pub use orders::{OrderService, OrderTotals};
pub use payments::{PaymentClient, PaymentError, PaymentIntent};
