//! Shared domain types for the Turista marketplace client.
//!
//! This crate contains the immutable domain snapshots exchanged with the
//! remote service -- carts, reservations, conversations, messages -- plus
//! the wire enums and the error taxonomy used across the workspace.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod cart;
pub mod chat;
pub mod error;
pub mod reservation;

/// Tolerance for comparing server-computed monetary amounts against
/// client-side recomputation (amounts travel as IEEE doubles).
pub const MONEY_TOLERANCE: f64 = 0.005;

/// Whether two monetary amounts are equal within [`MONEY_TOLERANCE`].
pub fn money_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= MONEY_TOLERANCE
}
