//! Reservation lifecycle: API trait and workflow.

pub mod api;
pub mod workflow;

pub use api::ReservationApi;
pub use workflow::{ReservationWorkflow, checkout_cart};
