//! HTTP implementations of the API traits from `turista-core`.
//!
//! [`TuristaClient`] speaks the marketplace REST surface with reqwest
//! and maps failures onto the `ClientError` taxonomy: connectivity and
//! timeouts become `Transport`, HTTP 409 becomes `Conflict`, any other
//! non-success status becomes `Protocol`, and a 2xx body that does not
//! decode becomes a `Contract` violation.

mod cart;
mod chat;
mod http;
mod reservation;

pub use http::TuristaClient;
