//! ReservationApi trait definition.
//!
//! Covers both reservation shapes: cart-derived (`reservas-carrito`) and
//! plan-derived (`reservas-planes`), which mirror each other endpoint
//! for endpoint. Uses native async fn in traits (RPITIT, Rust 2024
//! edition); the HTTP implementation lives in `turista-client`.

use turista_types::error::ClientError;
use turista_types::reservation::{
    CartReservation, CreateCartReservationRequest, CreatePlanReservationRequest, EstadoReserva,
    PlanReservation,
};

/// Remote reservation endpoints.
///
/// Transitions (`confirm`, `cancel`, `complete`) return the full updated
/// reservation; the server assigns every state, the client only requests
/// changes.
pub trait ReservationApi: Send + Sync {
    // --- Cart-derived reservations ---

    /// Convert the caller's current cart into a reservation. The server
    /// empties the cart as a side effect.
    fn create_from_cart(
        &self,
        request: &CreateCartReservationRequest,
    ) -> impl std::future::Future<Output = Result<CartReservation, ClientError>> + Send;

    fn list_cart_reservations(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<CartReservation>, ClientError>> + Send;

    fn get_cart_reservation(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<CartReservation, ClientError>> + Send;

    fn confirm_cart_reservation(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<CartReservation, ClientError>> + Send;

    fn cancel_cart_reservation(
        &self,
        id: i64,
        motivo: &str,
    ) -> impl std::future::Future<Output = Result<CartReservation, ClientError>> + Send;

    fn complete_cart_reservation(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<CartReservation, ClientError>> + Send;

    /// Cart reservations filtered by state, server-side.
    fn cart_reservations_by_state(
        &self,
        estado: EstadoReserva,
    ) -> impl std::future::Future<Output = Result<Vec<CartReservation>, ClientError>> + Send;

    /// Reservations against the calling merchant's services.
    fn merchant_reservations(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<CartReservation>, ClientError>> + Send;

    // --- Plan-derived reservations ---

    fn create_from_plan(
        &self,
        request: &CreatePlanReservationRequest,
    ) -> impl std::future::Future<Output = Result<PlanReservation, ClientError>> + Send;

    fn list_plan_reservations(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<PlanReservation>, ClientError>> + Send;

    fn get_plan_reservation(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<PlanReservation, ClientError>> + Send;

    fn confirm_plan_reservation(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<PlanReservation, ClientError>> + Send;

    fn cancel_plan_reservation(
        &self,
        id: i64,
        motivo: &str,
    ) -> impl std::future::Future<Output = Result<PlanReservation, ClientError>> + Send;

    fn complete_plan_reservation(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<PlanReservation, ClientError>> + Send;

    fn plan_reservations_by_state(
        &self,
        estado: EstadoReserva,
    ) -> impl std::future::Future<Output = Result<Vec<PlanReservation>, ClientError>> + Send;
}
