//! ReservationWorkflow -- drives the booking lifecycle.
//!
//! The workflow never infers a transition from data shape: it checks the
//! local precondition, issues the explicit operation, and adopts
//! whatever state the server returns. An illegal transition is refused
//! locally as a conflict without a round trip; a server refusal is
//! surfaced the same way and never retried automatically.

use tracing::{info, warn};

use turista_types::error::ClientError;
use turista_types::reservation::{
    CartReservation, CreateCartReservationRequest, CreatePlanReservationRequest, EstadoReserva,
    PlanReservation, Reservation,
};

use crate::cart::{CartApi, CartStore};

use super::api::ReservationApi;

/// Converts carts and plans into reservations and drives
/// confirm / cancel / complete over either shape.
pub struct ReservationWorkflow<A: ReservationApi> {
    api: A,
}

impl<A: ReservationApi> ReservationWorkflow<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Create a reservation from the current cart. The server allocates
    /// it in `PENDIENTE` and empties the cart; callers holding a
    /// [`CartStore`] should use [`checkout_cart`] so the local mirror
    /// follows.
    pub async fn create_from_cart(
        &self,
        request: &CreateCartReservationRequest,
    ) -> Result<CartReservation, ClientError> {
        let reservation = self.api.create_from_cart(request).await?;
        checked(reservation, |r| r.codigo_reserva.as_str(), CartReservation::check_integrity)
    }

    /// Create a reservation for a plan.
    pub async fn create_from_plan(
        &self,
        request: &CreatePlanReservationRequest,
    ) -> Result<PlanReservation, ClientError> {
        let reservation = self.api.create_from_plan(request).await?;
        checked(reservation, |r| r.codigo_reserva.as_str(), PlanReservation::check_integrity)
    }

    /// All of the caller's reservations, both shapes merged, most recent
    /// first.
    pub async fn my_reservations(&self) -> Result<Vec<Reservation>, ClientError> {
        let carts = self.api.list_cart_reservations().await?;
        let plans = self.api.list_plan_reservations().await?;

        let mut merged: Vec<Reservation> = carts
            .into_iter()
            .map(Reservation::Cart)
            .chain(plans.into_iter().map(Reservation::Plan))
            .collect();
        for reservation in &merged {
            reservation.check_integrity()?;
        }
        merged.sort_by(|a, b| b.fecha_reserva().cmp(&a.fecha_reserva()));
        Ok(merged)
    }

    /// Both shapes filtered by state, server-side.
    pub async fn reservations_by_state(
        &self,
        estado: EstadoReserva,
    ) -> Result<Vec<Reservation>, ClientError> {
        let carts = self.api.cart_reservations_by_state(estado).await?;
        let plans = self.api.plan_reservations_by_state(estado).await?;
        let mut merged: Vec<Reservation> = carts
            .into_iter()
            .map(Reservation::Cart)
            .chain(plans.into_iter().map(Reservation::Plan))
            .collect();
        merged.sort_by(|a, b| b.fecha_reserva().cmp(&a.fecha_reserva()));
        Ok(merged)
    }

    /// Detail fetch for a cart-derived reservation.
    pub async fn cart_reservation(&self, id: i64) -> Result<CartReservation, ClientError> {
        let reservation = self.api.get_cart_reservation(id).await?;
        checked(reservation, |r| r.codigo_reserva.as_str(), CartReservation::check_integrity)
    }

    /// Detail fetch for a plan-derived reservation.
    pub async fn plan_reservation(&self, id: i64) -> Result<PlanReservation, ClientError> {
        let reservation = self.api.get_plan_reservation(id).await?;
        checked(reservation, |r| r.codigo_reserva.as_str(), PlanReservation::check_integrity)
    }

    /// Reservations placed against the calling merchant's services.
    pub async fn merchant_reservations(&self) -> Result<Vec<CartReservation>, ClientError> {
        let reservations = self.api.merchant_reservations().await?;
        for reservation in &reservations {
            reservation.check_integrity()?;
        }
        Ok(reservations)
    }

    /// Request `PENDIENTE -> CONFIRMADA`.
    pub async fn confirm(&self, reservation: &Reservation) -> Result<Reservation, ClientError> {
        let estado = reservation.estado();
        if !estado.can_confirm() {
            return Err(ClientError::Conflict(format!(
                "cannot confirm reservation {} in state {estado}",
                reservation.codigo_reserva()
            )));
        }
        let updated = match reservation {
            Reservation::Cart(r) => {
                Reservation::Cart(self.api.confirm_cart_reservation(r.id).await?)
            }
            Reservation::Plan(r) => {
                Reservation::Plan(self.api.confirm_plan_reservation(r.id).await?)
            }
        };
        self.adopt("confirm", updated)
    }

    /// Request `-> CANCELADA`, recording the (required) reason.
    pub async fn cancel(
        &self,
        reservation: &Reservation,
        motivo: &str,
    ) -> Result<Reservation, ClientError> {
        let motivo = motivo.trim();
        if motivo.is_empty() {
            return Err(ClientError::Validation(
                "cancellation reason must not be blank".to_string(),
            ));
        }
        let estado = reservation.estado();
        if !estado.can_cancel() {
            return Err(ClientError::Conflict(format!(
                "cannot cancel reservation {} in state {estado}",
                reservation.codigo_reserva()
            )));
        }
        let updated = match reservation {
            Reservation::Cart(r) => {
                Reservation::Cart(self.api.cancel_cart_reservation(r.id, motivo).await?)
            }
            Reservation::Plan(r) => {
                Reservation::Plan(self.api.cancel_plan_reservation(r.id, motivo).await?)
            }
        };
        self.adopt("cancel", updated)
    }

    /// Request `CONFIRMADA -> COMPLETADA`.
    pub async fn complete(&self, reservation: &Reservation) -> Result<Reservation, ClientError> {
        let estado = reservation.estado();
        if !estado.can_complete() {
            return Err(ClientError::Conflict(format!(
                "cannot complete reservation {} in state {estado}",
                reservation.codigo_reserva()
            )));
        }
        let updated = match reservation {
            Reservation::Cart(r) => {
                Reservation::Cart(self.api.complete_cart_reservation(r.id).await?)
            }
            Reservation::Plan(r) => {
                Reservation::Plan(self.api.complete_plan_reservation(r.id).await?)
            }
        };
        self.adopt("complete", updated)
    }

    fn adopt(&self, operation: &str, updated: Reservation) -> Result<Reservation, ClientError> {
        updated.check_integrity().map_err(|violation| {
            warn!(code = updated.codigo_reserva(), %violation, "rejecting reservation snapshot");
            violation
        })?;
        info!(
            code = updated.codigo_reserva(),
            estado = %updated.estado(),
            operation,
            "reservation transition applied"
        );
        Ok(updated)
    }
}

fn checked<T>(
    reservation: T,
    code: impl Fn(&T) -> &str,
    check: impl Fn(&T) -> Result<(), turista_types::error::ContractViolation>,
) -> Result<T, ClientError> {
    if let Err(violation) = check(&reservation) {
        warn!(code = code(&reservation), %violation, "rejecting reservation snapshot");
        return Err(violation.into());
    }
    Ok(reservation)
}

/// Create a reservation from the cart and clear the local cart mirror,
/// matching the server-side wipe that happens on success.
pub async fn checkout_cart<R: ReservationApi, C: CartApi>(
    workflow: &ReservationWorkflow<R>,
    cart: &CartStore<C>,
    request: &CreateCartReservationRequest,
) -> Result<CartReservation, ClientError> {
    let reservation = workflow.create_from_cart(request).await?;
    cart.apply_cleared();
    Ok(reservation)
}
