//! ReservationApi over HTTP.
//!
//! Cart-derived and plan-derived reservations live under mirrored path
//! prefixes with identical sub-routes; only the decoded shape differs.

use reqwest::Method;

use turista_core::reservation::ReservationApi;
use turista_types::error::ClientError;
use turista_types::reservation::{
    CartReservation, CreateCartReservationRequest, CreatePlanReservationRequest, EstadoReserva,
    PlanReservation,
};

use crate::http::TuristaClient;

const CART_BASE: &str = "reservas-carrito";
const PLAN_BASE: &str = "reservas-planes";

impl ReservationApi for TuristaClient {
    async fn create_from_cart(
        &self,
        request: &CreateCartReservationRequest,
    ) -> Result<CartReservation, ClientError> {
        self.execute(
            self.request(Method::POST, &format!("{CART_BASE}/crear"))
                .json(request),
        )
        .await
    }

    async fn list_cart_reservations(&self) -> Result<Vec<CartReservation>, ClientError> {
        self.get_json(&format!("{CART_BASE}/mis-reservas")).await
    }

    async fn get_cart_reservation(&self, id: i64) -> Result<CartReservation, ClientError> {
        self.get_json(&format!("{CART_BASE}/{id}")).await
    }

    async fn confirm_cart_reservation(&self, id: i64) -> Result<CartReservation, ClientError> {
        self.execute(self.request(Method::PATCH, &format!("{CART_BASE}/{id}/confirmar")))
            .await
    }

    async fn cancel_cart_reservation(
        &self,
        id: i64,
        motivo: &str,
    ) -> Result<CartReservation, ClientError> {
        self.execute(
            self.request(Method::PATCH, &format!("{CART_BASE}/{id}/cancelar"))
                .query(&[("motivo", motivo)]),
        )
        .await
    }

    async fn complete_cart_reservation(&self, id: i64) -> Result<CartReservation, ClientError> {
        self.execute(self.request(Method::PATCH, &format!("{CART_BASE}/{id}/completar")))
            .await
    }

    async fn cart_reservations_by_state(
        &self,
        estado: EstadoReserva,
    ) -> Result<Vec<CartReservation>, ClientError> {
        self.get_json(&format!("{CART_BASE}/estado/{estado}")).await
    }

    async fn merchant_reservations(&self) -> Result<Vec<CartReservation>, ClientError> {
        self.get_json(&format!("{CART_BASE}/emprendedor/reservas"))
            .await
    }

    async fn create_from_plan(
        &self,
        request: &CreatePlanReservationRequest,
    ) -> Result<PlanReservation, ClientError> {
        self.execute(
            self.request(Method::POST, &format!("{PLAN_BASE}/crear"))
                .json(request),
        )
        .await
    }

    async fn list_plan_reservations(&self) -> Result<Vec<PlanReservation>, ClientError> {
        self.get_json(&format!("{PLAN_BASE}/mis-reservas")).await
    }

    async fn get_plan_reservation(&self, id: i64) -> Result<PlanReservation, ClientError> {
        self.get_json(&format!("{PLAN_BASE}/{id}")).await
    }

    async fn confirm_plan_reservation(&self, id: i64) -> Result<PlanReservation, ClientError> {
        self.execute(self.request(Method::PATCH, &format!("{PLAN_BASE}/{id}/confirmar")))
            .await
    }

    async fn cancel_plan_reservation(
        &self,
        id: i64,
        motivo: &str,
    ) -> Result<PlanReservation, ClientError> {
        self.execute(
            self.request(Method::PATCH, &format!("{PLAN_BASE}/{id}/cancelar"))
                .query(&[("motivo", motivo)]),
        )
        .await
    }

    async fn complete_plan_reservation(&self, id: i64) -> Result<PlanReservation, ClientError> {
        self.execute(self.request(Method::PATCH, &format!("{PLAN_BASE}/{id}/completar")))
            .await
    }

    async fn plan_reservations_by_state(
        &self,
        estado: EstadoReserva,
    ) -> Result<Vec<PlanReservation>, ClientError> {
        self.get_json(&format!("{PLAN_BASE}/estado/{estado}")).await
    }
}
