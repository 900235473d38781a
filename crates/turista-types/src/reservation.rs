//! Reservation types and the shared booking state machine.
//!
//! Two reservation shapes exist -- cart-derived and plan-derived -- and
//! both move through the same lifecycle: `PENDIENTE -> CONFIRMADA ->
//! COMPLETADA`, with `CANCELADA` reachable from the first two. The
//! server assigns the initial state and owns every transition; the
//! client only requests them. [`Reservation`] is the sum type over both
//! shapes, exposing the common surface the state machine needs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use std::fmt;

use crate::cart::{Municipality, ServiceSnapshot};
use crate::error::ContractViolation;
use crate::money_eq;

/// Lifecycle state of a reservation.
///
/// The wire spells confirmed and completed in masculine form
/// (`CONFIRMADO`, `COMPLETADO`) while cancelled arrives feminine
/// (`CANCELADA`). The mapping below mirrors the service exactly and is
/// deliberate; parsing accepts both genders where the service has been
/// observed to emit either. Unknown values fall back to `Pendiente`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EstadoReserva {
    #[serde(rename = "PENDIENTE")]
    Pendiente,
    #[serde(rename = "CONFIRMADO")]
    Confirmada,
    #[serde(rename = "COMPLETADO")]
    Completada,
    #[serde(rename = "CANCELADA")]
    Cancelada,
}

impl EstadoReserva {
    /// Parse a wire value, falling back to `Pendiente` on unknown input.
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "PENDIENTE" => EstadoReserva::Pendiente,
            "CONFIRMADO" | "CONFIRMADA" => EstadoReserva::Confirmada,
            "COMPLETADO" | "COMPLETADA" => EstadoReserva::Completada,
            "CANCELADO" | "CANCELADA" => EstadoReserva::Cancelada,
            _ => EstadoReserva::Pendiente,
        }
    }

    /// Terminal states admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, EstadoReserva::Completada | EstadoReserva::Cancelada)
    }

    /// `confirm` is legal only from `Pendiente`.
    pub fn can_confirm(self) -> bool {
        self == EstadoReserva::Pendiente
    }

    /// `cancel` is legal from `Pendiente` or `Confirmada`.
    pub fn can_cancel(self) -> bool {
        matches!(self, EstadoReserva::Pendiente | EstadoReserva::Confirmada)
    }

    /// `complete` is legal only from `Confirmada`.
    pub fn can_complete(self) -> bool {
        self == EstadoReserva::Confirmada
    }
}

impl Default for EstadoReserva {
    fn default() -> Self {
        EstadoReserva::Pendiente
    }
}

impl fmt::Display for EstadoReserva {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EstadoReserva::Pendiente => "PENDIENTE",
            EstadoReserva::Confirmada => "CONFIRMADO",
            EstadoReserva::Completada => "COMPLETADO",
            EstadoReserva::Cancelada => "CANCELADA",
        };
        write!(f, "{s}")
    }
}

impl<'de> Deserialize<'de> for EstadoReserva {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(EstadoReserva::from_wire(&raw))
    }
}

/// Payment method chosen at checkout. Unknown wire values fall back to
/// `Efectivo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MetodoPago {
    #[serde(rename = "EFECTIVO")]
    Efectivo,
    #[serde(rename = "TARJETA")]
    Tarjeta,
    #[serde(rename = "TRANSFERENCIA")]
    Transferencia,
    #[serde(rename = "YAPE")]
    Yape,
    #[serde(rename = "PLIN")]
    Plin,
}

impl MetodoPago {
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "EFECTIVO" => MetodoPago::Efectivo,
            "TARJETA" => MetodoPago::Tarjeta,
            "TRANSFERENCIA" => MetodoPago::Transferencia,
            "YAPE" => MetodoPago::Yape,
            "PLIN" => MetodoPago::Plin,
            _ => MetodoPago::Efectivo,
        }
    }
}

impl Default for MetodoPago {
    fn default() -> Self {
        MetodoPago::Efectivo
    }
}

impl fmt::Display for MetodoPago {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MetodoPago::Efectivo => "EFECTIVO",
            MetodoPago::Tarjeta => "TARJETA",
            MetodoPago::Transferencia => "TRANSFERENCIA",
            MetodoPago::Yape => "YAPE",
            MetodoPago::Plin => "PLIN",
        };
        write!(f, "{s}")
    }
}

impl<'de> Deserialize<'de> for MetodoPago {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(MetodoPago::from_wire(&raw))
    }
}

/// Kind of an individual payment against a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TipoPago {
    #[serde(rename = "SEÑA")]
    Sena,
    #[serde(rename = "TOTAL")]
    Total,
    #[serde(rename = "COMPLEMENTO")]
    Complemento,
}

/// Settlement state of an individual payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EstadoPago {
    Pendiente,
    Confirmado,
    Rechazado,
}

/// The reserving user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub nombre: String,
    pub apellido: String,
    pub username: String,
    pub email: String,
}

/// A payment recorded against a reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i64,
    pub codigo_pago: String,
    pub monto: f64,
    pub tipo: TipoPago,
    pub estado: EstadoPago,
    pub metodo_pago: MetodoPago,
    #[serde(default)]
    pub numero_transaccion: Option<String>,
    #[serde(default)]
    pub numero_autorizacion: Option<String>,
    #[serde(default)]
    pub observaciones: Option<String>,
    pub fecha_pago: DateTime<Utc>,
    #[serde(default)]
    pub fecha_confirmacion: Option<DateTime<Utc>>,
}

/// A reserved line item (cart-derived reservations only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationItem {
    pub id: i64,
    pub cantidad: u32,
    pub precio_unitario: f64,
    pub subtotal: f64,
    pub fecha_servicio: NaiveDate,
    #[serde(default)]
    pub notas_especiales: Option<String>,
    pub estado: EstadoReserva,
    pub servicio: ServiceSnapshot,
}

/// A committed booking derived from a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartReservation {
    pub id: i64,
    pub codigo_reserva: String,
    pub monto_total: f64,
    pub monto_descuento: f64,
    /// Must equal `monto_total - monto_descuento`; see
    /// [`CartReservation::check_integrity`].
    pub monto_final: f64,
    pub estado: EstadoReserva,
    pub metodo_pago: MetodoPago,
    #[serde(default)]
    pub observaciones: Option<String>,
    #[serde(default)]
    pub contacto_emergencia: Option<String>,
    #[serde(default)]
    pub telefono_emergencia: Option<String>,
    pub fecha_reserva: DateTime<Utc>,
    #[serde(default)]
    pub fecha_confirmacion: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fecha_cancelacion: Option<DateTime<Utc>>,
    #[serde(default)]
    pub motivo_cancelacion: Option<String>,
    pub usuario: UserSummary,
    pub items: Vec<ReservationItem>,
    #[serde(default)]
    pub pagos: Vec<Payment>,
}

impl CartReservation {
    /// Verify the monetary invariant `monto_final == monto_total -
    /// monto_descuento` within tolerance.
    pub fn check_integrity(&self) -> Result<(), ContractViolation> {
        check_amounts(
            &self.codigo_reserva,
            self.monto_final,
            self.monto_total,
            self.monto_descuento,
        )
    }
}

/// Summary of a plan as embedded in a plan reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub id: i64,
    pub nombre: String,
    pub descripcion: String,
    pub duracion_dias: u32,
    #[serde(default)]
    pub imagen_principal_url: Option<String>,
    pub municipalidad: Municipality,
}

/// A committed booking of a multi-day bundled plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReservation {
    pub id: i64,
    pub codigo_reserva: String,
    pub plan_id: i64,
    pub plan_nombre: String,
    pub cantidad: u32,
    pub precio_unitario: f64,
    pub monto_total: f64,
    pub monto_descuento: f64,
    pub monto_final: f64,
    pub estado: EstadoReserva,
    pub metodo_pago: MetodoPago,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
    #[serde(default)]
    pub observaciones: Option<String>,
    #[serde(default)]
    pub contacto_emergencia: Option<String>,
    #[serde(default)]
    pub telefono_emergencia: Option<String>,
    pub fecha_reserva: DateTime<Utc>,
    #[serde(default)]
    pub fecha_confirmacion: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fecha_cancelacion: Option<DateTime<Utc>>,
    #[serde(default)]
    pub motivo_cancelacion: Option<String>,
    pub usuario: UserSummary,
    pub plan: PlanSummary,
    #[serde(default)]
    pub pagos: Vec<Payment>,
}

impl PlanReservation {
    /// Verify the monetary invariant `monto_final == monto_total -
    /// monto_descuento` within tolerance.
    pub fn check_integrity(&self) -> Result<(), ContractViolation> {
        check_amounts(
            &self.codigo_reserva,
            self.monto_final,
            self.monto_total,
            self.monto_descuento,
        )
    }
}

fn check_amounts(
    code: &str,
    monto_final: f64,
    monto_total: f64,
    monto_descuento: f64,
) -> Result<(), ContractViolation> {
    if money_eq(monto_final, monto_total - monto_descuento) {
        Ok(())
    } else {
        Err(ContractViolation::ReservationAmount {
            code: code.to_string(),
            monto_final,
            monto_total,
            monto_descuento,
        })
    }
}

/// Either reservation shape, sharing one state machine.
///
/// The two shapes differ only in their line-item and pricing
/// substructure; lifecycle code works through the accessors here and
/// never inspects the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reservation {
    Cart(CartReservation),
    Plan(PlanReservation),
}

impl Reservation {
    pub fn id(&self) -> i64 {
        match self {
            Reservation::Cart(r) => r.id,
            Reservation::Plan(r) => r.id,
        }
    }

    pub fn codigo_reserva(&self) -> &str {
        match self {
            Reservation::Cart(r) => &r.codigo_reserva,
            Reservation::Plan(r) => &r.codigo_reserva,
        }
    }

    pub fn estado(&self) -> EstadoReserva {
        match self {
            Reservation::Cart(r) => r.estado,
            Reservation::Plan(r) => r.estado,
        }
    }

    pub fn monto_final(&self) -> f64 {
        match self {
            Reservation::Cart(r) => r.monto_final,
            Reservation::Plan(r) => r.monto_final,
        }
    }

    pub fn fecha_reserva(&self) -> DateTime<Utc> {
        match self {
            Reservation::Cart(r) => r.fecha_reserva,
            Reservation::Plan(r) => r.fecha_reserva,
        }
    }

    pub fn check_integrity(&self) -> Result<(), ContractViolation> {
        match self {
            Reservation::Cart(r) => r.check_integrity(),
            Reservation::Plan(r) => r.check_integrity(),
        }
    }
}

/// Request body for `POST reservas-carrito/crear`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCartReservationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observaciones: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacto_emergencia: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefono_emergencia: Option<String>,
    #[serde(default)]
    pub metodo_pago: MetodoPago,
}

/// Request body for `POST reservas-planes/crear`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanReservationRequest {
    pub plan_id: i64,
    pub cantidad: u32,
    pub fecha_inicio: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observaciones: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacto_emergencia: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefono_emergencia: Option<String>,
    #[serde(default)]
    pub metodo_pago: MetodoPago,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estado_reserva_wire_mapping() {
        // The gender-normalizing table, kept exactly as observed.
        assert_eq!(EstadoReserva::from_wire("PENDIENTE"), EstadoReserva::Pendiente);
        assert_eq!(EstadoReserva::from_wire("CONFIRMADO"), EstadoReserva::Confirmada);
        assert_eq!(EstadoReserva::from_wire("COMPLETADO"), EstadoReserva::Completada);
        assert_eq!(EstadoReserva::from_wire("CANCELADA"), EstadoReserva::Cancelada);
        assert_eq!(EstadoReserva::from_wire("CANCELADO"), EstadoReserva::Cancelada);
        // Unknown values fall back to the initial state.
        assert_eq!(EstadoReserva::from_wire("EN_PROCESO"), EstadoReserva::Pendiente);
    }

    #[test]
    fn test_estado_reserva_serializes_masculine() {
        assert_eq!(
            serde_json::to_string(&EstadoReserva::Confirmada).unwrap(),
            "\"CONFIRMADO\""
        );
        assert_eq!(
            serde_json::to_string(&EstadoReserva::Completada).unwrap(),
            "\"COMPLETADO\""
        );
        assert_eq!(
            serde_json::to_string(&EstadoReserva::Cancelada).unwrap(),
            "\"CANCELADA\""
        );
    }

    #[test]
    fn test_estado_reserva_transitions() {
        use EstadoReserva::*;

        assert!(Pendiente.can_confirm());
        assert!(Pendiente.can_cancel());
        assert!(!Pendiente.can_complete());

        assert!(!Confirmada.can_confirm());
        assert!(Confirmada.can_cancel());
        assert!(Confirmada.can_complete());

        for terminal in [Completada, Cancelada] {
            assert!(terminal.is_terminal());
            assert!(!terminal.can_confirm());
            assert!(!terminal.can_cancel());
            assert!(!terminal.can_complete());
        }
    }

    #[test]
    fn test_metodo_pago_fallback() {
        assert_eq!(MetodoPago::from_wire("YAPE"), MetodoPago::Yape);
        assert_eq!(MetodoPago::from_wire("BITCOIN"), MetodoPago::Efectivo);
        let parsed: MetodoPago = serde_json::from_str("\"CRIPTO\"").unwrap();
        assert_eq!(parsed, MetodoPago::Efectivo);
    }

    #[test]
    fn test_tipo_pago_wire_names() {
        assert_eq!(serde_json::to_string(&TipoPago::Sena).unwrap(), "\"SEÑA\"");
        let parsed: TipoPago = serde_json::from_str("\"COMPLEMENTO\"").unwrap();
        assert_eq!(parsed, TipoPago::Complemento);
    }

    fn reservation_json(monto_final: f64) -> String {
        format!(
            r#"{{
                "id": 10,
                "codigoReserva": "RES-0010",
                "montoTotal": 130.0,
                "montoDescuento": 10.0,
                "montoFinal": {monto_final},
                "estado": "PENDIENTE",
                "metodoPago": "EFECTIVO",
                "fechaReserva": "2026-08-20T15:00:00Z",
                "usuario": {{
                    "id": 42,
                    "nombre": "Rosa",
                    "apellido": "Mamani",
                    "username": "rmamani",
                    "email": "rosa@example.com"
                }},
                "items": [],
                "pagos": []
            }}"#
        )
    }

    #[test]
    fn test_cart_reservation_decode_and_integrity() {
        let reservation: CartReservation =
            serde_json::from_str(&reservation_json(120.0)).unwrap();
        assert_eq!(reservation.estado, EstadoReserva::Pendiente);
        assert_eq!(reservation.codigo_reserva, "RES-0010");
        reservation.check_integrity().unwrap();
    }

    #[test]
    fn test_cart_reservation_amount_violation() {
        let reservation: CartReservation =
            serde_json::from_str(&reservation_json(125.0)).unwrap();
        assert!(matches!(
            reservation.check_integrity(),
            Err(ContractViolation::ReservationAmount { .. })
        ));
    }

    #[test]
    fn test_reservation_sum_type_accessors() {
        let cart: CartReservation = serde_json::from_str(&reservation_json(120.0)).unwrap();
        let reservation = Reservation::Cart(cart);
        assert_eq!(reservation.id(), 10);
        assert_eq!(reservation.codigo_reserva(), "RES-0010");
        assert_eq!(reservation.estado(), EstadoReserva::Pendiente);
        assert!(money_eq(reservation.monto_final(), 120.0));
        reservation.check_integrity().unwrap();
    }

    #[test]
    fn test_create_request_defaults_to_cash() {
        let request = CreateCartReservationRequest::default();
        assert_eq!(request.metodo_pago, MetodoPago::Efectivo);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["metodoPago"], "EFECTIVO");
        assert!(value.get("observaciones").is_none());
    }
}
