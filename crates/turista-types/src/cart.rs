//! Cart snapshot types.
//!
//! The remote service owns the cart: every mutation returns the full
//! recomputed cart, and the client mirrors it verbatim. Totals and
//! subtotals are server-computed; [`Cart::check_integrity`] verifies them
//! against a client-side recomputation before a snapshot is adopted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use std::fmt;

use crate::error::ContractViolation;
use crate::money_eq;

/// Category of a bookable service.
///
/// Decodes with a documented fallback: an unrecognized wire value maps to
/// `Otro` so new server-side categories never break deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TipoServicio {
    #[serde(rename = "ALOJAMIENTO")]
    Alojamiento,
    #[serde(rename = "TRANSPORTE")]
    Transporte,
    #[serde(rename = "ALIMENTACION")]
    Alimentacion,
    #[serde(rename = "GUIA_TURISTICO")]
    GuiaTuristico,
    #[serde(rename = "ACTIVIDAD_RECREATIVA")]
    ActividadRecreativa,
    #[serde(rename = "CULTURAL")]
    Cultural,
    #[serde(rename = "AVENTURA")]
    Aventura,
    #[serde(rename = "WELLNESS")]
    Wellness,
    #[serde(rename = "TOUR")]
    Tour,
    #[serde(rename = "GASTRONOMICO")]
    Gastronomico,
    #[serde(rename = "OTRO")]
    Otro,
}

impl TipoServicio {
    /// Parse a wire value, falling back to `Otro` on unknown input.
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "ALOJAMIENTO" => TipoServicio::Alojamiento,
            "TRANSPORTE" => TipoServicio::Transporte,
            "ALIMENTACION" => TipoServicio::Alimentacion,
            "GUIA_TURISTICO" => TipoServicio::GuiaTuristico,
            "ACTIVIDAD_RECREATIVA" => TipoServicio::ActividadRecreativa,
            "CULTURAL" => TipoServicio::Cultural,
            "AVENTURA" => TipoServicio::Aventura,
            "WELLNESS" => TipoServicio::Wellness,
            "TOUR" => TipoServicio::Tour,
            "GASTRONOMICO" => TipoServicio::Gastronomico,
            _ => TipoServicio::Otro,
        }
    }
}

impl Default for TipoServicio {
    fn default() -> Self {
        TipoServicio::Otro
    }
}

impl fmt::Display for TipoServicio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TipoServicio::Alojamiento => "ALOJAMIENTO",
            TipoServicio::Transporte => "TRANSPORTE",
            TipoServicio::Alimentacion => "ALIMENTACION",
            TipoServicio::GuiaTuristico => "GUIA_TURISTICO",
            TipoServicio::ActividadRecreativa => "ACTIVIDAD_RECREATIVA",
            TipoServicio::Cultural => "CULTURAL",
            TipoServicio::Aventura => "AVENTURA",
            TipoServicio::Wellness => "WELLNESS",
            TipoServicio::Tour => "TOUR",
            TipoServicio::Gastronomico => "GASTRONOMICO",
            TipoServicio::Otro => "OTRO",
        };
        write!(f, "{s}")
    }
}

impl<'de> Deserialize<'de> for TipoServicio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(TipoServicio::from_wire(&raw))
    }
}

/// Geographic location of a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLocation {
    pub latitud: Option<f64>,
    pub longitud: Option<f64>,
    #[serde(default)]
    pub direccion_completa: Option<String>,
    #[serde(default)]
    pub tiene_ubicacion_valida: bool,
}

/// Municipality a merchant is registered under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Municipality {
    pub id: i64,
    pub nombre: String,
    pub departamento: String,
    pub provincia: String,
    pub distrito: String,
}

/// The merchant owning a service or participating in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantSummary {
    pub id: i64,
    pub nombre_empresa: String,
    pub rubro: String,
    pub telefono: String,
    pub email: String,
    pub municipalidad: Municipality,
}

/// Snapshot of a service as embedded in cart and reservation line items.
///
/// This is a point-in-time copy: later edits to the service catalog do
/// not retroactively change a cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSnapshot {
    pub id: i64,
    pub nombre: String,
    pub descripcion: String,
    pub precio: f64,
    pub duracion_horas: u32,
    pub tipo: TipoServicio,
    #[serde(default)]
    pub imagen_url: Option<String>,
    pub ubicacion: ServiceLocation,
    pub emprendedor: MerchantSummary,
}

/// A single line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: i64,
    pub cantidad: u32,
    pub precio_unitario: f64,
    /// Server-computed; must equal `cantidad * precio_unitario` within
    /// [`crate::MONEY_TOLERANCE`].
    pub subtotal: f64,
    pub fecha_servicio: NaiveDate,
    #[serde(default)]
    pub notas_especiales: Option<String>,
    pub fecha_agregado: DateTime<Utc>,
    pub servicio: ServiceSnapshot,
}

impl CartItem {
    /// Client-side recomputation of the line subtotal.
    pub fn computed_subtotal(&self) -> f64 {
        f64::from(self.cantidad) * self.precio_unitario
    }
}

/// The authoritative list of not-yet-reserved service selections.
///
/// Created implicitly on first add, never deleted, only emptied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: i64,
    pub usuario_id: i64,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_actualizacion: DateTime<Utc>,
    /// Server-computed sum of line subtotals.
    pub total_carrito: f64,
    /// Server-computed sum of line quantities.
    pub total_items: u32,
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find a line item by id.
    pub fn item(&self, item_id: i64) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// Verify the server-computed totals against a client-side
    /// recomputation. Called before a snapshot is adopted by the store.
    pub fn check_integrity(&self) -> Result<(), ContractViolation> {
        for item in &self.items {
            let computed = item.computed_subtotal();
            if !money_eq(item.subtotal, computed) {
                return Err(ContractViolation::ItemSubtotal {
                    item_id: item.id,
                    reported: item.subtotal,
                    computed,
                });
            }
        }

        let computed_total: f64 = self.items.iter().map(|item| item.subtotal).sum();
        if !money_eq(self.total_carrito, computed_total) {
            return Err(ContractViolation::CartTotal {
                reported: self.total_carrito,
                computed: computed_total,
            });
        }

        let computed_count: u32 = self.items.iter().map(|item| item.cantidad).sum();
        if self.total_items != computed_count {
            return Err(ContractViolation::CartItemCount {
                reported: self.total_items,
                computed: computed_count,
            });
        }

        Ok(())
    }
}

/// Request body for `POST carrito/agregar`.
///
/// The server computes price and subtotal; the client never sends them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub servicio_id: i64,
    pub cantidad: u32,
    pub fecha_servicio: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notas_especiales: Option<String>,
}
