//! In-crate test fixtures: hand-built domain snapshots with consistent
//! server-computed totals.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use turista_types::cart::{
    Cart, CartItem, MerchantSummary, Municipality, ServiceLocation, ServiceSnapshot, TipoServicio,
};
use turista_types::chat::{ChatMessage, Conversation, EstadoConversacion, TipoMensaje};
use turista_types::reservation::{
    CartReservation, EstadoReserva, MetodoPago, PlanReservation, PlanSummary, UserSummary,
};

pub(crate) fn ts(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 20, hour, minute, 0).unwrap()
}

pub(crate) fn test_municipality() -> Municipality {
    Municipality {
        id: 1,
        nombre: "Capachica".to_string(),
        departamento: "Puno".to_string(),
        provincia: "Puno".to_string(),
        distrito: "Capachica".to_string(),
    }
}

pub(crate) fn test_merchant() -> MerchantSummary {
    MerchantSummary {
        id: 7,
        nombre_empresa: "Turismo Bahía".to_string(),
        rubro: "Turismo".to_string(),
        telefono: "951000000".to_string(),
        email: "contacto@bahia.pe".to_string(),
        municipalidad: test_municipality(),
    }
}

pub(crate) fn test_user() -> UserSummary {
    UserSummary {
        id: 42,
        nombre: "Rosa".to_string(),
        apellido: "Mamani".to_string(),
        username: "rmamani".to_string(),
        email: "rosa@example.com".to_string(),
    }
}

pub(crate) fn test_service(id: i64, precio: f64) -> ServiceSnapshot {
    ServiceSnapshot {
        id,
        nombre: format!("Servicio {id}"),
        descripcion: "Paseo en bote por la bahía".to_string(),
        precio,
        duracion_horas: 2,
        tipo: TipoServicio::Tour,
        imagen_url: None,
        ubicacion: ServiceLocation {
            latitud: Some(-15.64),
            longitud: Some(-69.83),
            direccion_completa: None,
            tiene_ubicacion_valida: true,
        },
        emprendedor: test_merchant(),
    }
}

pub(crate) fn test_cart_item(id: i64, cantidad: u32, precio: f64) -> CartItem {
    CartItem {
        id,
        cantidad,
        precio_unitario: precio,
        subtotal: f64::from(cantidad) * precio,
        fecha_servicio: NaiveDate::from_ymd_opt(2026, 9, 15).unwrap(),
        notas_especiales: None,
        fecha_agregado: ts(12, 0),
        servicio: test_service(id * 10, precio),
    }
}

pub(crate) fn test_cart(items: Vec<CartItem>) -> Cart {
    let total_carrito = items.iter().map(|i| i.subtotal).sum();
    let total_items = items.iter().map(|i| i.cantidad).sum();
    Cart {
        id: 1,
        usuario_id: 42,
        fecha_creacion: ts(12, 0),
        fecha_actualizacion: ts(12, 30),
        total_carrito,
        total_items,
        items,
    }
}

pub(crate) fn test_cart_reservation(id: i64, estado: EstadoReserva) -> CartReservation {
    CartReservation {
        id,
        codigo_reserva: format!("RES-{id:04}"),
        monto_total: 130.0,
        monto_descuento: 10.0,
        monto_final: 120.0,
        estado,
        metodo_pago: MetodoPago::Efectivo,
        observaciones: None,
        contacto_emergencia: None,
        telefono_emergencia: None,
        fecha_reserva: ts(15, 0),
        fecha_confirmacion: None,
        fecha_cancelacion: None,
        motivo_cancelacion: None,
        usuario: test_user(),
        items: Vec::new(),
        pagos: Vec::new(),
    }
}

pub(crate) fn test_plan_reservation(id: i64, estado: EstadoReserva) -> PlanReservation {
    PlanReservation {
        id,
        codigo_reserva: format!("PLAN-{id:04}"),
        plan_id: 3,
        plan_nombre: "Ruta del Titicaca".to_string(),
        cantidad: 2,
        precio_unitario: 200.0,
        monto_total: 400.0,
        monto_descuento: 0.0,
        monto_final: 400.0,
        estado,
        metodo_pago: MetodoPago::Yape,
        fecha_inicio: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
        fecha_fin: NaiveDate::from_ymd_opt(2026, 10, 3).unwrap(),
        observaciones: None,
        contacto_emergencia: None,
        telefono_emergencia: None,
        fecha_reserva: ts(16, 0),
        fecha_confirmacion: None,
        fecha_cancelacion: None,
        motivo_cancelacion: None,
        usuario: test_user(),
        plan: PlanSummary {
            id: 3,
            nombre: "Ruta del Titicaca".to_string(),
            descripcion: "Tres días por la península".to_string(),
            duracion_dias: 3,
            imagen_principal_url: None,
            municipalidad: test_municipality(),
        },
        pagos: Vec::new(),
    }
}

pub(crate) fn test_message(id: i64, conversacion_id: i64, sent_at: DateTime<Utc>) -> ChatMessage {
    ChatMessage {
        id,
        conversacion_id,
        mensaje: format!("mensaje {id}"),
        tipo: TipoMensaje::Texto,
        fecha_envio: sent_at,
        leido: false,
        es_de_emprendedor: id % 2 == 0,
        remitente_id: if id % 2 == 0 { 7 } else { 42 },
        remitente_nombre: "Rosa Mamani".to_string(),
        archivo_url: None,
        archivo_nombre: None,
        archivo_tipo: None,
    }
}

pub(crate) fn test_conversation(id: i64, unread: u32, last_at: DateTime<Utc>) -> Conversation {
    Conversation {
        id,
        usuario_id: 42,
        emprendedor_id: 7,
        reserva_id: None,
        reserva_carrito_id: None,
        codigo_reserva_asociada: None,
        fecha_creacion: ts(9, 0),
        fecha_ultimo_mensaje: last_at,
        estado: EstadoConversacion::Activa,
        usuario: test_user(),
        emprendedor: test_merchant(),
        ultimo_mensaje: None,
        mensajes_no_leidos: unread,
        mensajes_recientes: Vec::new(),
    }
}
