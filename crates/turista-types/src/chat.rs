//! Conversation and message types.
//!
//! A conversation is a persistent thread between a user and a merchant,
//! optionally tied to a reservation. Messages within it are timeline
//! entries ordered by send time; the unread counter and the recent-page
//! embed exist so a directory listing can render without a second fetch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use std::fmt;

use crate::cart::MerchantSummary;
use crate::reservation::UserSummary;

/// Lifecycle state of a conversation: `ACTIVA <-> PAUSADA`, `ACTIVA ->
/// CERRADA` (terminal). Unknown wire values fall back to `Activa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EstadoConversacion {
    #[serde(rename = "ACTIVA")]
    Activa,
    #[serde(rename = "CERRADA")]
    Cerrada,
    #[serde(rename = "PAUSADA")]
    Pausada,
}

impl EstadoConversacion {
    /// Parse a wire value, falling back to `Activa` on unknown input.
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "ACTIVA" => EstadoConversacion::Activa,
            "CERRADA" => EstadoConversacion::Cerrada,
            "PAUSADA" => EstadoConversacion::Pausada,
            _ => EstadoConversacion::Activa,
        }
    }

    /// Whether the message input should be offered. Mirrors the server's
    /// authorization rule: only an active conversation accepts sends.
    pub fn allows_sending(self) -> bool {
        self == EstadoConversacion::Activa
    }
}

impl Default for EstadoConversacion {
    fn default() -> Self {
        EstadoConversacion::Activa
    }
}

impl fmt::Display for EstadoConversacion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EstadoConversacion::Activa => "ACTIVA",
            EstadoConversacion::Cerrada => "CERRADA",
            EstadoConversacion::Pausada => "PAUSADA",
        };
        write!(f, "{s}")
    }
}

impl<'de> Deserialize<'de> for EstadoConversacion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(EstadoConversacion::from_wire(&raw))
    }
}

/// Kind of a chat message. Unknown wire values fall back to `Texto`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TipoMensaje {
    #[serde(rename = "TEXTO")]
    Texto,
    #[serde(rename = "IMAGEN")]
    Imagen,
    #[serde(rename = "ARCHIVO")]
    Archivo,
    #[serde(rename = "UBICACION")]
    Ubicacion,
    #[serde(rename = "SISTEMA")]
    Sistema,
}

impl TipoMensaje {
    /// Parse a wire value, falling back to `Texto` on unknown input.
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "TEXTO" => TipoMensaje::Texto,
            "IMAGEN" => TipoMensaje::Imagen,
            "ARCHIVO" => TipoMensaje::Archivo,
            "UBICACION" => TipoMensaje::Ubicacion,
            "SISTEMA" => TipoMensaje::Sistema,
            _ => TipoMensaje::Texto,
        }
    }
}

impl Default for TipoMensaje {
    fn default() -> Self {
        TipoMensaje::Texto
    }
}

impl fmt::Display for TipoMensaje {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TipoMensaje::Texto => "TEXTO",
            TipoMensaje::Imagen => "IMAGEN",
            TipoMensaje::Archivo => "ARCHIVO",
            TipoMensaje::Ubicacion => "UBICACION",
            TipoMensaje::Sistema => "SISTEMA",
        };
        write!(f, "{s}")
    }
}

impl<'de> Deserialize<'de> for TipoMensaje {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(TipoMensaje::from_wire(&raw))
    }
}

/// A server-confirmed message within a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: i64,
    pub conversacion_id: i64,
    pub mensaje: String,
    #[serde(default)]
    pub tipo: TipoMensaje,
    pub fecha_envio: DateTime<Utc>,
    pub leido: bool,
    pub es_de_emprendedor: bool,
    pub remitente_id: i64,
    pub remitente_nombre: String,
    #[serde(default)]
    pub archivo_url: Option<String>,
    #[serde(default)]
    pub archivo_nombre: Option<String>,
    #[serde(default)]
    pub archivo_tipo: Option<String>,
}

/// A chat thread between a user and a merchant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: i64,
    pub usuario_id: i64,
    pub emprendedor_id: i64,
    #[serde(default)]
    pub reserva_id: Option<i64>,
    #[serde(default)]
    pub reserva_carrito_id: Option<i64>,
    #[serde(default)]
    pub codigo_reserva_asociada: Option<String>,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_ultimo_mensaje: DateTime<Utc>,
    #[serde(default)]
    pub estado: EstadoConversacion,
    pub usuario: UserSummary,
    pub emprendedor: MerchantSummary,
    #[serde(default)]
    pub ultimo_mensaje: Option<ChatMessage>,
    #[serde(default)]
    pub mensajes_no_leidos: u32,
    #[serde(default)]
    pub mensajes_recientes: Vec<ChatMessage>,
}

/// Request body for `POST chat/mensaje`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub conversacion_id: i64,
    pub mensaje: String,
    #[serde(default)]
    pub tipo: TipoMensaje,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estado_conversacion_fallback() {
        assert_eq!(EstadoConversacion::from_wire("CERRADA"), EstadoConversacion::Cerrada);
        assert_eq!(EstadoConversacion::from_wire("pausada"), EstadoConversacion::Pausada);
        assert_eq!(EstadoConversacion::from_wire("ARCHIVADA"), EstadoConversacion::Activa);
        let parsed: EstadoConversacion = serde_json::from_str("\"SUSPENDIDA\"").unwrap();
        assert_eq!(parsed, EstadoConversacion::Activa);
    }

    #[test]
    fn test_tipo_mensaje_fallback() {
        assert_eq!(TipoMensaje::from_wire("UBICACION"), TipoMensaje::Ubicacion);
        assert_eq!(TipoMensaje::from_wire("STICKER"), TipoMensaje::Texto);
        let parsed: TipoMensaje = serde_json::from_str("\"AUDIO\"").unwrap();
        assert_eq!(parsed, TipoMensaje::Texto);
    }

    #[test]
    fn test_allows_sending() {
        assert!(EstadoConversacion::Activa.allows_sending());
        assert!(!EstadoConversacion::Pausada.allows_sending());
        assert!(!EstadoConversacion::Cerrada.allows_sending());
    }

    #[test]
    fn test_message_decode_with_defaulted_fields() {
        let json = r#"{
            "id": 5,
            "conversacionId": 2,
            "mensaje": "¿Sigue disponible el tour?",
            "tipo": "TEXTO",
            "fechaEnvio": "2026-08-21T09:30:00Z",
            "leido": false,
            "esDeEmprendedor": false,
            "remitenteId": 42,
            "remitenteNombre": "Rosa Mamani"
        }"#;
        let message: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(message.tipo, TipoMensaje::Texto);
        assert!(message.archivo_url.is_none());
    }

    #[test]
    fn test_send_request_wire_shape() {
        let request = SendMessageRequest {
            conversacion_id: 2,
            mensaje: "hola".to_string(),
            tipo: TipoMensaje::Texto,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["conversacionId"], 2);
        assert_eq!(value["tipo"], "TEXTO");
    }
}
