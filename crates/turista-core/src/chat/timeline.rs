//! Timeline entries: server-confirmed messages plus locally queued
//! outbound placeholders awaiting confirmation.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use turista_types::chat::ChatMessage;

/// Delivery state of a locally queued message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundState {
    /// Shown immediately while the remote send is in flight.
    Sending,
    /// The send failed; the entry stays visible and can be retried.
    Failed,
}

/// A placeholder appended to the timeline the moment the user hits send,
/// before the server has confirmed anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Local identity; v7 UUIDs sort by creation time, matching the
    /// tail position of the placeholder.
    pub local_id: Uuid,
    pub mensaje: String,
    pub creado: DateTime<Utc>,
    pub estado: OutboundState,
}

impl OutboundMessage {
    pub fn new(mensaje: String) -> Self {
        Self {
            local_id: Uuid::now_v7(),
            mensaje,
            creado: Utc::now(),
            estado: OutboundState::Sending,
        }
    }
}

/// One rendered slot in a conversation timeline, oldest to newest.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineEntry {
    /// A message the server has acknowledged.
    Confirmed(ChatMessage),
    /// A locally queued message, sending or failed.
    Outbound(OutboundMessage),
}

impl TimelineEntry {
    /// Server message id, if confirmed.
    pub fn message_id(&self) -> Option<i64> {
        match self {
            TimelineEntry::Confirmed(message) => Some(message.id),
            TimelineEntry::Outbound(_) => None,
        }
    }

    pub fn body(&self) -> &str {
        match self {
            TimelineEntry::Confirmed(message) => &message.mensaje,
            TimelineEntry::Outbound(outbound) => &outbound.mensaje,
        }
    }

    pub fn sent_at(&self) -> DateTime<Utc> {
        match self {
            TimelineEntry::Confirmed(message) => message.fecha_envio,
            TimelineEntry::Outbound(outbound) => outbound.creado,
        }
    }

    pub fn is_sending(&self) -> bool {
        matches!(
            self,
            TimelineEntry::Outbound(OutboundMessage {
                estado: OutboundState::Sending,
                ..
            })
        )
    }

    pub fn is_failed(&self) -> bool {
        matches!(
            self,
            TimelineEntry::Outbound(OutboundMessage {
                estado: OutboundState::Failed,
                ..
            })
        )
    }
}
