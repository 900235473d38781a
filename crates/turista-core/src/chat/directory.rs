//! ConversationDirectory -- the inbox listing of all conversations.
//!
//! Holds the last fetched conversation list sorted by recency, plus the
//! aggregate unread counter the navigation badge renders. Opening a
//! conversation zeroes its unread count locally right away; the server
//! side is reconciled by the session's read receipt.

use std::sync::Mutex;

use tracing::{debug, info};

use turista_types::chat::{Conversation, SendMessageRequest, TipoMensaje};
use turista_types::error::ClientError;

use crate::lock_state;

use super::api::ChatApi;

struct DirectoryState {
    conversations: Vec<Conversation>,
    generation: u64,
}

/// Local mirror of the conversation list.
pub struct ConversationDirectory<A: ChatApi> {
    api: A,
    state: Mutex<DirectoryState>,
}

impl<A: ChatApi> ConversationDirectory<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: Mutex::new(DirectoryState {
                conversations: Vec::new(),
                generation: 0,
            }),
        }
    }

    /// The last fetched list, most recent activity first.
    pub fn conversations(&self) -> Vec<Conversation> {
        lock_state(&self.state).conversations.clone()
    }

    /// Sum of unread counters across all conversations.
    pub fn total_unread(&self) -> u32 {
        lock_state(&self.state)
            .conversations
            .iter()
            .map(|c| c.mensajes_no_leidos)
            .sum()
    }

    /// Drop interest in any in-flight responses.
    pub fn invalidate(&self) {
        let mut state = lock_state(&self.state);
        state.generation += 1;
        debug!(generation = state.generation, "conversation directory invalidated");
    }

    /// Refresh the list from the server.
    ///
    /// The fetched list is sorted by last-message time, newest first,
    /// regardless of server order. A failure leaves the previous list
    /// in place.
    pub async fn list(&self) -> Result<Vec<Conversation>, ClientError> {
        let issued = lock_state(&self.state).generation;
        let mut conversations = self.api.list_conversations().await?;
        conversations.sort_by(|a, b| b.fecha_ultimo_mensaje.cmp(&a.fecha_ultimo_mensaje));

        let mut state = lock_state(&self.state);
        if state.generation == issued {
            state.conversations = conversations.clone();
        } else {
            debug!("dropping conversation list issued before invalidation");
        }
        Ok(conversations)
    }

    /// Start (or resume, server-side) a conversation with a merchant,
    /// optionally tied to a reservation and seeded with a first message.
    /// The thread goes to the front of the local list; the caller opens
    /// the returned conversation as a `ChatSession`.
    pub async fn start(
        &self,
        emprendedor_id: i64,
        initial_message: Option<&str>,
        reserva_id: Option<i64>,
    ) -> Result<Conversation, ClientError> {
        let issued = lock_state(&self.state).generation;
        let mut conversation = self
            .api
            .start_conversation(emprendedor_id, reserva_id)
            .await?;
        info!(
            conversation_id = conversation.id,
            emprendedor_id, "conversation started"
        );

        if let Some(body) = initial_message.map(str::trim).filter(|b| !b.is_empty()) {
            let request = SendMessageRequest {
                conversacion_id: conversation.id,
                mensaje: body.to_string(),
                tipo: TipoMensaje::Texto,
            };
            let message = self.api.send_message(&request).await?;
            conversation.fecha_ultimo_mensaje = message.fecha_envio;
            conversation.ultimo_mensaje = Some(message);
        }

        let mut state = lock_state(&self.state);
        if state.generation == issued {
            state.conversations.retain(|c| c.id != conversation.id);
            state.conversations.insert(0, conversation.clone());
        }
        Ok(conversation)
    }

    /// Zero a conversation's unread counter locally. Called when its
    /// screen opens, before the session's read receipt settles.
    pub fn note_opened(&self, conversation_id: i64) {
        let mut state = lock_state(&self.state);
        if let Some(conversation) = state
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
        {
            conversation.mensajes_no_leidos = 0;
        }
    }
}
