//! ChatSession -- one conversation's message timeline.
//!
//! Owns backward pagination over the message history, the optimistic
//! send queue, and read-receipt reconciliation. The timeline the
//! presentation layer renders is always oldest to newest: older pages
//! are spliced in at the front, outbound placeholders sit at the tail
//! until the server confirms them.

use std::collections::HashSet;
use std::sync::Mutex;

use tracing::{debug, info, warn};
use uuid::Uuid;

use turista_types::chat::{ChatMessage, Conversation, SendMessageRequest, TipoMensaje};
use turista_types::error::ClientError;

use crate::lock_state;

use super::api::ChatApi;
use super::timeline::{OutboundMessage, OutboundState, TimelineEntry};

/// Fixed page size for message history fetches.
pub const PAGE_SIZE: u32 = 20;

struct SessionState {
    conversation: Conversation,
    timeline: Vec<TimelineEntry>,
    /// Next older page index to fetch. Advanced only after a successful
    /// fetch, so a retry after a failure re-requests the same page.
    next_page: u32,
    /// Set once a short page came back: there is nothing older.
    exhausted: bool,
    page_in_flight: bool,
    /// Bumped by [`ChatSession::invalidate`]; responses issued under an
    /// older generation are never applied.
    generation: u64,
}

/// Owns one conversation's timeline and send queue.
pub struct ChatSession<A: ChatApi> {
    api: A,
    state: Mutex<SessionState>,
}

impl<A: ChatApi> ChatSession<A> {
    /// Wrap an already-fetched conversation.
    pub fn new(api: A, conversation: Conversation) -> Self {
        Self {
            api,
            state: Mutex::new(SessionState {
                conversation,
                timeline: Vec::new(),
                next_page: 0,
                exhausted: false,
                page_in_flight: false,
                generation: 0,
            }),
        }
    }

    /// Fetch the conversation detail and open a session on it.
    pub async fn open(api: A, conversation_id: i64) -> Result<Self, ClientError> {
        let conversation = api.get_conversation(conversation_id).await?;
        Ok(Self::new(api, conversation))
    }

    /// The current conversation snapshot.
    pub fn conversation(&self) -> Conversation {
        lock_state(&self.state).conversation.clone()
    }

    /// The rendered timeline, oldest to newest.
    pub fn timeline(&self) -> Vec<TimelineEntry> {
        lock_state(&self.state).timeline.clone()
    }

    /// Whether an older page may still exist.
    pub fn can_load_older(&self) -> bool {
        let state = lock_state(&self.state);
        !state.exhausted && !state.page_in_flight
    }

    /// Drop interest in any in-flight responses (owning screen was
    /// dismissed). Results of already-issued calls are discarded.
    pub fn invalidate(&self) {
        let mut state = lock_state(&self.state);
        state.generation += 1;
        debug!(
            conversation_id = state.conversation.id,
            generation = state.generation,
            "chat session invalidated"
        );
    }

    /// Load the most recent page, replacing the confirmed portion of the
    /// timeline. Pending outbound placeholders stay at the tail.
    pub async fn load_initial_page(&self) -> Result<Vec<TimelineEntry>, ClientError> {
        let (issued, conversation_id) = {
            let mut state = lock_state(&self.state);
            if state.page_in_flight {
                return Err(ClientError::Validation(
                    "a page load is already in flight".to_string(),
                ));
            }
            state.page_in_flight = true;
            (state.generation, state.conversation.id)
        };
        let result = self.api.get_messages(conversation_id, 0, PAGE_SIZE).await;

        let mut state = lock_state(&self.state);
        state.page_in_flight = false;
        let page = result?;
        if state.generation != issued {
            debug!(conversation_id, "dropping initial page issued before invalidation");
            return Ok(state.timeline.clone());
        }

        state.exhausted = page.len() < PAGE_SIZE as usize;
        state.next_page = 1;

        let outbound: Vec<TimelineEntry> = state
            .timeline
            .drain(..)
            .filter(|entry| matches!(entry, TimelineEntry::Outbound(_)))
            .collect();
        state.timeline = dedup_page(page, &HashSet::new());
        state.timeline.extend(outbound);
        Ok(state.timeline.clone())
    }

    /// Load the next older page and splice it in at the front.
    ///
    /// Callable only once the previous page fetch has settled. The
    /// cursor advances only on success, so calling again after a
    /// failure safely re-fetches the same page.
    pub async fn load_older_page(&self) -> Result<Vec<TimelineEntry>, ClientError> {
        let (issued, conversation_id, page_index) = {
            let mut state = lock_state(&self.state);
            if state.exhausted {
                return Ok(state.timeline.clone());
            }
            if state.page_in_flight {
                return Err(ClientError::Validation(
                    "a page load is already in flight".to_string(),
                ));
            }
            state.page_in_flight = true;
            (state.generation, state.conversation.id, state.next_page)
        };
        let result = self
            .api
            .get_messages(conversation_id, page_index, PAGE_SIZE)
            .await;

        let mut state = lock_state(&self.state);
        state.page_in_flight = false;
        let page = result?;
        if state.generation != issued {
            debug!(conversation_id, "dropping older page issued before invalidation");
            return Ok(state.timeline.clone());
        }

        state.exhausted = page.len() < PAGE_SIZE as usize;
        state.next_page = page_index + 1;

        let seen: HashSet<i64> = state
            .timeline
            .iter()
            .filter_map(TimelineEntry::message_id)
            .collect();
        let older = dedup_page(page, &seen);
        state.timeline.splice(0..0, older);
        Ok(state.timeline.clone())
    }

    /// Send a message with an optimistic placeholder.
    ///
    /// The placeholder appears at the timeline tail immediately; on
    /// success it is replaced in place by the server-confirmed message,
    /// on failure it is marked failed and stays retryable via
    /// [`ChatSession::resend`]. Rejected locally without a round trip
    /// unless the conversation is active.
    pub async fn send(&self, body: &str) -> Result<ChatMessage, ClientError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(ClientError::Validation("message body is empty".to_string()));
        }
        let (local_id, conversation_id) = {
            let mut state = lock_state(&self.state);
            if !state.conversation.estado.allows_sending() {
                return Err(ClientError::Validation(format!(
                    "conversation {} is {}",
                    state.conversation.id, state.conversation.estado
                )));
            }
            let outbound = OutboundMessage::new(body.to_string());
            let local_id = outbound.local_id;
            state.timeline.push(TimelineEntry::Outbound(outbound));
            (local_id, state.conversation.id)
        };
        self.dispatch(local_id, conversation_id, body.to_string())
            .await
    }

    /// Retry a failed placeholder.
    pub async fn resend(&self, local_id: Uuid) -> Result<ChatMessage, ClientError> {
        let (conversation_id, body) = {
            let mut state = lock_state(&self.state);
            let conversation_id = state.conversation.id;
            let outbound = find_outbound(&mut state.timeline, local_id).ok_or_else(|| {
                ClientError::Validation(format!("no queued message {local_id}"))
            })?;
            if outbound.estado != OutboundState::Failed {
                return Err(ClientError::Validation(format!(
                    "message {local_id} is still sending"
                )));
            }
            outbound.estado = OutboundState::Sending;
            (conversation_id, outbound.mensaje.clone())
        };
        self.dispatch(local_id, conversation_id, body).await
    }

    /// Zero the unread counter and notify the server, best-effort.
    ///
    /// Read receipts are not consistency-critical: the local counter is
    /// zeroed optimistically and never rolled back; a delivery failure
    /// is only logged.
    pub async fn mark_read(&self) {
        let conversation_id = {
            let mut state = lock_state(&self.state);
            state.conversation.mensajes_no_leidos = 0;
            for entry in &mut state.timeline {
                if let TimelineEntry::Confirmed(message) = entry {
                    if message.es_de_emprendedor {
                        message.leido = true;
                    }
                }
            }
            state.conversation.id
        };
        if let Err(error) = self.api.mark_read(conversation_id).await {
            warn!(conversation_id, %error, "read receipt not delivered");
        }
    }

    /// Close the conversation. Once closed, [`ChatSession::send`] is
    /// rejected locally.
    pub async fn close(&self) -> Result<Conversation, ClientError> {
        let (issued, conversation_id) = {
            let state = lock_state(&self.state);
            (state.generation, state.conversation.id)
        };
        let conversation = self.api.close_conversation(conversation_id).await?;
        let mut state = lock_state(&self.state);
        if state.generation == issued {
            state.conversation = conversation.clone();
        }
        info!(conversation_id, "conversation closed");
        Ok(conversation)
    }

    async fn dispatch(
        &self,
        local_id: Uuid,
        conversation_id: i64,
        body: String,
    ) -> Result<ChatMessage, ClientError> {
        let issued = lock_state(&self.state).generation;
        let request = SendMessageRequest {
            conversacion_id: conversation_id,
            mensaje: body,
            tipo: TipoMensaje::Texto,
        };
        match self.api.send_message(&request).await {
            Ok(message) => {
                let mut state = lock_state(&self.state);
                if state.generation == issued {
                    let slot = state.timeline.iter().position(|entry| {
                        matches!(entry, TimelineEntry::Outbound(o) if o.local_id == local_id)
                    });
                    if let Some(slot) = slot {
                        state.timeline[slot] = TimelineEntry::Confirmed(message.clone());
                    }
                    state.conversation.fecha_ultimo_mensaje = message.fecha_envio;
                    state.conversation.ultimo_mensaje = Some(message.clone());
                } else {
                    debug!(conversation_id, "dropping send result issued before invalidation");
                }
                Ok(message)
            }
            Err(error) => {
                let mut state = lock_state(&self.state);
                if state.generation == issued {
                    if let Some(outbound) = find_outbound(&mut state.timeline, local_id) {
                        outbound.estado = OutboundState::Failed;
                    }
                }
                warn!(conversation_id, %error, "message send failed");
                Err(error)
            }
        }
    }
}

fn find_outbound(timeline: &mut [TimelineEntry], local_id: Uuid) -> Option<&mut OutboundMessage> {
    timeline.iter_mut().find_map(|entry| match entry {
        TimelineEntry::Outbound(outbound) if outbound.local_id == local_id => Some(outbound),
        _ => None,
    })
}

/// Wrap a page of server messages, skipping ids already in the timeline
/// (overlapping pages can repeat a boundary message).
fn dedup_page(page: Vec<ChatMessage>, seen: &HashSet<i64>) -> Vec<TimelineEntry> {
    let mut in_page = HashSet::new();
    page.into_iter()
        .filter(|message| !seen.contains(&message.id) && in_page.insert(message.id))
        .map(TimelineEntry::Confirmed)
        .collect()
}
