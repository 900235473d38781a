//! ChatApi trait definition.
//!
//! The remote chat surface consumed by [`super::ChatSession`] and
//! [`super::ConversationDirectory`]. Uses native async fn in traits
//! (RPITIT, Rust 2024 edition); the HTTP implementation lives in
//! `turista-client`.

use turista_types::chat::{ChatMessage, Conversation, SendMessageRequest};
use turista_types::error::ClientError;

/// Remote chat endpoints.
pub trait ChatApi: Send + Sync {
    /// All conversations for the current identity.
    fn list_conversations(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Conversation>, ClientError>> + Send;

    /// One conversation's detail.
    fn get_conversation(
        &self,
        conversation_id: i64,
    ) -> impl std::future::Future<Output = Result<Conversation, ClientError>> + Send;

    /// One page of messages. Page 0 is the most recent; messages within
    /// a page arrive oldest to newest.
    fn get_messages(
        &self,
        conversation_id: i64,
        pagina: u32,
        tamano: u32,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, ClientError>> + Send;

    /// Create a conversation with a merchant, optionally linked to a
    /// reservation.
    fn start_conversation(
        &self,
        emprendedor_id: i64,
        reserva_id: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Conversation, ClientError>> + Send;

    /// Send a message; returns the server-confirmed message with its
    /// authoritative id and timestamp.
    fn send_message(
        &self,
        request: &SendMessageRequest,
    ) -> impl std::future::Future<Output = Result<ChatMessage, ClientError>> + Send;

    /// Mark every message in the conversation as read.
    fn mark_read(
        &self,
        conversation_id: i64,
    ) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;

    /// Close the conversation (terminal).
    fn close_conversation(
        &self,
        conversation_id: i64,
    ) -> impl std::future::Future<Output = Result<Conversation, ClientError>> + Send;
}
