//! ChatApi over HTTP.

use reqwest::Method;

use turista_core::chat::ChatApi;
use turista_types::chat::{ChatMessage, Conversation, SendMessageRequest};
use turista_types::error::ClientError;

use crate::http::TuristaClient;

impl ChatApi for TuristaClient {
    async fn list_conversations(&self) -> Result<Vec<Conversation>, ClientError> {
        self.get_json("chat/conversaciones").await
    }

    async fn get_conversation(&self, conversation_id: i64) -> Result<Conversation, ClientError> {
        self.get_json(&format!("chat/conversacion/{conversation_id}"))
            .await
    }

    async fn get_messages(
        &self,
        conversation_id: i64,
        pagina: u32,
        tamano: u32,
    ) -> Result<Vec<ChatMessage>, ClientError> {
        self.execute(
            self.request(
                Method::GET,
                &format!("chat/conversacion/{conversation_id}/mensajes"),
            )
            // The service spells the page-size parameter with the eñe.
            .query(&[("pagina", pagina), ("tamaño", tamano)]),
        )
        .await
    }

    async fn start_conversation(
        &self,
        emprendedor_id: i64,
        reserva_id: Option<i64>,
    ) -> Result<Conversation, ClientError> {
        let mut builder = self
            .request(Method::POST, "chat/conversacion/iniciar")
            .query(&[("emprendedorId", emprendedor_id)]);
        if let Some(reserva_id) = reserva_id {
            builder = builder.query(&[("reservaId", reserva_id)]);
        }
        self.execute(builder).await
    }

    async fn send_message(&self, request: &SendMessageRequest) -> Result<ChatMessage, ClientError> {
        self.execute(self.request(Method::POST, "chat/mensaje").json(request))
            .await
    }

    async fn mark_read(&self, conversation_id: i64) -> Result<(), ClientError> {
        self.execute_empty(self.request(
            Method::PATCH,
            &format!("chat/conversacion/{conversation_id}/marcar-leido"),
        ))
        .await
    }

    async fn close_conversation(&self, conversation_id: i64) -> Result<Conversation, ClientError> {
        self.execute(self.request(
            Method::PATCH,
            &format!("chat/conversacion/{conversation_id}/cerrar"),
        ))
        .await
    }
}
