//! Backend API abstraction for Campmate
//!
//! This module defines the [`CampusApi`] trait the rest of the client is
//! written against, along with the wire types and the reqwest-backed
//! implementation. The backend owns all business logic (assistant replies,
//! budgets, recommendations); the client only issues the calls below and
//! reconciles local state with the responses.

use crate::error::Result;
use async_trait::async_trait;

pub mod http;
pub mod types;

pub use http::HttpCampusApi;
pub use types::{ChatSession, Message, Role, SendReply, SessionId, SessionPatch};

/// Operations the client needs from the campus-assistant backend.
///
/// Every method maps to a single HTTP call; failures of any kind (transport,
/// timeout, non-2xx status) surface as one opaque error — callers pick the
/// failure branch without inspecting the cause.
#[async_trait]
pub trait CampusApi: Send + Sync {
    /// Fetch all chat sessions for the signed-in user, newest first.
    async fn list_sessions(&self) -> Result<Vec<ChatSession>>;

    /// Create a fresh session with a server-assigned id and default title.
    async fn create_session(&self) -> Result<ChatSession>;

    /// Apply a partial update (title and/or pin state) to a session.
    async fn update_session(&self, id: &SessionId, patch: &SessionPatch) -> Result<ChatSession>;

    /// Delete a session and its messages.
    async fn delete_session(&self, id: &SessionId) -> Result<()>;

    /// Fetch the chronological transcript of a session.
    async fn history(&self, id: &SessionId) -> Result<Vec<Message>>;

    /// Send a user message to a session and return the assistant's reply.
    async fn send_message(&self, text: &str, session: &SessionId) -> Result<SendReply>;

    /// Delete every session and message for the signed-in user.
    async fn clear_history(&self) -> Result<()>;
}
