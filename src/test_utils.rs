//! Shared test doubles and fixture builders.

use crate::api::{CampusApi, ChatSession, Message, SendReply, SessionId, SessionPatch};
use crate::error::{CampmateError, Result};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Build a session created "now" with the given id and title.
pub fn test_session(id: &str, title: &str) -> ChatSession {
    ChatSession {
        id: SessionId::new(id),
        title: title.to_string(),
        is_pinned: false,
        created_at: Utc::now(),
        updated_at: None,
        message_count: 0,
        last_message: None,
    }
}

/// Build a session whose last activity is `days` whole days before `now`.
pub fn session_days_ago(id: &str, days: i64, now: DateTime<Utc>) -> ChatSession {
    let mut session = test_session(id, id);
    session.created_at = now - Duration::days(days);
    session
}

type Queue<T> = Mutex<VecDeque<std::result::Result<T, String>>>;

/// Scriptable in-memory [`CampusApi`].
///
/// Each method pops the next queued response for its endpoint, falling back
/// to a benign success when the queue is empty. Every call is appended to a
/// log so tests can assert which endpoints were (or were not) hit.
#[derive(Default)]
pub struct StubApi {
    list: Queue<Vec<ChatSession>>,
    create: Queue<ChatSession>,
    update: Queue<ChatSession>,
    delete: Queue<()>,
    history: Queue<Vec<Message>>,
    send: Queue<SendReply>,
    clear: Queue<()>,
    calls: Mutex<Vec<String>>,
}

impl StubApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_list(&self, result: std::result::Result<Vec<ChatSession>, String>) {
        self.list.lock().unwrap().push_back(result);
    }

    pub fn on_create(&self, result: std::result::Result<ChatSession, String>) {
        self.create.lock().unwrap().push_back(result);
    }

    pub fn on_update(&self, result: std::result::Result<ChatSession, String>) {
        self.update.lock().unwrap().push_back(result);
    }

    pub fn on_delete(&self, result: std::result::Result<(), String>) {
        self.delete.lock().unwrap().push_back(result);
    }

    pub fn on_history(&self, result: std::result::Result<Vec<Message>, String>) {
        self.history.lock().unwrap().push_back(result);
    }

    pub fn on_send(&self, result: std::result::Result<SendReply, String>) {
        self.send.lock().unwrap().push_back(result);
    }

    pub fn on_clear(&self, result: std::result::Result<(), String>) {
        self.clear.lock().unwrap().push_back(result);
    }

    /// Endpoint names in call order.
    pub fn call_log(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn take<T>(&self, name: &str, queue: &Queue<T>, fallback: impl FnOnce() -> T) -> Result<T> {
        self.calls.lock().unwrap().push(name.to_string());
        match queue.lock().unwrap().pop_front() {
            Some(Ok(value)) => Ok(value),
            Some(Err(message)) => Err(CampmateError::Api(message).into()),
            None => Ok(fallback()),
        }
    }
}

#[async_trait]
impl CampusApi for StubApi {
    async fn list_sessions(&self) -> Result<Vec<ChatSession>> {
        self.take("list_sessions", &self.list, Vec::new)
    }

    async fn create_session(&self) -> Result<ChatSession> {
        self.take("create_session", &self.create, || {
            test_session("stub", "New Chat")
        })
    }

    async fn update_session(&self, id: &SessionId, _patch: &SessionPatch) -> Result<ChatSession> {
        let id = id.as_str().to_string();
        self.take("update_session", &self.update, || test_session(&id, &id))
    }

    async fn delete_session(&self, _id: &SessionId) -> Result<()> {
        self.take("delete_session", &self.delete, || ())
    }

    async fn history(&self, _id: &SessionId) -> Result<Vec<Message>> {
        self.take("history", &self.history, Vec::new)
    }

    async fn send_message(&self, _text: &str, _session: &SessionId) -> Result<SendReply> {
        self.take("send_message", &self.send, || SendReply {
            reply: "ok".to_string(),
        })
    }

    async fn clear_history(&self) -> Result<()> {
        self.take("clear_history", &self.clear, || ())
    }
}
