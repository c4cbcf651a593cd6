//! Active conversation state and the optimistic-send protocol
//!
//! The controller tracks which session is active and the transcript shown
//! for it. Its two hazards are ordering hazards, not data hazards:
//!
//! - a history fetch for a session the user has since abandoned must not
//!   overwrite the transcript of the session they switched to;
//! - the empty history of a session auto-created mid-send must not clobber
//!   the optimistic user message appended in the same operation.
//!
//! Both are handled by construction. History loads are a two-phase command:
//! [`ChatController::select_session`] issues a [`HistoryTicket`] stamped with
//! a generation counter, and [`ChatController::apply_history`] drops any
//! result whose ticket is stale. Sends are likewise split into
//! [`ChatController::begin_send`] / [`ChatController::complete_send`] so the
//! reply is only displayed if its session is still active; the
//! [`ChatController::send`] wrapper drives both phases for sequential
//! callers. The auto-create race is closed by arming a [`ReloadGuard`]
//! before activating the new session.

use crate::api::{CampusApi, Message, SendReply, SessionId};
use crate::chat::guard::ReloadGuard;
use crate::chat::session_list::SessionList;
use crate::error::Result;
use crate::notify::Notify;

/// Greeting shown when no session is selected.
pub const WELCOME_NO_SESSION: &str = "Hey! I'm Campmate, your campus assistant. \
Start a new chat or pick a previous one from the session list.";

/// Greeting substituted for an empty persisted transcript.
pub const WELCOME_EMPTY_SESSION: &str = "Hey! I'm Campmate. Tell me your budget, \
free time, and preferences and I'll sort you out!";

/// Synthetic assistant message appended when a send fails, so the
/// conversation stays legible.
pub const SEND_FAILURE_APOLOGY: &str = "Sorry, I'm having trouble connecting \
right now. Please try again in a moment.";

/// What the conversation is currently doing.
///
/// A tagged union instead of independent booleans: the controller is never
/// simultaneously loading history and sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatPhase {
    Idle,
    LoadingHistory,
    Sending,
}

/// Tag for an in-flight history fetch.
///
/// Records which session the fetch targets and the load generation at issue
/// time; [`ChatController::apply_history`] discards results whose generation
/// no longer matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTicket {
    session: SessionId,
    generation: u64,
}

impl HistoryTicket {
    pub fn session(&self) -> &SessionId {
        &self.session
    }
}

/// Tag for an in-flight send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendTicket {
    session: SessionId,
}

impl SendTicket {
    pub fn session(&self) -> &SessionId {
        &self.session
    }
}

/// Result of starting a send.
#[derive(Debug, PartialEq, Eq)]
pub enum SendStart {
    /// The optimistic message is appended; the network call should be issued.
    Started(SendTicket),
    /// Blank input or a send already in flight; nothing happened.
    Skipped,
    /// Session auto-create failed; the send was aborted.
    Failed,
}

/// Overall outcome of a completed send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    Skipped,
    Failed,
}

/// Tracks the active session and its displayed transcript.
pub struct ChatController {
    active: Option<SessionId>,
    transcript: Vec<Message>,
    phase: ChatPhase,
    guard: ReloadGuard,
    generation: u64,
}

impl Default for ChatController {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatController {
    pub fn new() -> Self {
        Self {
            active: None,
            transcript: vec![Message::assistant(WELCOME_NO_SESSION)],
            phase: ChatPhase::Idle,
            guard: ReloadGuard::new(),
            generation: 0,
        }
    }

    pub fn active_id(&self) -> Option<&SessionId> {
        self.active.as_ref()
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn phase(&self) -> ChatPhase {
        self.phase
    }

    pub fn is_sending(&self) -> bool {
        self.phase == ChatPhase::Sending
    }

    /// Switch the active session.
    ///
    /// Selecting `None` resets the transcript to the welcome greeting
    /// without touching the backend. Selecting a session normally starts a
    /// history load and returns its ticket — unless the reload guard was
    /// armed, in which case the flag is consumed and no load happens.
    ///
    /// Every call bumps the load generation, so history responses for the
    /// previously active session become stale and will be discarded.
    pub fn select_session(&mut self, id: Option<SessionId>) -> Option<HistoryTicket> {
        self.generation += 1;
        self.active = id;

        match self.active.clone() {
            None => {
                self.transcript = vec![Message::assistant(WELCOME_NO_SESSION)];
                if self.phase == ChatPhase::LoadingHistory {
                    self.phase = ChatPhase::Idle;
                }
                None
            }
            Some(session) => {
                if self.guard.consume() {
                    tracing::debug!("history reload suppressed for session {}", session);
                    return None;
                }
                self.phase = ChatPhase::LoadingHistory;
                Some(HistoryTicket {
                    session,
                    generation: self.generation,
                })
            }
        }
    }

    /// Start a history reload for the currently active session, if any.
    ///
    /// Invalidates any earlier in-flight load.
    pub fn begin_history_load(&mut self) -> Option<HistoryTicket> {
        let session = self.active.clone()?;
        self.generation += 1;
        self.phase = ChatPhase::LoadingHistory;
        Some(HistoryTicket {
            session,
            generation: self.generation,
        })
    }

    /// Apply the result of a history fetch.
    ///
    /// A stale ticket (the user switched sessions after the fetch was
    /// issued) is discarded without touching any state. An empty transcript
    /// is replaced with the welcome greeting; a fetch error keeps whatever
    /// transcript is currently shown.
    pub fn apply_history(&mut self, ticket: &HistoryTicket, result: Result<Vec<Message>>) {
        if ticket.generation != self.generation {
            tracing::debug!(
                "discarding stale history response for session {}",
                ticket.session
            );
            return;
        }
        if self.phase == ChatPhase::LoadingHistory {
            self.phase = ChatPhase::Idle;
        }
        match result {
            Ok(messages) if messages.is_empty() => {
                self.transcript = vec![Message::assistant(WELCOME_EMPTY_SESSION)];
            }
            Ok(messages) => self.transcript = messages,
            Err(e) => {
                // Transient fetch error: keep the transcript we have.
                tracing::warn!("history fetch failed: {}", e);
            }
        }
    }

    /// Fetch and apply the active session's transcript in one step.
    pub async fn load_history(&mut self, api: &dyn CampusApi) {
        if let Some(ticket) = self.begin_history_load() {
            let result = api.history(ticket.session()).await;
            self.apply_history(&ticket, result);
        }
    }

    /// Steps 1-3 of the send protocol: validate input, auto-create a session
    /// when none is active, append the optimistic user message.
    ///
    /// The optimistic append happens before any network call for the message
    /// itself, so the user's input is visible immediately and is never
    /// silently dropped.
    pub async fn begin_send(
        &mut self,
        api: &dyn CampusApi,
        sessions: &mut SessionList,
        notifier: &dyn Notify,
        text: &str,
    ) -> SendStart {
        let text = text.trim();
        if text.is_empty() || self.phase == ChatPhase::Sending {
            return SendStart::Skipped;
        }

        let target = match self.active.clone() {
            Some(id) => id,
            None => {
                let session = match sessions.create(api).await {
                    Ok(session) => session,
                    Err(e) => {
                        tracing::warn!("session auto-create failed: {}", e);
                        notifier.error("Could not start a chat session");
                        return SendStart::Failed;
                    }
                };
                // Activating the new session must not fetch its (empty)
                // history out from under the optimistic append below.
                self.guard.arm();
                let ticket = self.select_session(Some(session.id.clone()));
                debug_assert!(ticket.is_none(), "armed guard must suppress the reload");
                session.id
            }
        };

        self.transcript.push(Message::user(text));
        self.phase = ChatPhase::Sending;
        SendStart::Started(SendTicket { session: target })
    }

    /// Steps 4-6 of the send protocol: append the assistant reply or the
    /// apology, then leave the sending phase.
    ///
    /// A reply for a session the user has switched away from is persisted
    /// server-side but suppressed from the displayed transcript.
    pub fn complete_send(
        &mut self,
        ticket: &SendTicket,
        result: Result<SendReply>,
        notifier: &dyn Notify,
    ) -> SendOutcome {
        let still_active = self.active.as_ref() == Some(&ticket.session);
        let outcome = match result {
            Ok(reply) => {
                if still_active {
                    self.transcript.push(Message::assistant(reply.reply));
                } else {
                    tracing::debug!(
                        "reply for session {} arrived after switching away; not displayed",
                        ticket.session
                    );
                }
                SendOutcome::Sent
            }
            Err(e) => {
                tracing::warn!("send failed: {}", e);
                notifier.error("Could not reach the assistant. Please try again.");
                if still_active {
                    self.transcript.push(Message::assistant(SEND_FAILURE_APOLOGY));
                }
                SendOutcome::Failed
            }
        };
        if self.phase == ChatPhase::Sending {
            self.phase = ChatPhase::Idle;
        }
        outcome
    }

    /// Full send protocol for sequential callers.
    ///
    /// On success the session list is refreshed so sidebar metadata (title,
    /// recency) reflects the new turn.
    pub async fn send(
        &mut self,
        api: &dyn CampusApi,
        sessions: &mut SessionList,
        notifier: &dyn Notify,
        text: &str,
    ) -> SendOutcome {
        let ticket = match self.begin_send(api, sessions, notifier, text).await {
            SendStart::Started(ticket) => ticket,
            SendStart::Skipped => return SendOutcome::Skipped,
            SendStart::Failed => return SendOutcome::Failed,
        };
        let result = api.send_message(text.trim(), ticket.session()).await;
        let outcome = self.complete_send(&ticket, result, notifier);
        if outcome == SendOutcome::Sent {
            sessions.load_all(api).await;
        }
        outcome
    }

    /// React to a session deletion: clear the active reference when the
    /// deleted session was the one being viewed.
    pub fn session_deleted(&mut self, id: &SessionId) {
        if self.active.as_ref() == Some(id) {
            self.select_session(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Role;
    use crate::notify::MemoryNotifier;
    use crate::test_utils::{test_session, StubApi};
    use anyhow::anyhow;

    fn reply(text: &str) -> SendReply {
        SendReply {
            reply: text.to_string(),
        }
    }

    #[test]
    fn test_new_controller_shows_welcome() {
        let controller = ChatController::new();
        assert!(controller.active_id().is_none());
        assert_eq!(controller.phase(), ChatPhase::Idle);
        assert_eq!(controller.transcript().len(), 1);
        assert_eq!(controller.transcript()[0].content, WELCOME_NO_SESSION);
    }

    #[test]
    fn test_select_none_resets_to_welcome_without_ticket() {
        let mut controller = ChatController::new();
        controller.transcript = vec![Message::user("old")];

        let ticket = controller.select_session(None);
        assert!(ticket.is_none());
        assert_eq!(controller.transcript()[0].content, WELCOME_NO_SESSION);
    }

    #[test]
    fn test_select_session_issues_ticket_and_enters_loading() {
        let mut controller = ChatController::new();
        let ticket = controller.select_session(Some(SessionId::new("a")));
        assert!(ticket.is_some());
        assert_eq!(controller.phase(), ChatPhase::LoadingHistory);
        assert_eq!(ticket.unwrap().session().as_str(), "a");
    }

    #[test]
    fn test_apply_history_replaces_transcript() {
        let mut controller = ChatController::new();
        let ticket = controller.select_session(Some(SessionId::new("a"))).unwrap();

        controller.apply_history(
            &ticket,
            Ok(vec![Message::user("hi"), Message::assistant("hello")]),
        );
        assert_eq!(controller.phase(), ChatPhase::Idle);
        assert_eq!(controller.transcript().len(), 2);
        assert_eq!(controller.transcript()[1].role, Role::Assistant);
    }

    #[test]
    fn test_apply_history_empty_substitutes_welcome() {
        let mut controller = ChatController::new();
        let ticket = controller.select_session(Some(SessionId::new("a"))).unwrap();

        controller.apply_history(&ticket, Ok(vec![]));
        assert_eq!(controller.transcript().len(), 1);
        assert_eq!(controller.transcript()[0].content, WELCOME_EMPTY_SESSION);
    }

    #[test]
    fn test_apply_history_error_keeps_existing_transcript() {
        let mut controller = ChatController::new();
        let ticket = controller.select_session(Some(SessionId::new("a"))).unwrap();
        controller.apply_history(&ticket, Ok(vec![Message::user("kept")]));

        let ticket = controller.begin_history_load().unwrap();
        controller.apply_history(&ticket, Err(anyhow!("timeout")));
        assert_eq!(controller.transcript().len(), 1);
        assert_eq!(controller.transcript()[0].content, "kept");
        assert_eq!(controller.phase(), ChatPhase::Idle);
    }

    #[test]
    fn test_stale_history_response_is_discarded() {
        let mut controller = ChatController::new();

        // Select A, then switch to B before A's fetch resolves.
        let ticket_a = controller.select_session(Some(SessionId::new("a"))).unwrap();
        let ticket_b = controller.select_session(Some(SessionId::new("b"))).unwrap();

        controller.apply_history(&ticket_a, Ok(vec![Message::user("from a")]));
        // A's payload must not land; B's load is still pending.
        assert_eq!(controller.phase(), ChatPhase::LoadingHistory);
        assert_ne!(controller.transcript()[0].content, "from a");

        controller.apply_history(&ticket_b, Ok(vec![Message::user("from b")]));
        assert_eq!(controller.transcript()[0].content, "from b");
    }

    #[test]
    fn test_stale_ticket_after_deselect_is_discarded() {
        let mut controller = ChatController::new();
        let ticket = controller.select_session(Some(SessionId::new("a"))).unwrap();
        controller.select_session(None);

        controller.apply_history(&ticket, Ok(vec![Message::user("late")]));
        assert_eq!(controller.transcript()[0].content, WELCOME_NO_SESSION);
    }

    #[tokio::test]
    async fn test_send_blank_text_is_noop_without_network_calls() {
        let api = StubApi::new();
        let notifier = MemoryNotifier::new();
        let mut controller = ChatController::new();
        let mut sessions = SessionList::new();

        let outcome = controller.send(&api, &mut sessions, &notifier, "").await;
        assert_eq!(outcome, SendOutcome::Skipped);
        let outcome = controller.send(&api, &mut sessions, &notifier, "   ").await;
        assert_eq!(outcome, SendOutcome::Skipped);

        assert!(api.call_log().is_empty());
        assert_eq!(controller.transcript().len(), 1);
        assert!(notifier.errors().is_empty());
    }

    #[tokio::test]
    async fn test_send_auto_creates_session_and_keeps_optimistic_message() {
        let api = StubApi::new();
        api.on_create(Ok(test_session("fresh", "New Chat")));
        api.on_send(Ok(reply("hello there")));
        api.on_list(Ok(vec![test_session("fresh", "hello")]));

        let notifier = MemoryNotifier::new();
        let mut controller = ChatController::new();
        let mut sessions = SessionList::new();

        let outcome = controller.send(&api, &mut sessions, &notifier, "hello").await;
        assert_eq!(outcome, SendOutcome::Sent);
        assert_eq!(controller.active_id().unwrap().as_str(), "fresh");

        // The auto-created session's empty history was never fetched.
        assert!(!api.call_log().contains(&"history".to_string()));

        let contents: Vec<&str> = controller
            .transcript()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert!(contents.contains(&"hello"));
        assert!(contents.contains(&"hello there"));
    }

    #[tokio::test]
    async fn test_optimistic_message_survives_late_empty_history() {
        let api = StubApi::new();
        api.on_create(Ok(test_session("fresh", "New Chat")));

        let notifier = MemoryNotifier::new();
        let mut controller = ChatController::new();
        let mut sessions = SessionList::new();

        // Manufacture the race: a history fetch ticket grabbed before the
        // send would have been suppressed; a ticket from any earlier
        // generation resolves to empty after the optimistic append.
        let stale = controller.select_session(Some(SessionId::new("fresh")));
        assert!(stale.is_some());
        let stale = stale.unwrap();

        controller.select_session(None);
        let start = controller.begin_send(&api, &mut sessions, &notifier, "hello").await;
        assert!(matches!(start, SendStart::Started(_)));

        // The empty pre-send fetch resolves now — it must not wipe "hello".
        controller.apply_history(&stale, Ok(vec![]));
        let contents: Vec<&str> = controller
            .transcript()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert!(contents.contains(&"hello"));
    }

    #[tokio::test]
    async fn test_send_failure_appends_apology_and_notifies() {
        let api = StubApi::new();
        api.on_send(Err("502".into()));

        let notifier = MemoryNotifier::new();
        let mut controller = ChatController::new();
        let mut sessions = SessionList::new();
        controller.guard.arm();
        controller.select_session(Some(SessionId::new("s")));

        let outcome = controller.send(&api, &mut sessions, &notifier, "hi").await;
        assert_eq!(outcome, SendOutcome::Failed);

        let contents: Vec<&str> = controller
            .transcript()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert!(contents.contains(&"hi"), "user message must stay visible");
        assert!(contents.contains(&SEND_FAILURE_APOLOGY));
        assert_eq!(notifier.errors().len(), 1);
        assert_eq!(controller.phase(), ChatPhase::Idle);
    }

    #[tokio::test]
    async fn test_auto_create_failure_aborts_send() {
        let api = StubApi::new();
        api.on_create(Err("offline".into()));

        let notifier = MemoryNotifier::new();
        let mut controller = ChatController::new();
        let mut sessions = SessionList::new();

        let outcome = controller.send(&api, &mut sessions, &notifier, "hi").await;
        assert_eq!(outcome, SendOutcome::Failed);
        assert!(controller.active_id().is_none());
        // No optimistic append happened.
        assert_eq!(controller.transcript().len(), 1);
        assert_eq!(notifier.errors().len(), 1);
        // The message endpoint was never called.
        assert!(!api.call_log().contains(&"send_message".to_string()));
    }

    #[tokio::test]
    async fn test_reply_after_switching_away_is_suppressed() {
        let api = StubApi::new();
        let notifier = MemoryNotifier::new();
        let mut controller = ChatController::new();
        let mut sessions = SessionList::new();

        controller.guard.arm();
        controller.select_session(Some(SessionId::new("a")));
        let start = controller.begin_send(&api, &mut sessions, &notifier, "question").await;
        let ticket = match start {
            SendStart::Started(t) => t,
            other => panic!("expected Started, got {:?}", other),
        };

        // User switches to B while the send is in flight.
        controller.guard.arm();
        controller.select_session(Some(SessionId::new("b")));

        controller.complete_send(&ticket, Ok(reply("late answer")), &notifier);
        let contents: Vec<&str> = controller
            .transcript()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert!(!contents.contains(&"late answer"));
    }

    #[test]
    fn test_guard_suppresses_exactly_one_reload() {
        let mut controller = ChatController::new();
        controller.guard.arm();

        assert!(controller.select_session(Some(SessionId::new("a"))).is_none());
        // Second switch behaves normally.
        assert!(controller.select_session(Some(SessionId::new("b"))).is_some());
    }

    #[test]
    fn test_session_deleted_clears_active() {
        let mut controller = ChatController::new();
        controller.guard.arm();
        controller.select_session(Some(SessionId::new("a")));

        controller.session_deleted(&SessionId::new("a"));
        assert!(controller.active_id().is_none());
        assert_eq!(controller.transcript()[0].content, WELCOME_NO_SESSION);
    }

    #[test]
    fn test_session_deleted_ignores_other_sessions() {
        let mut controller = ChatController::new();
        controller.guard.arm();
        controller.select_session(Some(SessionId::new("a")));

        controller.session_deleted(&SessionId::new("b"));
        assert_eq!(controller.active_id().unwrap().as_str(), "a");
    }
}
