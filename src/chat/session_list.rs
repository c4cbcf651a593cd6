//! Sidebar session collection with pin and recency grouping
//!
//! This module owns the ordered list of chat sessions and its derived views:
//! pinned sessions first, unpinned sessions partitioned into five fixed
//! recency buckets. Mutations follow a remote-first rule — local state only
//! commits after the backend confirms, so a failed call never leaves the
//! client claiming success the server never saw. The one exception is the
//! list refresh, which fails silently and keeps the previous state.

use crate::api::{CampusApi, ChatSession, SessionId, SessionPatch};
use crate::error::Result;

use chrono::{DateTime, Utc};
use std::fmt;

/// Milliseconds per whole day, used for bucket classification.
const DAY_MS: i64 = 86_400_000;

/// Recency bucket for unpinned sessions.
///
/// Computed from the whole-day difference between "now" and the session's
/// last activity (`updated_at` falling back to `created_at`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeBucket {
    Today,
    Yesterday,
    ThisWeek,
    ThisMonth,
    Older,
}

/// Fixed render order for the grouped sidebar sections.
pub const BUCKET_ORDER: [TimeBucket; 5] = [
    TimeBucket::Today,
    TimeBucket::Yesterday,
    TimeBucket::ThisWeek,
    TimeBucket::ThisMonth,
    TimeBucket::Older,
];

impl TimeBucket {
    /// Classify a timestamp relative to `now`.
    ///
    /// Day difference is floor(ms / 86400000): 0 is Today, 1 Yesterday,
    /// 2-6 This Week, 7-29 This Month, 30 and beyond Older. Timestamps in
    /// the future (negative difference) clamp to Today.
    pub fn classify(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let days = (now - timestamp).num_milliseconds().div_euclid(DAY_MS);
        match days {
            d if d <= 0 => Self::Today,
            1 => Self::Yesterday,
            2..=6 => Self::ThisWeek,
            7..=29 => Self::ThisMonth,
            _ => Self::Older,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
            Self::ThisWeek => "This Week",
            Self::ThisMonth => "This Month",
            Self::Older => "Older",
        }
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered collection of the signed-in user's chat sessions.
///
/// The list preserves backend order (newest first) except that pinned
/// sessions always sort before unpinned ones. Derived views are recomputed
/// from the current list on every call; nothing is cached.
#[derive(Debug, Default)]
pub struct SessionList {
    sessions: Vec<ChatSession>,
}

impl SessionList {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn from_sessions(sessions: Vec<ChatSession>) -> Self {
        Self { sessions }
    }

    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn get(&self, id: &SessionId) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| &s.id == id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Refresh the list from the backend.
    ///
    /// A failed fetch keeps the previous list — a backend outage must not
    /// blank the sidebar or block the rest of the screen.
    pub async fn load_all(&mut self, api: &dyn CampusApi) {
        match api.list_sessions().await {
            Ok(sessions) => self.sessions = sessions,
            Err(e) => tracing::warn!("session list refresh failed: {}", e),
        }
    }

    /// Create a new session and prepend it (newest first).
    ///
    /// Local state is untouched when the backend call fails.
    pub async fn create(&mut self, api: &dyn CampusApi) -> Result<ChatSession> {
        let session = api.create_session().await?;
        self.sessions.insert(0, session.clone());
        Ok(session)
    }

    /// Rename a session remotely, then locally.
    ///
    /// No optimistic rename: on failure the in-memory title is unchanged.
    pub async fn rename(&mut self, api: &dyn CampusApi, id: &SessionId, title: &str) -> Result<()> {
        api.update_session(id, &SessionPatch::title(title)).await?;
        if let Some(session) = self.sessions.iter_mut().find(|s| &s.id == id) {
            session.title = title.to_string();
        }
        Ok(())
    }

    /// Update pin state remotely, then locally, then re-sort so pinned
    /// sessions come first (stable among equals).
    pub async fn set_pinned(
        &mut self,
        api: &dyn CampusApi,
        id: &SessionId,
        pinned: bool,
    ) -> Result<()> {
        api.update_session(id, &SessionPatch::pinned(pinned)).await?;
        if let Some(session) = self.sessions.iter_mut().find(|s| &s.id == id) {
            session.is_pinned = pinned;
        }
        self.sessions.sort_by_key(|s| !s.is_pinned);
        Ok(())
    }

    /// Delete a session remotely, then remove it locally.
    ///
    /// The caller is responsible for clearing the active-session reference
    /// when the deleted session was active.
    pub async fn delete(&mut self, api: &dyn CampusApi, id: &SessionId) -> Result<()> {
        api.delete_session(id).await?;
        self.sessions.retain(|s| &s.id != id);
        Ok(())
    }

    /// Wipe every session remotely, then locally.
    pub async fn clear(&mut self, api: &dyn CampusApi) -> Result<()> {
        api.clear_history().await?;
        self.sessions.clear();
        Ok(())
    }

    /// Pinned sessions in list order.
    pub fn pinned(&self) -> Vec<&ChatSession> {
        self.sessions.iter().filter(|s| s.is_pinned).collect()
    }

    /// Unpinned sessions partitioned into recency buckets, in fixed render
    /// order, empty buckets omitted.
    pub fn grouped(&self, now: DateTime<Utc>) -> Vec<(TimeBucket, Vec<&ChatSession>)> {
        BUCKET_ORDER
            .iter()
            .filter_map(|bucket| {
                let members: Vec<&ChatSession> = self
                    .sessions
                    .iter()
                    .filter(|s| {
                        !s.is_pinned && TimeBucket::classify(s.effective_timestamp(), now) == *bucket
                    })
                    .collect();
                if members.is_empty() {
                    None
                } else {
                    Some((*bucket, members))
                }
            })
            .collect()
    }
}
