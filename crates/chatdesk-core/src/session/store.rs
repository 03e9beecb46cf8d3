//! Ordered in-memory session list.
//!
//! `SessionStore` holds every session known to one page view. Order is
//! `updated_at` descending, except that a session inserted for the first time
//! is pinned to the front until the next re-sort.

use super::model::Session;
use serde::Serialize;

/// The merge policy applied by [`SessionStore::upsert`].
///
/// Which policy runs is decided once, up front, by [`SessionStore::classify`]
/// and then applied explicitly, so callers can log and assert on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreOp {
    /// The id is unseen: place the session at index 0 without sorting.
    Insert,
    /// The id is known: replace the entry and re-sort the whole list.
    ReplaceExisting,
}

/// In-memory ordered collection of sessions.
///
/// All operations are synchronous and total. Targeting an id that is not
/// present is a silent no-op.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Vec<Session>,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the entire list with `sessions`, sorted by `updated_at`
    /// descending.
    ///
    /// Duplicate ids in the input keep their first occurrence after sorting.
    pub fn load(&mut self, sessions: Vec<Session>) {
        let mut sessions = sessions;
        sort_by_recency(&mut sessions);

        let mut seen = std::collections::HashSet::new();
        sessions.retain(|session| seen.insert(session.id.clone()));

        tracing::debug!("[SessionStore] Loaded {} sessions", sessions.len());
        self.sessions = sessions;
    }

    /// Decides which merge policy an upsert of `id` would use.
    pub fn classify(&self, id: &str) -> StoreOp {
        if self.contains(id) {
            StoreOp::ReplaceExisting
        } else {
            StoreOp::Insert
        }
    }

    /// Merges `session` into the list and returns the policy that was applied.
    pub fn upsert(&mut self, session: Session) -> StoreOp {
        let op = self.classify(&session.id);
        self.apply(op, session);
        op
    }

    fn apply(&mut self, op: StoreOp, session: Session) {
        match op {
            StoreOp::Insert => {
                tracing::debug!("[SessionStore] Insert at front: id={}", session.id);
                self.sessions.insert(0, session);
            }
            StoreOp::ReplaceExisting => {
                tracing::debug!("[SessionStore] Replace and re-sort: id={}", session.id);
                if let Some(slot) = self.sessions.iter_mut().find(|s| s.id == session.id) {
                    *slot = session;
                }
                sort_by_recency(&mut self.sessions);
            }
        }
    }

    /// Removes the session with `id`, returning it if it was present.
    pub fn remove(&mut self, id: &str) -> Option<Session> {
        let index = self.position(id)?;
        tracing::debug!("[SessionStore] Removed: id={}", id);
        Some(self.sessions.remove(index))
    }

    /// Changes the title of the session with `id` in place.
    ///
    /// Neither `updated_at` nor the list position changes. Returns `false`
    /// when no such session exists.
    pub fn rename(&mut self, id: &str, title: impl Into<String>) -> bool {
        match self.sessions.iter_mut().find(|s| s.id == id) {
            Some(session) => {
                session.title = title.into();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Index of the session with `id` in iteration order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.sessions.iter().position(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter()
    }

    /// The sessions in display order.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// The session ids in display order.
    pub fn ids(&self) -> Vec<String> {
        self.sessions.iter().map(|s| s.id.clone()).collect()
    }
}

// Stable, so sessions with equal timestamps keep their relative order.
fn sort_by_recency(sessions: &mut [Session]) {
    sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}
