//! Current-session resolution.
//!
//! The resolver decides which session the page is showing. A requested id is
//! looked up in the [`SessionStore`] first; when it is missing, the resolver
//! asks its driver to fetch it remotely and later folds the outcome back in
//! through [`CurrentSessionResolver::complete`].
//!
//! The resolver itself never awaits. The driver (the application layer) owns
//! the network call, which keeps the store free of borrows across suspension
//! points.

use super::model::Session;
use super::store::{SessionStore, StoreOp};
use crate::conversation::{RawConversation, normalize_conversation};
use crate::error::{ChatdeskError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Why a requested session could not be shown.
///
/// Both variants are terminal for the page view; nothing retries them.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolveFailure {
    /// The backend answered that the conversation does not exist.
    #[error("chat not found")]
    NotFound { id: String },
    /// The backend could not be reached or answered with an error.
    #[error("failed to load chat")]
    FetchFailed { id: String, reason: String },
}

impl ResolveFailure {
    pub fn id(&self) -> &str {
        match self {
            Self::NotFound { id } | Self::FetchFailed { id, .. } => id,
        }
    }
}

/// State of the current-session resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum Resolution {
    /// Nothing has been requested yet.
    #[default]
    Unresolved,
    /// A remote fetch for `id` is in flight.
    Resolving { id: String },
    /// The page shows this session.
    Resolved(Session),
    /// No session is selected.
    ResolvedNone,
    /// The requested session could not be shown.
    Failed(ResolveFailure),
}

impl Resolution {
    /// The session being shown, if resolution succeeded.
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Resolved(session) => Some(session),
            _ => None,
        }
    }

    /// The id the resolution is about, if any.
    pub fn target_id(&self) -> Option<&str> {
        match self {
            Self::Resolving { id } => Some(id),
            Self::Resolved(session) => Some(&session.id),
            Self::Failed(failure) => Some(failure.id()),
            Self::Unresolved | Self::ResolvedNone => None,
        }
    }

    pub fn is_resolving(&self) -> bool {
        matches!(self, Self::Resolving { .. })
    }
}

/// Handle for one outstanding remote fetch.
///
/// The epoch identifies the request that issued the fetch; a ticket from an
/// older request is ignored by [`CurrentSessionResolver::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveTicket {
    pub id: String,
    pub epoch: u64,
}

/// What the driver has to do after [`CurrentSessionResolver::begin`].
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveStep {
    /// Resolution finished synchronously.
    Settled(Resolution),
    /// The id is not in the store; fetch it and call `complete`.
    Fetch(ResolveTicket),
}

/// State machine deciding the current session.
#[derive(Debug, Clone, Default)]
pub struct CurrentSessionResolver {
    state: Resolution,
    epoch: u64,
}

impl CurrentSessionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &Resolution {
        &self.state
    }

    /// The session being shown, if any.
    pub fn current(&self) -> Option<&Session> {
        self.state.session()
    }

    /// Counter of resolution requests issued so far.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Starts resolving `requested` against `store`.
    ///
    /// - `None` settles on `ResolvedNone`.
    /// - An id present in the store settles on `Resolved`.
    /// - An unknown id moves to `Resolving` and asks for a fetch.
    ///
    /// Any fetch issued by an earlier call becomes stale.
    pub fn begin(&mut self, requested: Option<&str>, store: &SessionStore) -> ResolveStep {
        self.epoch += 1;

        let Some(id) = requested else {
            self.state = Resolution::ResolvedNone;
            return ResolveStep::Settled(self.state.clone());
        };

        if let Some(session) = store.get(id) {
            tracing::debug!("[Resolver] Resolved from store: id={}", id);
            self.state = Resolution::Resolved(session.clone());
            return ResolveStep::Settled(self.state.clone());
        }

        tracing::debug!("[Resolver] Not in store, fetching: id={}", id);
        self.state = Resolution::Resolving { id: id.to_string() };
        ResolveStep::Fetch(ResolveTicket {
            id: id.to_string(),
            epoch: self.epoch,
        })
    }

    /// Folds the outcome of a fallback fetch into the resolver and the store.
    ///
    /// On success the normalized session is inserted into `store`, unless the
    /// store already holds that id (for example because a bulk load finished
    /// first); then the store's copy is adopted and nothing is inserted.
    /// Failures leave the store untouched.
    ///
    /// Returns `None` without touching anything when the ticket is stale.
    pub fn complete(
        &mut self,
        ticket: &ResolveTicket,
        outcome: Result<Option<RawConversation>>,
        store: &mut SessionStore,
        now: DateTime<Utc>,
    ) -> Option<&Resolution> {
        if !self.is_pending(ticket) {
            tracing::debug!(
                "[Resolver] Dropping stale fetch result: id={}, epoch={} (current {})",
                ticket.id,
                ticket.epoch,
                self.epoch
            );
            return None;
        }

        self.state = match outcome {
            Ok(Some(raw)) => {
                let fetched = normalize_conversation(raw, now);
                Resolution::Resolved(merge_fetched(fetched, store))
            }
            Ok(None) => {
                tracing::warn!("[Resolver] Conversation not found: id={}", ticket.id);
                Resolution::Failed(ResolveFailure::NotFound {
                    id: ticket.id.clone(),
                })
            }
            Err(err) => {
                tracing::warn!("[Resolver] Fetch failed: id={}, error={}", ticket.id, err);
                Resolution::Failed(failure_from_error(&ticket.id, err))
            }
        };

        Some(&self.state)
    }

    /// Whether `ticket` belongs to the request currently in flight.
    pub fn is_pending(&self, ticket: &ResolveTicket) -> bool {
        ticket.epoch == self.epoch
            && matches!(&self.state, Resolution::Resolving { id } if *id == ticket.id)
    }

    /// Makes `session` current without consulting the store.
    pub fn adopt(&mut self, session: Session) {
        self.epoch += 1;
        self.state = Resolution::Resolved(session);
    }

    /// Forces `ResolvedNone`, invalidating any fetch in flight.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.state = Resolution::ResolvedNone;
    }

    /// Settles the requested id from `store` when it arrived there by other
    /// means (a bulk load landing around the fallback fetch).
    ///
    /// Applies while the id is `Resolving` or `Failed`: the store's copy
    /// becomes current and any outstanding ticket goes stale, so a late fetch
    /// result (success or failure) is dropped. Returns `true` if the state
    /// changed.
    pub fn settle_from_store(&mut self, store: &SessionStore) -> bool {
        let id = match &self.state {
            Resolution::Resolving { id } => id.as_str(),
            Resolution::Failed(failure) => failure.id(),
            _ => return false,
        };
        let Some(session) = store.get(id) else {
            return false;
        };

        tracing::debug!("[Resolver] Settled from store: id={}", id);
        self.epoch += 1;
        self.state = Resolution::Resolved(session.clone());
        true
    }

    /// Re-reads the current session from `store` after an in-place change
    /// (rename, replacement). A current session missing from the store is
    /// left as is.
    pub fn refresh(&mut self, store: &SessionStore) {
        if let Resolution::Resolved(current) = &mut self.state
            && let Some(latest) = store.get(&current.id)
        {
            *current = latest.clone();
        }
    }
}

fn merge_fetched(fetched: Session, store: &mut SessionStore) -> Session {
    match store.classify(&fetched.id) {
        StoreOp::Insert => {
            store.upsert(fetched.clone());
            fetched
        }
        StoreOp::ReplaceExisting => {
            tracing::debug!(
                "[Resolver] Session appeared while fetching, keeping store copy: id={}",
                fetched.id
            );
            store.get(&fetched.id).cloned().unwrap_or(fetched)
        }
    }
}

fn failure_from_error(id: &str, err: ChatdeskError) -> ResolveFailure {
    if err.is_not_found() {
        ResolveFailure::NotFound { id: id.to_string() }
    } else {
        ResolveFailure::FetchFailed {
            id: id.to_string(),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
    }

    fn raw(id: &str, title: &str) -> RawConversation {
        let mut raw = RawConversation::with_id(id);
        raw.title = Some(title.to_string());
        raw
    }

    fn ticket_of(step: ResolveStep) -> ResolveTicket {
        match step {
            ResolveStep::Fetch(ticket) => ticket,
            other => panic!("expected a fetch, got {:?}", other),
        }
    }

    #[test]
    fn test_no_identifier_resolves_to_none() {
        let store = SessionStore::new();
        let mut resolver = CurrentSessionResolver::new();
        assert_eq!(resolver.state(), &Resolution::Unresolved);

        let step = resolver.begin(None, &store);

        assert_eq!(step, ResolveStep::Settled(Resolution::ResolvedNone));
        assert!(resolver.current().is_none());
    }

    #[test]
    fn test_identifier_in_store_resolves_without_fetch() {
        let mut store = SessionStore::new();
        store.upsert(Session::new("abc", "Known", now()));
        let mut resolver = CurrentSessionResolver::new();

        let step = resolver.begin(Some("abc"), &store);

        assert!(matches!(step, ResolveStep::Settled(Resolution::Resolved(ref s)) if s.id == "abc"));
        assert_eq!(resolver.current().unwrap().title, "Known");
    }

    #[test]
    fn test_fallback_success_inserts_once() {
        let mut store = SessionStore::new();
        store.load(Vec::new());
        let mut resolver = CurrentSessionResolver::new();

        let ticket = ticket_of(resolver.begin(Some("abc"), &store));
        assert!(resolver.state().is_resolving());

        let state = resolver
            .complete(&ticket, Ok(Some(raw("abc", "Fetched"))), &mut store, now())
            .cloned();

        assert!(matches!(state, Some(Resolution::Resolved(ref s)) if s.id == "abc"));
        assert_eq!(store.ids(), vec!["abc"]);
    }

    #[test]
    fn test_fallback_not_found_leaves_store_unchanged() {
        let mut store = SessionStore::new();
        store.upsert(Session::new("other", "Other", now()));
        let mut resolver = CurrentSessionResolver::new();

        let ticket = ticket_of(resolver.begin(Some("missing"), &store));
        resolver.complete(&ticket, Ok(None), &mut store, now());

        match resolver.state() {
            Resolution::Failed(failure) => assert_eq!(failure.to_string(), "chat not found"),
            other => panic!("unexpected state {:?}", other),
        }
        assert_eq!(store.ids(), vec!["other"]);
    }

    #[test]
    fn test_fallback_transport_error_reports_load_failure() {
        let mut store = SessionStore::new();
        let mut resolver = CurrentSessionResolver::new();

        let ticket = ticket_of(resolver.begin(Some("abc"), &store));
        resolver.complete(
            &ticket,
            Err(ChatdeskError::transport("connection reset")),
            &mut store,
            now(),
        );

        match resolver.state() {
            Resolution::Failed(failure) => {
                assert_eq!(failure.to_string(), "failed to load chat");
                assert!(matches!(failure, ResolveFailure::FetchFailed { .. }));
            }
            other => panic!("unexpected state {:?}", other),
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_not_found_error_maps_to_not_found_failure() {
        let mut store = SessionStore::new();
        let mut resolver = CurrentSessionResolver::new();

        let ticket = ticket_of(resolver.begin(Some("abc"), &store));
        resolver.complete(
            &ticket,
            Err(ChatdeskError::not_found("Conversation", "abc")),
            &mut store,
            now(),
        );

        assert!(matches!(
            resolver.state(),
            Resolution::Failed(ResolveFailure::NotFound { .. })
        ));
    }

    #[test]
    fn test_session_added_while_resolving_is_adopted_not_duplicated() {
        let mut store = SessionStore::new();
        let mut resolver = CurrentSessionResolver::new();
        let ticket = ticket_of(resolver.begin(Some("abc"), &store));

        // Bulk load lands first and already contains the id.
        store.load(vec![Session::new("abc", "From list", now())]);

        resolver.complete(&ticket, Ok(Some(raw("abc", "From fetch"))), &mut store, now());

        assert_eq!(store.len(), 1);
        assert_eq!(resolver.current().unwrap().title, "From list");
    }

    #[test]
    fn test_store_arrival_settles_pending_fetch() {
        let mut store = SessionStore::new();
        let mut resolver = CurrentSessionResolver::new();
        let ticket = ticket_of(resolver.begin(Some("abc"), &store));

        store.load(vec![Session::new("abc", "From list", now())]);
        assert!(resolver.settle_from_store(&store));
        assert_eq!(resolver.current().unwrap().title, "From list");

        // The redundant fetch fails afterwards; its result is stale.
        assert!(
            resolver
                .complete(&ticket, Err(ChatdeskError::transport("reset")), &mut store, now())
                .is_none()
        );
        assert_eq!(resolver.current().unwrap().title, "From list");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_arrival_recovers_failed_fetch() {
        let mut store = SessionStore::new();
        let mut resolver = CurrentSessionResolver::new();
        let ticket = ticket_of(resolver.begin(Some("abc"), &store));
        resolver.complete(&ticket, Ok(None), &mut store, now());
        assert!(matches!(resolver.state(), Resolution::Failed(_)));

        store.load(vec![Session::new("abc", "From list", now())]);

        assert!(resolver.settle_from_store(&store));
        assert_eq!(resolver.current().unwrap().id, "abc");
    }

    #[test]
    fn test_settle_from_store_ignores_other_states() {
        let mut store = SessionStore::new();
        store.upsert(Session::new("abc", "Listed", now()));
        let mut resolver = CurrentSessionResolver::new();

        assert!(!resolver.settle_from_store(&store));
        let ticket = ticket_of(resolver.begin(Some("other"), &store));
        assert!(!resolver.settle_from_store(&store));
        assert!(resolver.is_pending(&ticket));
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut store = SessionStore::new();
        let mut resolver = CurrentSessionResolver::new();

        let first = ticket_of(resolver.begin(Some("first"), &store));
        let second = ticket_of(resolver.begin(Some("second"), &store));

        assert!(
            resolver
                .complete(&first, Ok(Some(raw("first", "x"))), &mut store, now())
                .is_none()
        );
        assert!(store.is_empty());
        assert!(resolver.is_pending(&second));
    }

    #[test]
    fn test_reset_invalidates_pending_fetch() {
        let mut store = SessionStore::new();
        let mut resolver = CurrentSessionResolver::new();
        let ticket = ticket_of(resolver.begin(Some("abc"), &store));

        resolver.reset();

        assert!(
            resolver
                .complete(&ticket, Ok(Some(raw("abc", "x"))), &mut store, now())
                .is_none()
        );
        assert_eq!(resolver.state(), &Resolution::ResolvedNone);
        assert!(store.is_empty());
    }

    #[test]
    fn test_refresh_picks_up_rename() {
        let mut store = SessionStore::new();
        store.upsert(Session::new("abc", "Before", now()));
        let mut resolver = CurrentSessionResolver::new();
        resolver.begin(Some("abc"), &store);

        store.rename("abc", "After");
        resolver.refresh(&store);

        assert_eq!(resolver.current().unwrap().title, "After");
    }

    #[test]
    fn test_failure_serializes_with_kind_tag() {
        let failure = ResolveFailure::NotFound {
            id: "abc".to_string(),
        };
        let json = serde_json::to_value(Resolution::Failed(failure)).unwrap();

        assert_eq!(json["state"], "failed");
        assert_eq!(json["detail"]["kind"], "not_found");
    }
}
