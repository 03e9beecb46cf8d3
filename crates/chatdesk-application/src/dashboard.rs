//! Session dashboard use case.
//!
//! `SessionDashboard` owns everything one page view knows about sessions: the
//! ordered [`SessionStore`], the [`CurrentSessionResolver`] and the
//! [`NavigationSynchronizer`]. It drives the two backend calls and folds their
//! results back in, and exposes the mutation entry points used by the
//! presentation layer.
//!
//! # Concurrency
//!
//! The bulk load and a fallback fetch may be in flight at the same time and
//! may finish in either order. State lives behind one `RwLock` that is only
//! held for synchronous store/resolver mutations, never across a network call.
//! Uniqueness of session ids is guaranteed by the store alone.
//!
//! After [`SessionDashboard::teardown`], results that arrive late are dropped
//! and every entry point becomes a no-op.

use chatdesk_core::config::PageConfig;
use chatdesk_core::conversation::{ConversationSource, normalize_all};
use chatdesk_core::error::Result;
use chatdesk_core::navigation::{Location, NavigationSynchronizer, Navigator};
use chatdesk_core::session::{
    CurrentSessionResolver, Resolution, ResolveStep, ResolveTicket, Session, SessionEvent,
    SessionStore, StoreOp,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};
use tokio_util::sync::CancellationToken;

/// Mutable state of one page view.
#[derive(Debug, Default)]
struct DashboardState {
    store: SessionStore,
    resolver: CurrentSessionResolver,
    list_loading: bool,
    list_load_failed: bool,
}

/// Snapshot handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// Sessions in display order.
    pub sessions: Vec<Session>,
    /// The session being viewed, if any.
    pub current: Option<Session>,
    pub resolution: Resolution,
    /// The bulk load is in flight.
    pub is_loading_list: bool,
    /// A fallback fetch is in flight.
    pub is_resolving: bool,
    /// The bulk load failed and the list is shown empty.
    pub list_load_failed: bool,
    /// Message for a terminal resolution failure.
    pub error: Option<String>,
}

/// Use case coordinating the session list, the current session and the
/// address bar for one page view.
pub struct SessionDashboard {
    state: Arc<RwLock<DashboardState>>,
    source: Arc<dyn ConversationSource>,
    synchronizer: NavigationSynchronizer,
    /// Cancelled on teardown.
    lifetime: CancellationToken,
    /// Completed by the first (and only) bulk load.
    bulk_load: OnceCell<()>,
}

impl SessionDashboard {
    /// Creates the dashboard for one page view.
    ///
    /// # Arguments
    ///
    /// * `source` - Backend conversation store
    /// * `navigator` - Routing layer owning the address bar
    /// * `page` - Page variant (where the id lives, history policy)
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `page.base_path` is invalid.
    pub fn new(
        source: Arc<dyn ConversationSource>,
        navigator: Arc<dyn Navigator>,
        page: PageConfig,
    ) -> Result<Self> {
        Ok(Self {
            state: Arc::new(RwLock::new(DashboardState::default())),
            source,
            synchronizer: NavigationSynchronizer::new(page, navigator)?,
            lifetime: CancellationToken::new(),
            bulk_load: OnceCell::new(),
        })
    }

    pub fn synchronizer(&self) -> &NavigationSynchronizer {
        &self.synchronizer
    }

    /// Page mount: starts the bulk load (first call only) and resolves the
    /// identifier currently in the address bar, concurrently.
    pub async fn mount(&self) {
        if self.is_torn_down() {
            return;
        }
        let requested = self.synchronizer.current_id();
        tracing::info!(
            "[SessionDashboard] Mounting ({} variant), requested={:?}",
            self.synchronizer.config().id_source,
            requested
        );

        tokio::join!(
            self.bulk_load.get_or_init(|| self.load_sessions()),
            self.resolve(requested)
        );
    }

    /// The address bar changed (back/forward, typed URL, route change).
    pub async fn on_location_changed(&self, location: &Location) -> Resolution {
        if self.is_torn_down() {
            return self.resolution().await;
        }
        let requested = self.synchronizer.requested_id(location);
        tracing::debug!(
            "[SessionDashboard] Location changed to {}, requested={:?}",
            location,
            requested
        );
        self.resolve(requested).await
    }

    /// The user picked a session from the list.
    ///
    /// Appends a history entry (or replaces it, depending on the page
    /// variant) and resolves the id.
    pub async fn select(&self, id: &str) -> Resolution {
        if self.is_torn_down() {
            return self.resolution().await;
        }
        tracing::info!("[SessionDashboard] Select session: {}", id);
        self.synchronizer.session_selected(id);
        self.resolve(Some(id.to_string())).await
    }

    /// Deletes a session from the list.
    ///
    /// Deleting the current session (or the one being resolved) clears the
    /// current-session state and the address bar identifier. Deleting an
    /// unknown id is a no-op.
    pub async fn delete(&self, id: &str) {
        if self.is_torn_down() {
            return;
        }

        let was_current = {
            let mut state = self.state.write().await;
            let removed = state.store.remove(id).is_some();
            let was_current = state.resolver.state().target_id() == Some(id);
            if was_current {
                state.resolver.reset();
            }
            tracing::info!(
                "[SessionDashboard] Delete session: {} (removed={}, was_current={})",
                id,
                removed,
                was_current
            );
            was_current
        };

        if was_current {
            self.synchronizer.cleared();
        }
    }

    /// Renames a session in place. Returns `false` if the id is unknown.
    pub async fn rename(&self, id: &str, title: &str) -> bool {
        if self.is_torn_down() {
            return false;
        }

        let mut state = self.state.write().await;
        let DashboardState {
            store, resolver, ..
        } = &mut *state;
        let renamed = store.rename(id, title);
        if renamed {
            resolver.refresh(store);
            tracing::info!("[SessionDashboard] Renamed session {} to {:?}", id, title);
        }
        renamed
    }

    /// "New chat": nothing is selected until the chat surface reports the
    /// first completed turn.
    pub async fn new_session(&self) {
        if self.is_torn_down() {
            return;
        }
        tracing::info!("[SessionDashboard] New session requested");
        self.state.write().await.resolver.reset();
        self.synchronizer.cleared();
    }

    /// Merges a replacement session published by the chat surface.
    ///
    /// The session becomes current and the address bar is replaced (not
    /// pushed) with its id. Returns the store policy that was applied, or
    /// `None` after teardown.
    pub async fn on_session_updated(&self, event: SessionEvent) -> Option<StoreOp> {
        if self.is_torn_down() {
            return None;
        }

        let session = event.into_session();
        let id = session.id.clone();
        let op = {
            let mut state = self.state.write().await;
            let op = state.store.upsert(session.clone());
            let current = state.store.get(&id).cloned().unwrap_or(session);
            state.resolver.adopt(current);
            op
        };
        tracing::debug!("[SessionDashboard] Session updated: id={}, op={:?}", id, op);

        self.synchronizer.session_updated(&id);
        Some(op)
    }

    /// Ends the page view. In-flight fetches are abandoned and their results
    /// never reach the store.
    pub fn teardown(&self) {
        if !self.lifetime.is_cancelled() {
            tracing::info!("[SessionDashboard] Teardown");
            self.lifetime.cancel();
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    /// Snapshot for rendering.
    pub async fn view(&self) -> DashboardView {
        let state = self.state.read().await;
        let resolution = state.resolver.state().clone();
        let error = match &resolution {
            Resolution::Failed(failure) => Some(failure.to_string()),
            _ => None,
        };

        DashboardView {
            sessions: state.store.sessions().to_vec(),
            current: resolution.session().cloned(),
            is_resolving: resolution.is_resolving(),
            is_loading_list: state.list_loading,
            list_load_failed: state.list_load_failed,
            error,
            resolution,
        }
    }

    pub async fn sessions(&self) -> Vec<Session> {
        self.state.read().await.store.sessions().to_vec()
    }

    pub async fn current(&self) -> Option<Session> {
        self.state.read().await.resolver.current().cloned()
    }

    pub async fn resolution(&self) -> Resolution {
        self.state.read().await.resolver.state().clone()
    }

    // ========================================================================
    // Internal
    // ========================================================================

    async fn load_sessions(&self) {
        self.state.write().await.list_loading = true;

        let result = tokio::select! {
            _ = self.lifetime.cancelled() => {
                tracing::debug!("[SessionDashboard] Bulk load abandoned by teardown");
                return;
            }
            result = self.source.list_conversations() => result,
        };

        let (sessions, failed) = match result {
            Ok(list) => (normalize_all(list.conversations, Utc::now()), false),
            Err(err) => {
                tracing::warn!(
                    "[SessionDashboard] Failed to list conversations, showing empty list: {}",
                    err
                );
                (Vec::new(), true)
            }
        };

        if self.is_torn_down() {
            return;
        }

        let mut state = self.state.write().await;
        let DashboardState {
            store,
            resolver,
            list_loading,
            list_load_failed,
        } = &mut *state;

        store.load(sessions);
        resolver.settle_from_store(store);
        // A fallback fetch may have merged the current session already; keep
        // it in the list even if the bulk response does not contain it.
        if let Some(current) = resolver.current()
            && !store.contains(&current.id)
        {
            store.upsert(current.clone());
        }
        resolver.refresh(store);

        *list_loading = false;
        *list_load_failed = failed;
        tracing::info!("[SessionDashboard] Loaded {} sessions", store.len());
    }

    async fn resolve(&self, requested: Option<String>) -> Resolution {
        let step = {
            let mut state = self.state.write().await;
            let DashboardState {
                store, resolver, ..
            } = &mut *state;
            resolver.begin(requested.as_deref(), store)
        };

        match step {
            ResolveStep::Settled(resolution) => resolution,
            ResolveStep::Fetch(ticket) => self.fetch_fallback(ticket).await,
        }
    }

    async fn fetch_fallback(&self, ticket: ResolveTicket) -> Resolution {
        let outcome = tokio::select! {
            _ = self.lifetime.cancelled() => {
                tracing::debug!(
                    "[SessionDashboard] Fallback fetch for {} abandoned by teardown",
                    ticket.id
                );
                return self.resolution().await;
            }
            outcome = self.source.get_conversation(&ticket.id) => outcome,
        };

        if self.is_torn_down() {
            return self.resolution().await;
        }

        let mut state = self.state.write().await;
        let DashboardState {
            store, resolver, ..
        } = &mut *state;
        resolver.complete(&ticket, outcome, store, Utc::now());
        resolver.state().clone()
    }
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
