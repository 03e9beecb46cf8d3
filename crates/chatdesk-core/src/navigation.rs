//! Keeping the address bar in step with the current session.
//!
//! The routing layer is represented by the [`Navigator`] trait. The
//! [`NavigationSynchronizer`] translates dashboard events into navigations
//! according to the page variant's [`PageConfig`], and reads the requested
//! session id back out of a location.

use crate::config::{IdSource, PageConfig};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use url::{Position, Url};

const LOCAL_ORIGIN: &str = "http://localhost/";

/// A location within the app: path plus optional query, e.g. `/chat/abc`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location(String);

impl Location {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Location {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// How a navigation treats the history stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationMode {
    /// Append a new history entry.
    Push,
    /// Overwrite the current history entry.
    Replace,
}

/// The routing layer as seen by the dashboard.
pub trait Navigator: Send + Sync {
    /// The location currently shown in the address bar.
    fn current(&self) -> Location;

    /// Moves the address bar to `location`.
    fn navigate(&self, location: Location, mode: NavigationMode);
}

/// Translates dashboard events into navigations.
///
/// | event              | navigation                                   |
/// |--------------------|----------------------------------------------|
/// | session updated    | id of that session, replace                  |
/// | session selected   | id of that session, push (see `PageConfig`)  |
/// | current deleted    | no id, same history policy as selection      |
/// | new session        | no id, same history policy as selection      |
pub struct NavigationSynchronizer {
    config: PageConfig,
    base: Url,
    navigator: Arc<dyn Navigator>,
}

impl NavigationSynchronizer {
    /// Creates a synchronizer for one page variant.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config.base_path` is not a valid
    /// path.
    pub fn new(config: PageConfig, navigator: Arc<dyn Navigator>) -> Result<Self> {
        let base = Url::parse(LOCAL_ORIGIN)?.join(&config.base_path)?;
        Ok(Self {
            config,
            base,
            navigator,
        })
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// The location showing `id`, or the bare page location for `None`.
    pub fn location_for(&self, id: Option<&str>) -> Location {
        let mut url = self.base.clone();
        url.set_query(None);

        if let Some(id) = id {
            match self.config.id_source {
                IdSource::Path => {
                    if let Ok(mut segments) = url.path_segments_mut() {
                        segments.pop_if_empty().push(id);
                    }
                }
                IdSource::Query => {
                    url.query_pairs_mut().append_pair(&self.config.query_key, id);
                }
            }
        }

        Location::new(&url[Position::BeforePath..])
    }

    /// Extracts the requested session id from `location`.
    ///
    /// Returns `None` when the location belongs to another page or carries an
    /// empty identifier.
    pub fn requested_id(&self, location: &Location) -> Option<String> {
        let url = self.base.join(location.as_str()).ok()?;

        let id = match self.config.id_source {
            IdSource::Path => {
                let base: Vec<&str> = non_empty_segments(&self.base);
                let path: Vec<&str> = url.path_segments()?.collect();
                if path.len() <= base.len() || path[..base.len()] != base[..] {
                    return None;
                }
                urlencoding::decode(path[base.len()]).ok()?.into_owned()
            }
            IdSource::Query => {
                if !same_path(&url, &self.base) {
                    return None;
                }
                url.query_pairs()
                    .find(|(key, _)| key == self.config.query_key.as_str())
                    .map(|(_, value)| value.into_owned())?
            }
        };

        (!id.is_empty()).then_some(id)
    }

    /// The id currently shown in the address bar.
    pub fn current_id(&self) -> Option<String> {
        self.requested_id(&self.navigator.current())
    }

    /// A conversational turn for `id` was persisted.
    pub fn session_updated(&self, id: &str) {
        self.go(self.location_for(Some(id)), NavigationMode::Replace);
    }

    /// The user picked `id` from the list.
    pub fn session_selected(&self, id: &str) {
        self.go(self.location_for(Some(id)), self.selection_mode());
    }

    /// No session is selected any more (deletion of the current one, or a
    /// new-session request).
    pub fn cleared(&self) {
        self.go(self.location_for(None), self.selection_mode());
    }

    fn selection_mode(&self) -> NavigationMode {
        if self.config.selection_writes_history {
            NavigationMode::Push
        } else {
            NavigationMode::Replace
        }
    }

    fn go(&self, target: Location, mode: NavigationMode) {
        if self.navigator.current() == target {
            return;
        }
        tracing::debug!("[NavigationSynchronizer] {:?} -> {}", mode, target);
        self.navigator.navigate(target, mode);
    }
}

/// Path equality ignoring a trailing slash.
fn same_path(a: &Url, b: &Url) -> bool {
    a.path().trim_end_matches('/') == b.path().trim_end_matches('/')
}

fn non_empty_segments(url: &Url) -> Vec<&str> {
    url.path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}
