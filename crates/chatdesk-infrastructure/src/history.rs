//! In-process browser history.
//!
//! `InMemoryHistory` behaves like a browser's session history: `Push`
//! truncates any forward entries and appends, `Replace` overwrites the
//! current entry, and `back`/`forward` move the cursor without navigating.

use chatdesk_core::navigation::{Location, NavigationMode, Navigator};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug)]
struct Entries {
    stack: Vec<Location>,
    cursor: usize,
}

/// History stack implementing [`Navigator`].
#[derive(Debug)]
pub struct InMemoryHistory {
    entries: Mutex<Entries>,
}

impl InMemoryHistory {
    /// Starts a history whose only entry is `initial`.
    pub fn new(initial: Location) -> Self {
        Self {
            entries: Mutex::new(Entries {
                stack: vec![initial],
                cursor: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Steps one entry back. Returns the new current location, or `None` at
    /// the oldest entry.
    pub fn back(&self) -> Option<Location> {
        let mut entries = self.lock();
        if entries.cursor == 0 {
            return None;
        }
        entries.cursor -= 1;
        Some(entries.stack[entries.cursor].clone())
    }

    /// Steps one entry forward. Returns the new current location, or `None`
    /// at the newest entry.
    pub fn forward(&self) -> Option<Location> {
        let mut entries = self.lock();
        if entries.cursor + 1 >= entries.stack.len() {
            return None;
        }
        entries.cursor += 1;
        Some(entries.stack[entries.cursor].clone())
    }

    /// Number of entries in the stack.
    pub fn len(&self) -> usize {
        self.lock().stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().stack.is_empty()
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> Vec<Location> {
        self.lock().stack.clone()
    }
}

impl Navigator for InMemoryHistory {
    fn current(&self) -> Location {
        let entries = self.lock();
        entries.stack[entries.cursor].clone()
    }

    fn navigate(&self, location: Location, mode: NavigationMode) {
        let mut entries = self.lock();
        match mode {
            NavigationMode::Push => {
                let keep = entries.cursor + 1;
                entries.stack.truncate(keep);
                entries.stack.push(location);
                entries.cursor = keep;
            }
            NavigationMode::Replace => {
                let cursor = entries.cursor;
                entries.stack[cursor] = location;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_appends_and_replace_overwrites() {
        let history = InMemoryHistory::new("/chat".into());

        history.navigate("/chat/a".into(), NavigationMode::Push);
        history.navigate("/chat/b".into(), NavigationMode::Replace);

        assert_eq!(
            history.entries(),
            vec![Location::from("/chat"), Location::from("/chat/b")]
        );
        assert_eq!(history.current(), Location::from("/chat/b"));
    }

    #[test]
    fn test_back_and_forward() {
        let history = InMemoryHistory::new("/chat".into());
        history.navigate("/chat/a".into(), NavigationMode::Push);
        history.navigate("/chat/b".into(), NavigationMode::Push);

        assert_eq!(history.back(), Some(Location::from("/chat/a")));
        assert_eq!(history.back(), Some(Location::from("/chat")));
        assert_eq!(history.back(), None);
        assert_eq!(history.forward(), Some(Location::from("/chat/a")));
        assert_eq!(history.current(), Location::from("/chat/a"));
    }

    #[test]
    fn test_push_after_back_drops_forward_entries() {
        let history = InMemoryHistory::new("/chat".into());
        history.navigate("/chat/a".into(), NavigationMode::Push);
        history.navigate("/chat/b".into(), NavigationMode::Push);
        history.back();

        history.navigate("/chat/c".into(), NavigationMode::Push);

        assert_eq!(history.len(), 3);
        assert_eq!(history.forward(), None);
        assert_eq!(history.current(), Location::from("/chat/c"));
    }
}
