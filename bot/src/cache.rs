//! The report cache.
//!
//! Maps session ids to the page sequence of one completed lookup. Sessions
//! are written once and read many times by pagination; nothing is ever
//! evicted, so a restart is the only way a session disappears — pagination
//! against a missing id renders as an expired session.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use eagle_core::SessionId;

/// Process-local cache of paginated reports.
#[derive(Default)]
pub struct ReportCache {
    sessions: RwLock<HashMap<SessionId, Arc<Vec<String>>>>,
}

impl ReportCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the pages for a fresh session.
    pub fn store(&self, session: SessionId, pages: Vec<String>) {
        self.sessions
            .write()
            .expect("report cache lock poisoned")
            .insert(session, Arc::new(pages));
    }

    /// Fetch the pages for a session, or `None` if it is no longer cached.
    #[must_use]
    pub fn fetch(&self, session: SessionId) -> Option<Arc<Vec<String>>> {
        self.sessions
            .read()
            .expect("report cache lock poisoned")
            .get(&session)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_then_fetch() {
        let cache = ReportCache::new();
        let session = SessionId::generate();
        cache.store(session, vec!["page one".into(), "page two".into()]);

        let pages = cache.fetch(session).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0], "page one");
    }

    #[test]
    fn missing_session_is_none() {
        let cache = ReportCache::new();
        assert!(cache.fetch(SessionId::generate()).is_none());
    }

    #[test]
    fn sessions_are_independent() {
        let cache = ReportCache::new();
        let a = SessionId::generate();
        let b = SessionId::generate();
        cache.store(a, vec!["a".into()]);
        cache.store(b, vec!["b".into()]);

        assert_eq!(cache.fetch(a).unwrap()[0], "a");
        assert_eq!(cache.fetch(b).unwrap()[0], "b");
    }
}
