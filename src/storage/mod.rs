use serde::{Deserialize, Serialize};

pub(crate) const TOKEN_KEY: &str = "token";
pub(crate) const NAME_KEY: &str = "name";

/// Authenticated identity as persisted between page loads.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Session {
    pub token: String,
    pub name: String,
}

/// Durable home of the session. Injected into `AppState` so tests can swap
/// the browser implementation for [`MemorySession`].
pub(crate) trait SessionStore: Send + Sync {
    fn load(&self) -> Option<Session>;
    fn save(&self, session: &Session);
    fn clear(&self);
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// `window.localStorage`, keys `token` and `name`.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BrowserSession;

impl SessionStore for BrowserSession {
    fn load(&self) -> Option<Session> {
        let storage = local_storage()?;
        let token = storage.get_item(TOKEN_KEY).ok().flatten()?;
        if token.trim().is_empty() {
            return None;
        }
        let name = storage.get_item(NAME_KEY).ok().flatten().unwrap_or_default();
        Some(Session { token, name })
    }

    fn save(&self, session: &Session) {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(TOKEN_KEY, &session.token);
            let _ = storage.set_item(NAME_KEY, &session.name);
        }
    }

    fn clear(&self) {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(TOKEN_KEY);
            let _ = storage.remove_item(NAME_KEY);
        }
    }
}

/// Key-value store with the same layout as `localStorage`, kept in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemorySession {
    entries: std::sync::Mutex<std::collections::BTreeMap<String, String>>,
}

#[cfg(test)]
impl MemorySession {
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().map(|e| e.is_empty()).unwrap_or(true)
    }
}

#[cfg(test)]
impl SessionStore for MemorySession {
    fn load(&self) -> Option<Session> {
        let token = self.get(TOKEN_KEY).filter(|t| !t.trim().is_empty())?;
        Some(Session {
            token,
            name: self.get(NAME_KEY).unwrap_or_default(),
        })
    }

    fn save(&self, session: &Session) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(TOKEN_KEY.to_string(), session.token.clone());
            entries.insert(NAME_KEY.to_string(), session.name.clone());
        }
    }

    fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(TOKEN_KEY);
            entries.remove(NAME_KEY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_session_roundtrip() {
        let store = MemorySession::default();
        assert!(store.load().is_none());

        store.save(&Session {
            token: "t1".to_string(),
            name: "Ann".to_string(),
        });
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("t1"));
        assert_eq!(store.get(NAME_KEY).as_deref(), Some("Ann"));
        assert_eq!(store.load().map(|s| s.name), Some("Ann".to_string()));

        store.clear();
        assert!(store.load().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_blank_token_is_not_a_session() {
        let store = MemorySession::default();
        store.save(&Session {
            token: "  ".to_string(),
            name: "Ann".to_string(),
        });
        assert!(store.load().is_none());
    }
}
