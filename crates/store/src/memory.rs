//! In-memory session store backed by a `HashMap` behind an `RwLock`.

use async_trait::async_trait;
use calgate_types::{SessionStore, error::Result};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

struct Entry {
    value: String,
    deadline: Instant,
}

/// An in-memory [`SessionStore`] implementation for testing and ephemeral use.
///
/// Expiry is enforced lazily: an entry past its deadline reads as absent.
pub struct InMemorySessionStore {
    data: RwLock<HashMap<String, Entry>>,
}

impl InMemorySessionStore {
    /// Creates a new empty in-memory session store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let data = self.data.read().unwrap();
        Ok(data
            .get(key)
            .filter(|e| Instant::now() < e.deadline)
            .map(|e| e.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut data = self.data.write().unwrap();
        data.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                deadline: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.data.write().unwrap().remove(key);
        Ok(())
    }
}
