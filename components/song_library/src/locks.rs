use file_area::SongId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Registry = Arc<Mutex<HashMap<SongId, Arc<AsyncMutex<()>>>>>;

/// One async mutex per song id, created on demand
///
/// Entries are dropped again once nobody holds or waits for them.
#[derive(Default, Clone)]
pub struct KeyedLocks {
    registry: Registry,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, id: &SongId) -> KeyGuard {
        let mutex = {
            let mut registry = self.registry.lock();
            // Waiters that gave up leave entries only the registry refers to.
            registry.retain(|_, m| Arc::strong_count(m) > 1);
            Arc::clone(registry.entry(id.clone()).or_default())
        };

        let guard = mutex.lock_owned().await;
        KeyGuard {
            id: id.clone(),
            registry: Arc::clone(&self.registry),
            guard: Some(guard),
        }
    }

    /// Number of ids currently locked or waited on
    #[cfg(test)]
    pub fn active(&self) -> usize {
        self.registry.lock().len()
    }
}

pub struct KeyGuard {
    id: SongId,
    registry: Registry,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        let mut registry = self.registry.lock();
        drop(self.guard.take());
        if registry
            .get(&self.id)
            .is_some_and(|m| Arc::strong_count(m) == 1)
        {
            registry.remove(&self.id);
        }
    }
}
