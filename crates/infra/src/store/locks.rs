use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::OwnedMutexGuard;

use super::ReservationKey;

type KeyMutex = Arc<tokio::sync::Mutex<()>>;

/// In-process async mutex per reservation key. Entries are removed once no
/// guard holds them and nobody is waiting.
#[derive(Clone, Default)]
pub(crate) struct KeyLocks {
    entries: Arc<Mutex<HashMap<ReservationKey, KeyMutex>>>,
}

impl KeyLocks {
    pub(crate) async fn acquire(&self, key: &ReservationKey) -> KeyGuard {
        let mutex = self
            .entries
            .lock()
            .entry(key.clone())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone();

        let guard = mutex.lock_owned().await;
        KeyGuard {
            locks: self.clone(),
            key: key.clone(),
            guard: Some(guard),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

pub(crate) struct KeyGuard {
    locks: KeyLocks,
    key: ReservationKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        self.guard.take();

        // Waiters clone the mutex under the map lock, so a count of one
        // means only the map still refers to it.
        let mut entries = self.locks.entries.lock();
        if entries
            .get(&self.key)
            .is_some_and(|m| Arc::strong_count(m) == 1)
        {
            entries.remove(&self.key);
        }
    }
}
