//! Single-flight coalescing for identical asynchronous operations.
//!
//! Implemented as a pending-operation registry - a map from operation key to
//! a shared result holder - rather than a lock. The contract is that callers
//! arriving while an operation is in flight observe the first caller's
//! result; which primitive enforces that is irrelevant to callers, and the
//! host environment may not even have true parallelism.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use tokio::sync::watch;

/// Deduplicates concurrent runs of the same keyed operation.
///
/// The first caller for a key executes the operation; every caller arriving
/// before it settles receives a clone of the same result. The entry clears
/// when the operation settles, so a later call starts a fresh run.
pub struct FlightRegistry<T: Clone> {
    pending: Mutex<HashMap<&'static str, watch::Receiver<Option<T>>>>,
}

enum Role<T> {
    Leader(watch::Sender<Option<T>>),
    Follower(watch::Receiver<Option<T>>),
}

impl<T: Clone> FlightRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Run `op` under `key`, or await the in-flight run of the same key.
    pub async fn run<F, Fut>(&self, key: &'static str, op: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let role = {
            let mut pending = self.pending.lock().unwrap();
            match pending.get(key) {
                Some(rx) => Role::Follower(rx.clone()),
                None => {
                    let (tx, rx) = watch::channel(None);
                    pending.insert(key, rx);
                    Role::Leader(tx)
                }
            }
        };

        match role {
            Role::Follower(mut rx) => {
                if let Ok(value) = rx.wait_for(|v| v.is_some()).await {
                    if let Some(result) = value.as_ref() {
                        return result.clone();
                    }
                }
                // The leader was dropped before settling; run uncoalesced.
                op().await
            }
            Role::Leader(tx) => {
                let result = op().await;
                self.pending.lock().unwrap().remove(key);
                let _ = tx.send(Some(result.clone()));
                result
            }
        }
    }
}

impl<T: Clone> Default for FlightRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
