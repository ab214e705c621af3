//! Initialize-once primitive with single-flight semantics.
//!
//! [`InitOnce`] runs an async initializer at most once at a time. Concurrent callers join the
//! in-flight attempt and observe the same outcome (a clone of the value, or the same shared
//! error). Success is cached forever; failure is not, so the next call after a failed attempt
//! starts a fresh one. Store an `Arc` when callers must share one instance.
//!
//! The initializer runs on a detached `tokio` task: if every caller gives up (for example a
//! request timeout), the attempt still completes and publishes its value for later callers.


use std::future::Future;
use std::sync::{Arc, OnceLock};

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use tracing::debug;

type InitResult<T, E> = Result<T, Arc<E>>;
type InFlight<T, E> = Shared<BoxFuture<'static, InitResult<T, E>>>;

struct Inner<T, E> {
    value: OnceLock<T>,
    in_flight: Mutex<Option<InFlight<T, E>>>,
}

/// Lazily-initialized shared value; see the [module docs](self).
pub struct InitOnce<T, E> {
    inner: Arc<Inner<T, E>>,
}

impl<T, E> Clone for InitOnce<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, E> Default for InitOnce<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> std::fmt::Debug for InitOnce<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitOnce")
            .field("initialized", &self.inner.value.get().is_some())
            .field("in_flight", &self.inner.in_flight.lock().is_some())
            .finish()
    }
}

impl<T, E> InitOnce<T, E> {
    /// Creates an empty cell.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                value: OnceLock::new(),
                in_flight: Mutex::new(None),
            }),
        }
    }

    /// Returns the value if initialization has succeeded.
    pub fn get(&self) -> Option<T>
    where
        T: Clone,
    {
        self.inner.value.get().cloned()
    }

    /// Returns `true` once a value has been published.
    pub fn is_initialized(&self) -> bool {
        self.inner.value.get().is_some()
    }

    /// Returns `true` if an initialization attempt is currently running.
    pub fn is_in_flight(&self) -> bool {
        self.inner.in_flight.lock().is_some()
    }
}

impl<T, E> InitOnce<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: From<tokio::task::JoinError> + Send + Sync + 'static,
{
    /// Returns the cached value, or runs `init` (once across all concurrent callers).
    ///
    /// `init` is only invoked when no value is cached and no attempt is in flight.
    /// Must be called from within a `tokio` runtime.
    pub async fn get_or_try_init<F, Fut>(&self, init: F) -> InitResult<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        if let Some(value) = self.inner.value.get() {
            return Ok(value.clone());
        }

        let attempt = {
            let mut slot = self.inner.in_flight.lock();

            // Re-check under the lock: an attempt may have published between the fast path
            // and acquiring the slot.
            if let Some(value) = self.inner.value.get() {
                return Ok(value.clone());
            }

            match slot.as_ref() {
                Some(attempt) => {
                    debug!("Joining in-flight initialization");
                    attempt.clone()
                }
                None => {
                    debug!("Starting initialization");
                    let attempt = self.spawn_attempt(init());
                    *slot = Some(attempt.clone());
                    attempt
                }
            }
        };

        attempt.await
    }

    fn spawn_attempt<Fut>(&self, fut: Fut) -> InFlight<T, E>
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            // Clears the slot when the task ends, including by panic or cancellation,
            // whether or not any caller is still waiting.
            let _slot = ClearInFlight(Arc::clone(&inner));
            let result = fut.await.map_err(Arc::new);

            // Publish before the guard clears the slot so no caller can observe
            // "empty and unset" after a success.
            if let Ok(value) = &result {
                let _ = inner.value.set(value.clone());
            }
            result
        });

        async move {
            match task.await {
                Ok(result) => result,
                Err(join_err) => Err(Arc::new(E::from(join_err))),
            }
        }
        .boxed()
        .shared()
    }
}

struct ClearInFlight<T, E>(Arc<Inner<T, E>>);

impl<T, E> Drop for ClearInFlight<T, E> {
    fn drop(&mut self) {
        self.0.in_flight.lock().take();
    }
}
