//! # Seatbook Runtime
//!
//! Runtime implementation for Seatbook reducers.
//!
//! This crate provides the [`Store`], which owns a piece of state and is the
//! single writer for it: every action is reduced while holding the state's
//! write lock, so concurrent `send` calls are applied one at a time. A
//! reservation check and the append that follows it therefore can never
//! interleave with another request against the same state.
//!
//! ## Core Components
//!
//! - **Store**: Manages state, runs the reducer and executes effects
//! - **Outcome waiters**: `send_and_wait_for` callers each get their own
//!   reply channel, filled by the first effect-produced action they match
//! - **Action broadcast**: Actions produced by effects are also published
//!   to any observers
//! - **Metrics**: Prometheus counters and histograms for the store
//!
//! ## Example
//!
//! ```ignore
//! use seatbook_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

/// Prometheus metrics for observability
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for terminal action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received.
        #[error("Timeout waiting for action")]
        Timeout,

        /// The store dropped a waiter before a matching action arrived
        #[error("Action channel closed")]
        ChannelClosed,
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use crate::error::StoreError;
    use seatbook_core::{effect::Effect, reducer::Reducer};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Arc;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::{Mutex, RwLock, broadcast, oneshot};

    /// Default number of actions buffered for slow observers
    const DEFAULT_BROADCAST_CAPACITY: usize = 64;

    /// Decrements the pending-effects counter when a spawned effect finishes
    struct PendingGuard(Arc<AtomicUsize>);

    impl Drop for PendingGuard {
        fn drop(&mut self) {
            self.0.fetch_sub(1, Ordering::SeqCst);
        }
    }

    /// A caller of `send_and_wait_for` waiting for its result action
    struct Waiter<A> {
        matches: Box<dyn Fn(&A) -> bool + Send + Sync>,
        reply: oneshot::Sender<A>,
    }

    type Waiters<A> = Arc<Mutex<HashMap<u64, Waiter<A>>>>;

    /// The Store - runtime for reducers
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    ///
    /// Clones share the same state, broadcast channel and shutdown flag.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        /// Request/response callers, keyed by registration order
        waiters: Waiters<A>,
        next_waiter: Arc<AtomicU64>,
        /// Actions produced by effects, for observers
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_broadcast_capacity(
                initial_state,
                reducer,
                environment,
                DEFAULT_BROADCAST_CAPACITY,
            )
        }

        /// Create a new Store with custom action broadcast capacity
        ///
        /// Increase the capacity if observers frequently lag.
        #[must_use]
        pub fn with_broadcast_capacity(
            initial_state: S,
            reducer: R,
            environment: E,
            capacity: usize,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                waiters: Arc::new(Mutex::new(HashMap::new())),
                next_waiter: Arc::new(AtomicU64::new(0)),
                action_broadcast,
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Releases the lock and starts the returned effects
        ///
        /// Multiple concurrent `send()` calls serialize at the reducer.
        /// `send()` returns after starting effect execution, not completion.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store.commands.total").increment(1);

            let effects = {
                let mut state = self.state.write().await;
                tracing::trace!("Acquired write lock on state");

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                effects
            };

            tracing::trace!("Reducer returned {} effects", effects.len());
            for effect in effects {
                self.execute_effect(effect);
            }

            Ok(())
        }

        /// Send an action and wait for a matching result action
        ///
        /// Registers a waiter before sending, so a result produced
        /// immediately by an effect is never missed. Returns the first
        /// effect-produced action for which `predicate` is true.
        ///
        /// Each waiter has its own reply channel: the result is delivered no
        /// matter how many other actions the store produces meanwhile.
        /// Only actions produced by effects are matched, not `action`
        /// itself. Use correlation IDs to tell concurrent requests apart.
        ///
        /// # Errors
        ///
        /// - [`StoreError::ShutdownInProgress`]: Store is shutting down
        /// - [`StoreError::Timeout`]: No matching action within `timeout`
        /// - [`StoreError::ChannelClosed`]: The waiter was dropped unanswered
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            F: Fn(&A) -> bool + Send + Sync + 'static,
        {
            let (reply, rx) = oneshot::channel();
            let id = self.next_waiter.fetch_add(1, Ordering::Relaxed);
            self.waiters.lock().await.insert(
                id,
                Waiter {
                    matches: Box::new(predicate),
                    reply,
                },
            );

            if let Err(error) = self.send(action).await {
                self.waiters.lock().await.remove(&id);
                return Err(error);
            }

            match tokio::time::timeout(timeout, rx).await {
                Ok(Ok(result)) => Ok(result),
                Ok(Err(_)) => Err(StoreError::ChannelClosed),
                Err(_) => {
                    self.waiters.lock().await.remove(&id);
                    Err(StoreError::Timeout)
                },
            }
        }

        /// Hands `action` to every waiter it matches
        ///
        /// Takes `action` by value so the future is `Send` without `A: Sync`.
        #[allow(clippy::needless_pass_by_value)]
        async fn answer_waiters(&self, action: A) {
            let mut waiters = self.waiters.lock().await;
            let matched: Vec<u64> = waiters
                .iter()
                .filter(|(_, waiter)| (waiter.matches)(&action))
                .map(|(id, _)| *id)
                .collect();

            for id in matched {
                if let Some(waiter) = waiters.remove(&id) {
                    // The caller may have given up already
                    let _ = waiter.reply.send(action.clone());
                }
            }
        }

        /// Subscribe to all actions produced by effects
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let flights = store.state(|s| s.flight_count()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Returns `true` once `shutdown` has been called
        #[must_use]
        pub fn is_shutting_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }

        /// Number of spawned effects that have not finished yet
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        /// Initiate graceful shutdown of the store
        ///
        /// Rejects new actions, then waits for pending effects to finish.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
        /// pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            self.shutdown.store(true, Ordering::Release);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(50);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(pending_effects = pending, "Shutdown timeout");
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Start an effect without waiting for it
        fn execute_effect(&self, effect: Effect<A>) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Parallel(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                    for effect in effects {
                        self.execute_effect(effect);
                    }
                },
                effect @ (Effect::Future(_) | Effect::Sequential(_)) => {
                    self.pending_effects.fetch_add(1, Ordering::SeqCst);
                    let guard = PendingGuard(Arc::clone(&self.pending_effects));
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = guard;
                        store.drive(effect).await;
                    });
                },
            }
        }

        /// Run an effect to completion, feeding produced actions back in
        fn drive(&self, effect: Effect<A>) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
            Box::pin(async move {
                match effect {
                    Effect::None => {},
                    Effect::Future(fut) => {
                        metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                        if let Some(action) = fut.await {
                            self.answer_waiters(action.clone()).await;
                            // No receivers is fine; the action is still reduced
                            let _ = self.action_broadcast.send(action.clone());
                            if let Err(error) = self.send(action).await {
                                tracing::debug!(%error, "Dropped action produced by effect");
                            }
                        }
                    },
                    Effect::Parallel(effects) => {
                        for effect in effects {
                            self.execute_effect(effect);
                        }
                    },
                    Effect::Sequential(effects) => {
                        metrics::counter!("store.effects.executed", "type" => "sequential").increment(1);
                        for effect in effects {
                            self.drive(effect).await;
                        }
                    },
                }
            })
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                waiters: Arc::clone(&self.waiters),
                next_waiter: Arc::clone(&self.next_waiter),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

// Re-export for convenience
pub use error::StoreError;
pub use store::Store;
