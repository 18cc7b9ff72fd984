//! Request state for asynchronous data sources.
//!
//! A [`Resource`] owns the `{data, loading, error}` triple for one fetch
//! function and its dependencies. Each start of a fetch bumps a generation
//! counter; a task that resolves after a newer one has started, or after the
//! resource was disposed, is dropped without touching the state.
//!
//! [`Mutation`] is the write-side counterpart: it tracks `{loading, error}`
//! and hands the result back to the caller instead of storing it.


use crate::api::ApiResult;
use crate::api::messages::describe;
use futures_lite::future::Boxed;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct RequestState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> RequestState<T> {
    pub fn loading() -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        !self.loading && self.error.is_none() && self.data.is_some()
    }

    pub fn is_failure(&self) -> bool {
        !self.loading && self.error.is_some()
    }
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self::loading()
    }
}

type Fetcher<D, T> = Arc<dyn Fn(D) -> Boxed<ApiResult<T>> + Send + Sync>;
type Listener<T> = Arc<dyn Fn(&RequestState<T>) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

struct Listeners<T> {
    next_id: u64,
    entries: Vec<(u64, Listener<T>)>,
}

impl<T> Listeners<T> {
    fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    fn add(&mut self, listener: Listener<T>) -> Subscription {
        self.next_id += 1;
        self.entries.push((self.next_id, listener));
        Subscription(self.next_id)
    }

    fn remove(&mut self, subscription: Subscription) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(id, _)| *id != subscription.0);
        self.entries.len() != before
    }

    fn snapshot(&self) -> Vec<Listener<T>> {
        self.entries.iter().map(|(_, l)| Arc::clone(l)).collect()
    }
}

fn notify<T>(listeners: Vec<Listener<T>>, state: &RequestState<T>) {
    for listener in listeners {
        listener(state);
    }
}

fn lock<S>(mutex: &Mutex<S>) -> MutexGuard<'_, S> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Shared<D, T> {
    deps: D,
    state: RequestState<T>,
    generation: u64,
    disposed: bool,
    in_flight: Option<AbortHandle>,
    listeners: Listeners<T>,
}

struct Inner<D, T> {
    fetcher: Fetcher<D, T>,
    runtime: Handle,
    shared: Mutex<Shared<D, T>>,
}

impl<D, T> Inner<D, T>
where
    D: Clone + PartialEq + Send + 'static,
    T: Clone + Send + 'static,
{
    fn start(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let (generation, deps, snapshot, listeners) = {
            let mut shared = lock(&self.shared);
            if shared.disposed {
                return None;
            }
            shared.generation += 1;
            shared.state.loading = true;
            shared.state.error = None;
            (
                shared.generation,
                shared.deps.clone(),
                shared.state.clone(),
                shared.listeners.snapshot(),
            )
        };
        notify(listeners, &snapshot);

        let future = (self.fetcher)(deps);
        let inner = Arc::clone(self);
        let task = self.runtime.spawn(async move {
            let result = future.await;
            inner.settle(generation, result);
        });

        let mut shared = lock(&self.shared);
        if shared.generation == generation && !shared.disposed {
            shared.in_flight = Some(task.abort_handle());
        }
        Some(task)
    }

    fn settle(&self, generation: u64, result: ApiResult<T>) {
        let (snapshot, listeners) = {
            let mut shared = lock(&self.shared);
            if shared.disposed {
                debug!("Dropping result of generation {} for a disposed resource", generation);
                return;
            }
            if shared.generation != generation {
                debug!(
                    "Dropping stale result of generation {} (current {})",
                    generation, shared.generation
                );
                return;
            }

            shared.in_flight = None;
            shared.state = match result {
                Ok(data) => RequestState {
                    data: Some(data),
                    loading: false,
                    error: None,
                },
                Err(error) => RequestState {
                    data: None,
                    loading: false,
                    error: Some(describe(&error)),
                },
            };
            (shared.state.clone(), shared.listeners.snapshot())
        };
        notify(listeners, &snapshot);
    }
}

/// Loading/data/error state for one fetch function.
///
/// Cloning yields another handle to the same state. The first fetch starts on
/// construction; [`Resource::refetch`] and [`Resource::set_deps`] start more.
pub struct Resource<D, T> {
    inner: Arc<Inner<D, T>>,
}

impl<D, T> Clone for Resource<D, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D, T> Resource<D, T>
where
    D: Clone + PartialEq + Send + 'static,
    T: Clone + Send + 'static,
{
    /// Creates the resource on the current tokio runtime and starts the
    /// first fetch.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime; use [`Resource::new_in`]
    /// to pass a handle explicitly.
    pub fn new<F, Fut>(deps: D, fetch: F) -> Self
    where
        F: Fn(D) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<T>> + Send + 'static,
    {
        Self::new_in(Handle::current(), deps, fetch)
    }

    pub fn new_in<F, Fut>(runtime: Handle, deps: D, fetch: F) -> Self
    where
        F: Fn(D) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<T>> + Send + 'static,
    {
        let fetcher: Fetcher<D, T> =
            Arc::new(move |deps| -> Boxed<ApiResult<T>> { Box::pin(fetch(deps)) });
        let resource = Self {
            inner: Arc::new(Inner {
                fetcher,
                runtime,
                shared: Mutex::new(Shared {
                    deps,
                    state: RequestState::loading(),
                    generation: 0,
                    disposed: false,
                    in_flight: None,
                    listeners: Listeners::new(),
                }),
            }),
        };
        resource.inner.start();
        resource
    }

    pub fn get_state(&self) -> RequestState<T> {
        lock(&self.inner.shared).state.clone()
    }

    pub fn deps(&self) -> D {
        lock(&self.inner.shared).deps.clone()
    }

    /// Registers a callback run after every state change. Callbacks run
    /// outside the internal lock, so they may read the resource.
    pub fn subscribe<L>(&self, listener: L) -> Subscription
    where
        L: Fn(&RequestState<T>) + Send + Sync + 'static,
    {
        lock(&self.inner.shared).listeners.add(Arc::new(listener))
    }

    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        lock(&self.inner.shared).listeners.remove(subscription)
    }

    /// Re-runs the fetch with the current dependencies. Data from the last
    /// success stays visible while the new request is in flight. Returns
    /// `None` once the resource is disposed.
    pub fn refetch(&self) -> Option<JoinHandle<()>> {
        self.inner.start()
    }

    /// Replaces the dependencies and refetches if they changed.
    pub fn set_deps(&self, deps: D) -> Option<JoinHandle<()>> {
        {
            let mut shared = lock(&self.inner.shared);
            if shared.disposed || shared.deps == deps {
                return None;
            }
            shared.deps = deps;
        }
        self.inner.start()
    }

    /// Stops the resource: aborts the in-flight fetch, drops listeners, and
    /// ignores any result that still arrives.
    pub fn dispose(&self) {
        let mut shared = lock(&self.inner.shared);
        if shared.disposed {
            return;
        }
        shared.disposed = true;
        shared.generation += 1;
        shared.listeners = Listeners::new();
        if let Some(task) = shared.in_flight.take() {
            task.abort();
        }
    }

    pub fn is_disposed(&self) -> bool {
        lock(&self.inner.shared).disposed
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationState {
    pub loading: bool,
    pub error: Option<String>,
}

type Mutator<V, T> = Arc<dyn Fn(V) -> Boxed<ApiResult<T>> + Send + Sync>;

struct MutationShared {
    state: MutationState,
    generation: u64,
}

/// Write operation with loading/error tracking. Errors are reported through
/// the state and a `None` return, never as a panic or `Err`.
pub struct Mutation<V, T> {
    mutate: Mutator<V, T>,
    shared: Arc<Mutex<MutationShared>>,
}

impl<V, T> Clone for Mutation<V, T> {
    fn clone(&self) -> Self {
        Self {
            mutate: Arc::clone(&self.mutate),
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<V, T> Mutation<V, T>
where
    V: Send + 'static,
    T: Send + 'static,
{
    pub fn new<F, Fut>(mutate: F) -> Self
    where
        F: Fn(V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<T>> + Send + 'static,
    {
        Self {
            mutate: Arc::new(move |variables| -> Boxed<ApiResult<T>> {
                Box::pin(mutate(variables))
            }),
            shared: Arc::new(Mutex::new(MutationShared {
                state: MutationState::default(),
                generation: 0,
            })),
        }
    }

    pub fn state(&self) -> MutationState {
        lock(&self.shared).state.clone()
    }

    /// Runs the operation. When calls overlap, only the most recent one
    /// writes the final state; each caller still gets its own result.
    pub async fn mutate(&self, variables: V) -> Option<T> {
        let generation = {
            let mut shared = lock(&self.shared);
            shared.generation += 1;
            shared.state = MutationState {
                loading: true,
                error: None,
            };
            shared.generation
        };

        let mut pending = Pending {
            shared: &self.shared,
            generation,
            settled: false,
        };
        let result = (self.mutate)(variables).await;
        pending.settled = true;

        let mut shared = lock(&self.shared);
        let current = shared.generation == generation;
        match result {
            Ok(data) => {
                if current {
                    shared.state = MutationState::default();
                }
                Some(data)
            }
            Err(error) => {
                let message = describe(&error);
                debug!("Mutation failed: {}", message);
                if current {
                    shared.state = MutationState {
                        loading: false,
                        error: Some(message),
                    };
                }
                None
            }
        }
    }
}

/// Clears `loading` when a `mutate` future is dropped before it completes.
struct Pending<'a> {
    shared: &'a Mutex<MutationShared>,
    generation: u64,
    settled: bool,
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut shared = lock(self.shared);
        if shared.generation == self.generation {
            shared.state.loading = false;
        }
    }
}
