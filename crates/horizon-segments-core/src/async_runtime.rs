//! Async runtime integration for Horizon Segments.
//!
//! Image decoding and fetching run on a Tokio runtime so that native view
//! construction never waits on I/O. Results travel back to the UI thread over
//! channels owned by the caller; this module only owns the runtime and the
//! task handles.
//!
//! # Example
//!
//! ```no_run
//! use horizon_segments_core::async_runtime::AsyncRuntime;
//!
//! # fn main() -> Result<(), horizon_segments_core::RuntimeError> {
//! let runtime = AsyncRuntime::global()?;
//! let handle = runtime.spawn(async { 40 + 2 });
//! // The task can be aborted if its consumer goes away first.
//! handle.abort();
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

use crate::error::RuntimeError;
use crate::logging::targets;

/// Global async runtime instance.
static GLOBAL_RUNTIME: OnceLock<AsyncRuntime> = OnceLock::new();

/// Counter for unique task IDs.
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// The type of async runtime to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeType {
    /// Multi-threaded runtime using Tokio's default scheduler.
    #[default]
    MultiThreaded,
    /// Current-thread runtime; tasks only progress while it is driven.
    CurrentThread,
}

/// Configuration for the async runtime.
#[derive(Debug, Clone)]
pub struct AsyncRuntimeConfig {
    /// The type of runtime to create.
    pub runtime_type: RuntimeType,
    /// Number of worker threads for the multi-threaded runtime.
    pub worker_threads: Option<usize>,
    /// Name prefix for runtime threads.
    pub thread_name: String,
}

impl Default for AsyncRuntimeConfig {
    fn default() -> Self {
        Self {
            runtime_type: RuntimeType::MultiThreaded,
            worker_threads: Some(2),
            thread_name: "segments-async".to_string(),
        }
    }
}

impl AsyncRuntimeConfig {
    /// Set the number of worker threads.
    pub fn with_worker_threads(mut self, count: usize) -> Self {
        self.worker_threads = Some(count);
        self
    }

    /// Set the thread name prefix.
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}

/// A handle to a spawned async task.
#[derive(Debug)]
pub struct AsyncTaskHandle<T> {
    id: u64,
    join: JoinHandle<T>,
}

impl<T> AsyncTaskHandle<T> {
    /// Get the unique task ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Abort the task. A task that already finished is unaffected.
    pub fn abort(&self) {
        self.join.abort();
    }

    /// Returns `true` once the task has completed or been aborted.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Await the task result. Returns `None` if it was aborted or panicked.
    pub async fn wait(self) -> Option<T> {
        self.join.await.ok()
    }
}

/// The async runtime manager.
pub struct AsyncRuntime {
    /// Owned runtime, absent when wrapping an external handle.
    runtime: Option<Runtime>,
    handle: Handle,
    active_tasks: Arc<AtomicU64>,
}

impl AsyncRuntime {
    /// Get the global async runtime, creating it with defaults on first use.
    pub fn global() -> Result<&'static AsyncRuntime, RuntimeError> {
        if let Some(runtime) = GLOBAL_RUNTIME.get() {
            return Ok(runtime);
        }
        let runtime = AsyncRuntime::new(AsyncRuntimeConfig::default())?;
        Ok(GLOBAL_RUNTIME.get_or_init(|| runtime))
    }

    /// Initialize the global runtime with a custom configuration.
    pub fn init_global(config: AsyncRuntimeConfig) -> Result<&'static AsyncRuntime, RuntimeError> {
        let runtime = AsyncRuntime::new(config)?;
        GLOBAL_RUNTIME
            .set(runtime)
            .map_err(|_| RuntimeError::AlreadyInitialized)?;
        Self::global()
    }

    /// Create a new runtime with the given configuration.
    pub fn new(config: AsyncRuntimeConfig) -> Result<Self, RuntimeError> {
        let mut builder = match config.runtime_type {
            RuntimeType::MultiThreaded => {
                let mut builder = Builder::new_multi_thread();
                if let Some(workers) = config.worker_threads {
                    builder.worker_threads(workers.max(1));
                }
                builder
            }
            RuntimeType::CurrentThread => Builder::new_current_thread(),
        };
        builder.thread_name(&config.thread_name).enable_time();
        // The I/O driver is only needed by socket clients.
        #[cfg(feature = "io")]
        builder.enable_io();
        let runtime = builder.build()?;
        tracing::debug!(target: targets::RUNTIME, ?config, "async runtime created");

        let handle = runtime.handle().clone();
        Ok(Self {
            runtime: Some(runtime),
            handle,
            active_tasks: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Wrap an existing Tokio runtime handle.
    ///
    /// The caller keeps ownership of the runtime; dropping this value does
    /// not shut it down.
    pub fn from_handle(handle: Handle) -> Self {
        Self {
            runtime: None,
            handle,
            active_tasks: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Wrap the runtime of the current async context, if any.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::from_handle)
    }

    /// Whether this value owns its runtime.
    pub fn owns_runtime(&self) -> bool {
        self.runtime.is_some()
    }

    /// Get the number of active tasks.
    pub fn active_tasks(&self) -> u64 {
        self.active_tasks.load(Ordering::Acquire)
    }

    /// Get the Tokio runtime handle.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Spawn an async task on the runtime.
    pub fn spawn<F, T>(&self, future: F) -> AsyncTaskHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let id = NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed);
        let active_tasks = self.active_tasks.clone();
        active_tasks.fetch_add(1, Ordering::AcqRel);

        let guard = ActiveTaskGuard(active_tasks);
        let join = self.handle.spawn(async move {
            let _guard = guard;
            future.await
        });

        AsyncTaskHandle { id, join }
    }
}

impl Clone for AsyncRuntime {
    /// Clones share the runtime handle; only the original owns the runtime.
    fn clone(&self) -> Self {
        Self {
            runtime: None,
            handle: self.handle.clone(),
            active_tasks: self.active_tasks.clone(),
        }
    }
}

impl std::fmt::Debug for AsyncRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncRuntime")
            .field("owns_runtime", &self.owns_runtime())
            .field("active_tasks", &self.active_tasks())
            .finish()
    }
}

/// Decrements the active task counter when the task ends, including aborts.
struct ActiveTaskGuard(Arc<AtomicU64>);

impl Drop for ActiveTaskGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}
