//! View-lifetime scopes
//!
//! Each mounted view owns a `ViewScope`. Requests started through it are
//! aborted when the view unmounts, and results that arrive after that are
//! never applied. A scope only holds handles for work that is still
//! running.

use crate::error::{ClientError, ClientResult};
use futures::future::{AbortHandle, Abortable};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Default)]
struct Tasks {
    next_key: u64,
    running: HashMap<u64, AbortHandle>,
}

struct ScopeInner {
    id: Uuid,
    name: &'static str,
    alive: AtomicBool,
    tasks: Mutex<Tasks>,
}

/// Unregisters one task when it finishes or is dropped.
struct TaskGuard<'a> {
    scope: &'a ViewScope,
    key: u64,
}

impl Drop for TaskGuard<'_> {
    fn drop(&mut self) {
        self.scope.tasks().running.remove(&self.key);
    }
}

/// Cloneable handle; `Send + Sync` so UI cleanup callbacks can own one.
#[derive(Clone)]
pub struct ViewScope {
    inner: Arc<ScopeInner>,
}

impl ViewScope {
    pub fn new(name: &'static str) -> Self {
        let id = Uuid::new_v4();
        log_info!("[Scope] open {} ({})", name, id);
        Self {
            inner: Arc::new(ScopeInner {
                id,
                name,
                alive: AtomicBool::new(true),
                tasks: Mutex::new(Tasks::default()),
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn is_alive(&self) -> bool {
        self.inner.alive.load(Ordering::Acquire)
    }

    /// Number of tasks started through this scope that have not finished.
    pub fn pending(&self) -> usize {
        self.tasks().running.len()
    }

    /// Drives `fut` while the scope is open.
    ///
    /// Resolves to a `Cancelled` error when the scope closes first, or when
    /// it closed while the future was finishing.
    pub async fn run<F, T>(&self, fut: F) -> ClientResult<T>
    where
        F: Future<Output = T>,
    {
        if !self.is_alive() {
            return Err(self.cancelled());
        }
        let (handle, registration) = AbortHandle::new_pair();
        let key = {
            let mut tasks = self.tasks();
            tasks.next_key += 1;
            let key = tasks.next_key;
            tasks.running.insert(key, handle);
            key
        };
        let _guard = TaskGuard { scope: self, key };

        let value = Abortable::new(fut, registration).await?;
        if self.is_alive() {
            Ok(value)
        } else {
            Err(self.cancelled())
        }
    }

    /// Closes the scope and aborts everything still running in it.
    pub fn close(&self) {
        if !self.inner.alive.swap(false, Ordering::AcqRel) {
            return;
        }
        let running = std::mem::take(&mut self.tasks().running);
        let pending = running.len();
        for handle in running.into_values() {
            handle.abort();
        }
        log_info!(
            "[Scope] close {} ({}), aborted {} request(s)",
            self.inner.name,
            self.inner.id,
            pending
        );
    }

    fn tasks(&self) -> MutexGuard<'_, Tasks> {
        // A poisoned table is still a valid table of handles.
        self.inner
            .tasks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn cancelled(&self) -> ClientError {
        ClientError::cancelled(format!("view {} was closed", self.inner.name))
    }
}
