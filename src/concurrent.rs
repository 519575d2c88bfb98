//! Cooperative concurrency context threaded through cursor evaluation.
//!
//! There is no thread pool here: long-running reads periodically hand
//! control back to the host (e.g. to service a GIL-like lock or to check a
//! deadline) by calling a yield hook every `yield_every` ticks, and can be
//! cancelled from another thread at any time via the shared `cancelled` flag.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

type YieldHook = Box<dyn FnMut() + Send>;

struct Inner {
    ticks: AtomicU64,
    cancelled: AtomicBool,
    yield_every: u32,
    hook: Mutex<Option<YieldHook>>,
}

#[derive(Clone)]
pub struct ConcurrentSearch {
    inner: Arc<Inner>,
}

impl ConcurrentSearch {
    pub fn new(yield_every: u32) -> Self {
        Self {
            inner: Arc::new(Inner {
                ticks: AtomicU64::new(0),
                cancelled: AtomicBool::new(false),
                yield_every,
                hook: Mutex::new(None),
            }),
        }
    }

    pub fn with_yield_hook(yield_every: u32, hook: impl FnMut() + Send + 'static) -> Self {
        let search = Self::new(yield_every);
        *search.inner.hook.lock().unwrap() = Some(Box::new(hook));
        search
    }

    /// Call once per unit of work inside a hot cursor loop. Invokes the
    /// yield hook (if any) every `yield_every` ticks.
    pub fn tick(&self) {
        let count = self.inner.ticks.fetch_add(1, Ordering::Relaxed) + 1;
        if self.inner.yield_every != 0 && count % self.inner.yield_every as u64 == 0 {
            if let Some(hook) = self.inner.hook.lock().unwrap().as_mut() {
                hook();
            }
        }
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    #[test]
    fn hook_fires_every_n_ticks() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();
        let search = ConcurrentSearch::with_yield_hook(3, move || {
            calls_clone.fetch_add(1, Ordering::Relaxed);
        });
        for _ in 0..9 {
            search.tick();
        }
        assert_eq!(calls.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn cancellation_is_observable() {
        let search = ConcurrentSearch::new(0);
        assert!(!search.is_cancelled());
        search.cancel();
        assert!(search.is_cancelled());
    }
}
