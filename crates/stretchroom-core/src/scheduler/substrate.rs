//! "Run this after N milliseconds" primitives.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::runtime::{Handle, TryCurrentError};
use tokio::task::JoinHandle;

pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// A single pending callback.
pub trait TimerHandle: Send {
    /// Best-effort; a no-op if the callback already ran.
    fn cancel(&self);

    /// Fired or cancelled.
    fn is_finished(&self) -> bool;
}

/// Something that can run a callback after a delay.
pub trait Substrate: Send {
    type Handle: TimerHandle;

    fn run_after(&self, delay: Duration, callback: Callback) -> Self::Handle;
}

// ── Tokio ────────────────────────────────────────────────────────────

/// Spawns one sleeping task per callback on a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioSubstrate {
    runtime: Handle,
}

impl TokioSubstrate {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Bind to the runtime the caller is running on.
    ///
    /// # Errors
    ///
    /// Fails when called outside a tokio runtime.
    pub fn current() -> Result<Self, TryCurrentError> {
        Handle::try_current().map(Self::new)
    }
}

pub struct TokioHandle(JoinHandle<()>);

impl TimerHandle for TokioHandle {
    fn cancel(&self) {
        self.0.abort();
    }

    fn is_finished(&self) -> bool {
        self.0.is_finished()
    }
}

impl Substrate for TokioSubstrate {
    type Handle = TokioHandle;

    fn run_after(&self, delay: Duration, callback: Callback) -> TokioHandle {
        TokioHandle(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        }))
    }
}

// ── Manual ───────────────────────────────────────────────────────────

struct ManualTimer {
    id: u64,
    due_ms: u64,
    callback: Callback,
    cancelled: Arc<AtomicBool>,
    fired: Arc<AtomicBool>,
}

#[derive(Default)]
struct ManualInner {
    now_ms: u64,
    next_id: u64,
    timers: Vec<ManualTimer>,
}

/// Virtual-time substrate. Nothing fires until [`ManualSubstrate::advance`].
///
/// Clones share the same timer queue.
#[derive(Clone, Default)]
pub struct ManualSubstrate {
    inner: Arc<Mutex<ManualInner>>,
}

#[derive(Debug, Clone)]
pub struct ManualHandle {
    cancelled: Arc<AtomicBool>,
    fired: Arc<AtomicBool>,
}

impl TimerHandle for ManualHandle {
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    fn is_finished(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst) || self.fired.load(Ordering::SeqCst)
    }
}

impl ManualSubstrate {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ManualInner> {
        // A panicking callback never runs under the lock, so poison carries no
        // broken invariant.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn now_ms(&self) -> u64 {
        self.lock().now_ms
    }

    /// Callbacks neither fired nor cancelled.
    pub fn pending(&self) -> usize {
        self.lock()
            .timers
            .iter()
            .filter(|t| !t.cancelled.load(Ordering::SeqCst))
            .count()
    }

    /// Delays (relative to now) of the live callbacks, soonest first.
    pub fn pending_delays(&self) -> Vec<u64> {
        let inner = self.lock();
        let mut delays: Vec<u64> = inner
            .timers
            .iter()
            .filter(|t| !t.cancelled.load(Ordering::SeqCst))
            .map(|t| t.due_ms.saturating_sub(inner.now_ms))
            .collect();
        delays.sort_unstable();
        delays
    }

    /// Move virtual time forward, running every callback that comes due in
    /// deadline order. Returns how many ran.
    pub fn advance(&self, ms: u64) -> usize {
        let target = self.lock().now_ms.saturating_add(ms);
        let mut ran = 0;
        loop {
            let next = {
                let mut inner = self.lock();
                inner.timers.retain(|t| !t.cancelled.load(Ordering::SeqCst));
                let due = inner
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due_ms <= target)
                    .min_by_key(|(_, t)| (t.due_ms, t.id))
                    .map(|(i, _)| i);
                match due {
                    Some(i) => {
                        let timer = inner.timers.remove(i);
                        inner.now_ms = inner.now_ms.max(timer.due_ms);
                        Some(timer)
                    }
                    None => {
                        inner.now_ms = target;
                        None
                    }
                }
            };

            let Some(timer) = next else {
                return ran;
            };
            timer.fired.store(true, Ordering::SeqCst);
            (timer.callback)();
            ran += 1;
        }
    }
}

impl Substrate for ManualSubstrate {
    type Handle = ManualHandle;

    fn run_after(&self, delay: Duration, callback: Callback) -> ManualHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let fired = Arc::new(AtomicBool::new(false));
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        let due_ms = inner
            .now_ms
            .saturating_add(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX));
        inner.timers.push(ManualTimer {
            id,
            due_ms,
            callback,
            cancelled: cancelled.clone(),
            fired: fired.clone(),
        });
        ManualHandle { cancelled, fired }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> (Arc<AtomicUsize>, impl Fn() -> Callback) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        (count, move || {
            let c = c.clone();
            Box::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            }) as Callback
        })
    }

    #[test]
    fn manual_fires_in_deadline_order() {
        let substrate = ManualSubstrate::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for delay in [300u64, 100, 200] {
            let order = order.clone();
            substrate.run_after(
                Duration::from_millis(delay),
                Box::new(move || order.lock().unwrap().push(delay)),
            );
        }
        assert_eq!(substrate.advance(250), 2);
        assert_eq!(*order.lock().unwrap(), vec![100, 200]);
        assert_eq!(substrate.pending(), 1);
        assert_eq!(substrate.now_ms(), 250);
    }

    #[test]
    fn cancelled_callbacks_never_fire() {
        let substrate = ManualSubstrate::new();
        let (count, make) = counter();
        let handle = substrate.run_after(Duration::from_millis(10), make());
        handle.cancel();
        assert!(handle.is_finished());
        assert_eq!(substrate.advance(100), 0);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn cancel_after_fire_is_harmless() {
        let substrate = ManualSubstrate::new();
        let (count, make) = counter();
        let handle = substrate.run_after(Duration::ZERO, make());
        substrate.advance(0);
        handle.cancel();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_substrate_runs_after_delay() {
        let substrate = TokioSubstrate::current().unwrap();
        let (count, make) = counter();
        let handle = substrate.run_after(Duration::from_millis(500), make());
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        handle.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_substrate_abort_prevents_callback() {
        let substrate = TokioSubstrate::current().unwrap();
        let (count, make) = counter();
        let handle = substrate.run_after(Duration::from_millis(500), make());
        handle.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(handle.is_finished());
    }
}
