//! Trailing-edge debouncing with an optional max wait
//!
//! Each call to [`Debouncer::schedule`] for a key replaces the pending action
//! for that key and restarts its delay window. When a max wait is configured,
//! the action fires no later than `max_wait` after the first call of the
//! burst, however often the window is restarted.
//!
//! Timers run on the tokio clock, so tests can drive them with a paused
//! runtime (`#[tokio::test(start_paused = true)]`).

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Timing policy for a debouncer instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebouncePolicy {
    /// Quiet period required before the action runs
    pub delay: Duration,
    /// Upper bound on how long a burst may postpone the action
    pub max_wait: Option<Duration>,
}

impl DebouncePolicy {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            max_wait: None,
        }
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    /// When an action scheduled `now` should fire, given its burst start
    fn deadline(&self, burst_start: Instant, now: Instant) -> Instant {
        let trailing = now + self.delay;
        match self.max_wait {
            Some(max_wait) => trailing.min(burst_start + max_wait),
            None => trailing,
        }
    }
}

struct Pending {
    generation: u64,
    burst_start: Instant,
    cancel: CancellationToken,
}

struct Slots<K> {
    next_generation: u64,
    pending: HashMap<K, Pending>,
}

/// Coalesces rapid calls per key into a single trailing call
pub struct Debouncer<K> {
    policy: DebouncePolicy,
    slots: Arc<Mutex<Slots<K>>>,
}

impl<K> Clone for Debouncer<K> {
    fn clone(&self) -> Self {
        Self {
            policy: self.policy,
            slots: Arc::clone(&self.slots),
        }
    }
}

fn lock<K>(slots: &Mutex<Slots<K>>) -> MutexGuard<'_, Slots<K>> {
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<K> Debouncer<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    pub fn new(policy: DebouncePolicy) -> Self {
        Self {
            policy,
            slots: Arc::new(Mutex::new(Slots {
                next_generation: 0,
                pending: HashMap::new(),
            })),
        }
    }

    pub fn policy(&self) -> DebouncePolicy {
        self.policy
    }

    /// Schedule `action` for `key`, replacing any pending action for it
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, key: K, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let now = Instant::now();
        let cancel = CancellationToken::new();

        let (generation, deadline) = {
            let mut slots = lock(&self.slots);
            let burst_start = match slots.pending.get(&key) {
                Some(previous) => {
                    previous.cancel.cancel();
                    previous.burst_start
                }
                None => now,
            };
            slots.next_generation += 1;
            let generation = slots.next_generation;
            slots.pending.insert(
                key.clone(),
                Pending {
                    generation,
                    burst_start,
                    cancel: cancel.clone(),
                },
            );
            (generation, self.policy.deadline(burst_start, now))
        };

        let slots = Arc::clone(&self.slots);
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep_until(deadline) => {}
            }

            {
                let mut slots = lock(&slots);
                match slots.pending.get(&key) {
                    Some(pending) if pending.generation == generation => {
                        slots.pending.remove(&key);
                    }
                    // Superseded between the timer firing and taking the lock
                    _ => return,
                }
            }

            action();
        });
    }

    /// Drop the pending action for `key`, if any
    pub fn cancel(&self, key: &K) -> bool {
        let mut slots = lock(&self.slots);
        match slots.pending.remove(key) {
            Some(pending) => {
                pending.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Drop every pending action
    pub fn cancel_all(&self) {
        let mut slots = lock(&self.slots);
        for (_, pending) in slots.pending.drain() {
            pending.cancel.cancel();
        }
    }

    pub fn is_pending(&self, key: &K) -> bool {
        lock(&self.slots).pending.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn recorder() -> (Arc<Mutex<Vec<(u32, Instant)>>>, impl Fn(u32) -> Box<dyn FnOnce() + Send>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let make = move |value: u32| -> Box<dyn FnOnce() + Send> {
            let sink = Arc::clone(&sink);
            Box::new(move || sink.lock().unwrap().push((value, Instant::now())))
        };
        (calls, make)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_fires_once_with_last_call() {
        let debouncer = Debouncer::new(DebouncePolicy::new(Duration::from_millis(300)));
        let (calls, make) = recorder();
        let start = Instant::now();

        for value in 1..=5 {
            debouncer.schedule("preview", make(value));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_secs(2)).await;

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, 5);
        // Last call at 400ms + 300ms quiet period
        assert_eq!(calls[0].1 - start, Duration::from_millis(700));
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_wait_forces_execution() {
        let policy = DebouncePolicy::new(Duration::from_secs(1)).with_max_wait(Duration::from_secs(5));
        let debouncer = Debouncer::new(policy);
        let (calls, make) = recorder();
        let start = Instant::now();

        // Calls every 500ms for 8 seconds never leave a 1s quiet period
        for value in 0..16 {
            debouncer.schedule("persist", make(value));
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
        tokio::time::sleep(Duration::from_secs(2)).await;

        let calls = calls.lock().unwrap();
        assert!(!calls.is_empty());
        assert!(calls[0].1 - start <= Duration::from_secs(5));
        // The final call is still delivered after the burst settles
        assert_eq!(calls.last().map(|(value, _)| *value), Some(15));
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_wait_not_reset_by_later_calls() {
        let policy = DebouncePolicy::new(Duration::from_secs(1)).with_max_wait(Duration::from_secs(5));
        let debouncer = Debouncer::new(policy);
        let (calls, make) = recorder();
        let start = Instant::now();

        for value in 0..12 {
            debouncer.schedule("persist", make(value));
            tokio::time::sleep(Duration::from_millis(450)).await;
        }

        let calls = calls.lock().unwrap();
        assert_eq!(calls[0].1 - start, Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let debouncer = Debouncer::new(DebouncePolicy::new(Duration::from_millis(100)));
        let count = Arc::new(AtomicUsize::new(0));

        for key in ["markup", "data", "markup"] {
            let count = Arc::clone(&count);
            debouncer.schedule(key, move || {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_action() {
        let debouncer = Debouncer::new(DebouncePolicy::new(Duration::from_millis(100)));
        let (calls, make) = recorder();

        debouncer.schedule("preview", make(1));
        assert!(debouncer.is_pending(&"preview"));
        assert!(debouncer.cancel(&"preview"));
        assert!(!debouncer.is_pending(&"preview"));
        assert!(!debouncer.cancel(&"preview"));

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_burst_after_firing() {
        let debouncer = Debouncer::new(DebouncePolicy::new(Duration::from_millis(100)));
        let (calls, make) = recorder();

        debouncer.schedule("preview", make(1));
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!debouncer.is_pending(&"preview"));

        debouncer.schedule("preview", make(2));
        tokio::time::sleep(Duration::from_millis(200)).await;

        let values: Vec<u32> = calls.lock().unwrap().iter().map(|(v, _)| *v).collect();
        assert_eq!(values, vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all() {
        let debouncer = Debouncer::new(DebouncePolicy::new(Duration::from_millis(100)));
        let (calls, make) = recorder();

        debouncer.schedule("a", make(1));
        debouncer.schedule("b", make(2));
        debouncer.cancel_all();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert!(calls.lock().unwrap().is_empty());
    }
}
