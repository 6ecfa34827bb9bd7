//! Frame-available handoff between the decoder thread and the render loop.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Single-slot mailbox: one lock-guarded flag with read-and-clear semantics.
#[derive(Debug, Default)]
pub struct FrameReady {
    pending: Mutex<bool>,
}

impl FrameReady {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        // a panicking producer must not wedge the render loop
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Called from the producer's callback context.
    pub fn mark_frame_available(&self) {
        *self.lock() = true;
    }

    /// Reads and clears the flag in one critical section.
    pub fn consume_if_available(&self) -> bool {
        self.consume_with(|| ()).is_some()
    }

    /// Like `consume_if_available`, but runs `refresh` before releasing the lock
    /// so a concurrent announce cannot land between the clear and the refresh.
    pub fn consume_with<R>(&self, refresh: impl FnOnce() -> R) -> Option<R> {
        let mut pending = self.lock();
        if !*pending {
            return None;
        }
        *pending = false;
        Some(refresh())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn consume_clears_the_flag() {
        let ready = FrameReady::new();
        assert!(!ready.consume_if_available());
        ready.mark_frame_available();
        ready.mark_frame_available();
        assert!(ready.consume_if_available());
        assert!(!ready.consume_if_available());
    }

    #[test]
    fn refresh_runs_only_when_due() {
        let ready = FrameReady::new();
        let mut refreshes = 0;
        assert_eq!(ready.consume_with(|| refreshes += 1), None);
        ready.mark_frame_available();
        assert_eq!(ready.consume_with(|| 7), Some(7));
        assert_eq!(refreshes, 0);
    }

    #[test]
    fn announce_before_consume_is_never_lost() {
        let ready = Arc::new(FrameReady::new());
        for _ in 0..200 {
            let producer = {
                let ready = Arc::clone(&ready);
                thread::spawn(move || ready.mark_frame_available())
            };
            producer.join().unwrap();
            assert!(ready.consume_if_available());
        }
    }

    #[test]
    fn concurrent_consumes_never_exceed_announces() {
        const ROUNDS: usize = 2_000;
        let ready = Arc::new(FrameReady::new());
        let announced = Arc::new(AtomicUsize::new(0));
        let consumed = Arc::new(AtomicUsize::new(0));

        let producers: Vec<_> = (0..2)
            .map(|_| {
                let ready = Arc::clone(&ready);
                let announced = Arc::clone(&announced);
                thread::spawn(move || {
                    for i in 0..ROUNDS {
                        announced.fetch_add(1, Ordering::SeqCst);
                        ready.mark_frame_available();
                        if i % 7 == 0 {
                            thread::yield_now();
                        }
                    }
                })
            })
            .collect();

        let consumers: Vec<_> = (0..2)
            .map(|_| {
                let ready = Arc::clone(&ready);
                let announced = Arc::clone(&announced);
                let consumed = Arc::clone(&consumed);
                thread::spawn(move || {
                    for _ in 0..ROUNDS {
                        ready.consume_with(|| {
                            let total = consumed.fetch_add(1, Ordering::SeqCst) + 1;
                            assert!(total <= announced.load(Ordering::SeqCst));
                        });
                    }
                })
            })
            .collect();

        for handle in producers.into_iter().chain(consumers) {
            handle.join().unwrap();
        }

        // whatever is still pending is picked up by one last render pass
        if ready.consume_if_available() {
            consumed.fetch_add(1, Ordering::SeqCst);
        }
        assert!(consumed.load(Ordering::SeqCst) <= announced.load(Ordering::SeqCst));
        assert!(consumed.load(Ordering::SeqCst) >= 1);
        assert!(!ready.consume_if_available());
    }
}
