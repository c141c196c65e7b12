//! Sliding-window request throttle keyed by verified subject.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// Admissions between sweeps of idle subject windows.
const SWEEP_EVERY: u64 = 256;

/// In-process sliding-window log limiter.
///
/// Each subject keeps the timestamps of its requests within the trailing
/// window. The purge-check-append sequence runs under one lock, so concurrent
/// requests from the same subject cannot both claim the last free slot.
/// Counts reset on process restart; horizontal scale-out partitions them.
pub struct RequestThrottle {
    state: Mutex<ThrottleState>,
    max_requests: usize,
    window: Duration,
}

struct ThrottleState {
    windows: HashMap<String, Vec<Instant>>,
    admissions: u64,
}

impl RequestThrottle {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            state: Mutex::new(ThrottleState {
                windows: HashMap::new(),
                admissions: 0,
            }),
            max_requests,
            window,
        }
    }

    /// Max requests admitted per subject within the window.
    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    /// Window length.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Admit or reject a request from `subject` at instant `now`.
    ///
    /// Entries older than the window are purged first; a rejected request is
    /// not recorded. Every `SWEEP_EVERY` calls, subjects whose windows have
    /// fully aged out are dropped so the map does not grow without bound.
    pub async fn admit(&self, subject: &str, now: Instant) -> bool {
        let mut state = self.state.lock().await;
        state.admissions += 1;
        if state.admissions % SWEEP_EVERY == 0 {
            let window = self.window;
            state
                .windows
                .retain(|_, stamps| stamps.iter().any(|&t| now.duration_since(t) < window));
        }

        let stamps = state.windows.entry(subject.to_string()).or_default();
        stamps.retain(|&t| now.duration_since(t) < self.window);
        if stamps.len() >= self.max_requests {
            return false;
        }
        stamps.push(now);
        true
    }

    #[cfg(test)]
    pub(crate) async fn tracked_subjects(&self) -> usize {
        self.state.lock().await.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn throttle(max: usize, window_secs: u64) -> RequestThrottle {
        RequestThrottle::new(max, Duration::from_secs(window_secs))
    }

    #[tokio::test]
    async fn test_admits_up_to_limit() {
        let t = throttle(5, 60);
        let now = Instant::now();
        for _ in 0..5 {
            assert!(t.admit("alice", now).await);
        }
    }

    #[tokio::test]
    async fn test_rejects_over_limit_within_window() {
        let t = throttle(5, 60);
        let now = Instant::now();
        for _ in 0..5 {
            assert!(t.admit("alice", now).await);
        }
        assert!(!t.admit("alice", now).await);
        // A rejected request is not recorded, so the count stays at 5.
        assert!(!t.admit("alice", now).await);
    }

    #[tokio::test]
    async fn test_admits_again_after_window_elapses() {
        let t = throttle(5, 60);
        let start = Instant::now();
        for _ in 0..5 {
            assert!(t.admit("alice", start).await);
        }
        assert!(!t.admit("alice", start + Duration::from_secs(59)).await);
        // The oldest counted request has aged out of the window.
        assert!(t.admit("alice", start + Duration::from_secs(61)).await);
    }

    #[tokio::test]
    async fn test_subjects_are_isolated() {
        let t = throttle(2, 60);
        let now = Instant::now();
        assert!(t.admit("alice", now).await);
        assert!(t.admit("alice", now).await);
        assert!(!t.admit("alice", now).await);
        assert!(t.admit("bob", now).await);
        assert!(t.admit("bob", now).await);
    }

    #[tokio::test]
    async fn test_sweep_evicts_idle_subjects() {
        let t = throttle(5, 60);
        let start = Instant::now();
        assert!(t.admit("idle", start).await);
        assert_eq!(t.tracked_subjects().await, 1);

        // Enough later calls from another subject to trigger a sweep after
        // "idle"'s window has fully aged out.
        let later = start + Duration::from_secs(120);
        for _ in 0..SWEEP_EVERY {
            t.admit("busy", later).await;
        }
        assert_eq!(t.tracked_subjects().await, 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_no_over_admission_under_contention() {
        let t = Arc::new(throttle(5, 60));
        let now = Instant::now();
        let mut handles = Vec::new();
        for _ in 0..6 {
            let t = t.clone();
            handles.push(tokio::spawn(async move { t.admit("racer", now).await }));
        }
        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 5, "exactly one of six racing requests must lose");
    }
}
