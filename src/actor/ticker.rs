//! Ticker Actor: Dedicated thread for UI frame pacing.
//!
//! The race paces itself; the ticker only decides how often the main loop
//! repaints. Ticks never queue: if the main loop is busy, missed ticks are
//! dropped.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Longest single sleep, so shutdown is noticed promptly.
const MAX_SLEEP: Duration = Duration::from_millis(20);

/// A tick event sent at regular intervals.
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    /// Frame number (monotonically increasing, gaps when ticks are dropped).
    pub frame: u64,
    /// Time elapsed since the ticker was started.
    pub elapsed: Duration,
}

/// Ticker actor that generates regular timing events.
pub struct TickerActor {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
    tick_rx: Receiver<Tick>,
}

impl TickerActor {
    /// Spawn a ticker firing every `interval`.
    pub fn spawn(interval: Duration) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let (tick_tx, tick_rx) = bounded(1);

        let handle = thread::Builder::new()
            .name("paddock-ticker".to_string())
            .spawn(move || Self::run_loop(&tick_tx, &shutdown_clone, interval))
            .expect("Failed to spawn ticker thread");

        Self {
            handle: Some(handle),
            shutdown,
            tick_rx,
        }
    }

    /// Spawn a ticker at `fps` frames per second (at least 1).
    pub fn from_fps(fps: u32) -> Self {
        Self::spawn(Duration::from_secs(1) / fps.max(1))
    }

    /// Receiver for `select!` loops.
    #[inline]
    pub const fn receiver(&self) -> &Receiver<Tick> {
        &self.tick_rx
    }

    /// Signal the ticker to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the ticker thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn run_loop(tick_tx: &Sender<Tick>, shutdown: &AtomicBool, interval: Duration) {
        let start = Instant::now();
        let mut frame = 0u64;
        let mut deadline = start + interval;

        while !shutdown.load(Ordering::Relaxed) {
            let now = Instant::now();
            if now < deadline {
                thread::sleep((deadline - now).min(MAX_SLEEP));
                continue;
            }

            let tick = Tick {
                frame,
                elapsed: now - start,
            };
            if let Err(TrySendError::Disconnected(_)) = tick_tx.try_send(tick) {
                break;
            }

            frame += 1;
            deadline += interval;
            // Fell behind: restart the schedule instead of bursting.
            if deadline < now {
                deadline = now + interval;
            }
        }
    }
}

impl Drop for TickerActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_basic() {
        let ticker = TickerActor::spawn(Duration::from_millis(10));

        let tick = ticker
            .receiver()
            .recv_timeout(Duration::from_millis(500))
            .unwrap();
        assert_eq!(tick.frame, 0);

        let tick2 = ticker.receiver().recv_timeout(Duration::from_millis(500));
        assert!(tick2.unwrap().frame >= 1);

        ticker.join();
    }

    #[test]
    fn test_ticker_from_fps_zero_is_clamped() {
        let ticker = TickerActor::from_fps(0);
        ticker.join();
    }
}
