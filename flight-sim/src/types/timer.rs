use chrono::Duration;
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, RwLock,
    },
    thread::{self, JoinHandle},
    time::{Duration as StdDuration, Instant},
};

use logger::Logger;

use super::sim_error::SimError;
use super::MAX_TIME_RATE_SECONDS;

/// Replay clock.
///
/// Every `tick_period` of real time the clock advances by `tick_advance` of
/// simulated time and the tick callback receives the new elapsed time.
pub struct Timer {
    pub elapsed: Mutex<Duration>,
    pub tick_advance: RwLock<Duration>,
    tick_period: StdDuration,
    pub running: AtomicBool,
    pub paused: AtomicBool,
    logger: Logger,
}

impl Timer {
    /// Creates a stopped clock at zero elapsed seconds.
    pub fn new(tick_period_millis: u64, tick_advance_seconds: i64, logger: Logger) -> Arc<Self> {
        Arc::new(Self {
            elapsed: Mutex::new(Duration::zero()),
            tick_advance: RwLock::new(Duration::seconds(tick_advance_seconds)),
            tick_period: StdDuration::from_millis(tick_period_millis.max(1)),
            running: AtomicBool::new(false),
            paused: AtomicBool::new(false),
            logger,
        })
    }

    /// Changes the simulated seconds advanced per tick.
    pub fn set_tick_advance(&self, seconds: i64) -> Result<(), SimError> {
        if seconds <= 0 || seconds > MAX_TIME_RATE_SECONDS {
            return Err(SimError::InvalidDuration(seconds.to_string()));
        }

        let mut tick_advance = self.tick_advance.write().map_err(|_| {
            SimError::TimerLockError("Failed to acquire write lock for tick_advance.".to_string())
        })?;
        *tick_advance = Duration::seconds(seconds);
        Ok(())
    }

    pub fn tick_period(&self) -> StdDuration {
        self.tick_period
    }

    /// Elapsed simulated time in seconds.
    pub fn elapsed_seconds(&self) -> Result<f64, SimError> {
        let elapsed = self.elapsed.lock().map_err(|_| {
            SimError::TimerLockError("Failed to acquire lock on elapsed.".to_string())
        })?;
        Ok(elapsed.num_milliseconds() as f64 / 1000.0)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Advances the clock by one tick and returns the new elapsed seconds.
    fn advance(&self) -> Result<f64, SimError> {
        let tick_advance = *self.tick_advance.read().map_err(|_| {
            SimError::TimerLockError("Failed to acquire read lock on tick_advance.".to_string())
        })?;
        let mut elapsed = self.elapsed.lock().map_err(|_| {
            SimError::TimerLockError("Failed to acquire lock on elapsed.".to_string())
        })?;
        *elapsed += tick_advance;
        Ok(elapsed.num_milliseconds() as f64 / 1000.0)
    }

    /// Starts the clock on its own thread, calling `tick_callback` with the
    /// elapsed seconds and the tick count on every tick until [`Timer::stop`].
    pub fn start(
        self: Arc<Self>,
        tick_callback: impl Fn(f64, u64) + Send + 'static,
    ) -> Result<JoinHandle<()>, SimError> {
        self.running.store(true, Ordering::SeqCst);

        thread::Builder::new()
            .name("replay-timer".to_string())
            .spawn(move || {
                let mut tick_count = 0;
                while self.running.load(Ordering::SeqCst) {
                    if self.paused.load(Ordering::SeqCst) {
                        thread::sleep(StdDuration::from_millis(50));
                        continue;
                    }

                    let now = Instant::now();

                    match self.advance() {
                        Ok(elapsed) => {
                            tick_count += 1;
                            tick_callback(elapsed, tick_count);
                        }
                        Err(e) => {
                            let _ = self.logger.error(&format!("{}. Skipping tick.", e), true);
                        }
                    }

                    let sleep_duration = self.tick_period().saturating_sub(now.elapsed());
                    thread::sleep(sleep_duration);
                }

                let _ = self.logger.debug("Timer stopped.");
            })
            .map_err(|_| SimError::TimerStartError("Failed to start the timer thread.".to_string()))
    }
}
