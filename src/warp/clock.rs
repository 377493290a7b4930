use std::time::{Duration, Instant};

const STEP: Duration = Duration::from_millis(5);

/// Monotonic tick pacing. Each tick gets a fixed budget; a tick that overruns
/// its budget starts the next one immediately instead of trying to catch up.
#[derive(Clone, Debug)]
pub struct FrameClock {
    interval: Duration,
    deadline: Instant,
}

impl FrameClock {
    pub fn new(interval: Duration, start: Instant) -> Self {
        Self {
            interval,
            deadline: start + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn faster(&mut self) {
        self.interval = self.interval.saturating_sub(STEP);
    }

    pub fn slower(&mut self) {
        self.interval += STEP;
    }

    /// Time left in the current tick, then arms the next deadline.
    pub fn next_wait(&mut self, now: Instant) -> Duration {
        let wait = self.deadline.saturating_duration_since(now);
        self.deadline = if wait.is_zero() {
            now + self.interval
        } else {
            self.deadline + self.interval
        };
        wait
    }

    pub fn wait(&mut self) {
        let d = self.next_wait(Instant::now());
        if !d.is_zero() {
            std::thread::sleep(d);
        }
    }
}
