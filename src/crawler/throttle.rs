//! Randomized request throttling
//!
//! Every real network request is preceded by a pause drawn uniformly from the
//! configured range. Cache hits never wait.

use rand::Rng;
use std::time::Duration;

/// Draws and sleeps the politeness delay before each network request
#[derive(Debug, Clone)]
pub struct Throttle {
    min_delay: Duration,
    max_delay: Duration,

    /// Number of delays served so far
    waits: u64,

    /// Sum of all delays served so far
    total_waited: Duration,
}

impl Throttle {
    /// Creates a throttle for the inclusive range `min_delay..=max_delay`
    ///
    /// Bounds given in the wrong order are swapped.
    pub fn new(min_delay: Duration, max_delay: Duration) -> Self {
        let (min_delay, max_delay) = if min_delay <= max_delay {
            (min_delay, max_delay)
        } else {
            (max_delay, min_delay)
        };

        Self {
            min_delay,
            max_delay,
            waits: 0,
            total_waited: Duration::ZERO,
        }
    }

    /// A throttle that never sleeps
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Picks the next delay uniformly from the configured range
    pub fn next_delay(&self) -> Duration {
        let min = self.min_delay.as_millis() as u64;
        let max = self.max_delay.as_millis() as u64;
        if min == max {
            return self.min_delay;
        }

        let millis = rand::thread_rng().gen_range(min..=max);
        Duration::from_millis(millis)
    }

    /// Sleeps for a freshly drawn delay
    pub async fn wait(&mut self) -> Duration {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tracing::debug!("Waiting {:.1}s before next request", delay.as_secs_f64());
            tokio::time::sleep(delay).await;
        }

        self.waits += 1;
        self.total_waited += delay;
        delay
    }

    pub fn waits(&self) -> u64 {
        self.waits
    }

    pub fn total_waited(&self) -> Duration {
        self.total_waited
    }

    pub fn range(&self) -> (Duration, Duration) {
        (self.min_delay, self.max_delay)
    }
}
