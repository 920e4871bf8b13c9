use std::time::{Duration, Instant};

/// Measures the time between two calls to [`Clock::restart`].
#[derive(Clone, Copy, Debug)]
pub struct Clock {
  last: Instant,
  delta: Duration,
}

impl Clock {
  pub fn new() -> Self {
    Self {
      last: Instant::now(),
      delta: Duration::ZERO,
    }
  }

  /// Stores and returns the time elapsed since the previous restart (or since creation).
  pub fn restart(&mut self) -> Duration {
    let now = Instant::now();
    self.delta = now.duration_since(self.last);
    self.last = now;
    self.delta
  }

  /// The delta measured by the last [`Clock::restart`], zero before the first one.
  #[inline]
  pub fn elapsed_time(&self) -> Duration {
    self.delta
  }

  /// Time since the last restart, without restarting.
  #[inline]
  pub fn since_restart(&self) -> Duration {
    self.last.elapsed()
  }
}

impl Default for Clock {
  fn default() -> Self {
    Self::new()
  }
}
