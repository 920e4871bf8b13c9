/// How the time delta handed to systems is measured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TickPolicy {
  /// One world clock, restarted once per tick. Every system sees the same delta.
  #[default]
  Shared,
  /// Every system owns a clock restarted at the start of each tick, so deltas drift
  /// independently per system.
  PerSystem,
}

#[derive(Clone, Debug, Default)]
pub struct WorldConfig {
  pub tick_policy: TickPolicy,
}

impl WorldConfig {
  pub fn set_tick_policy(mut self, tick_policy: TickPolicy) -> Self {
    self.tick_policy = tick_policy;
    self
  }
}
