use nova_ecs::WorldConfig;
use nova_utils::logger::LogConfig;

#[derive(Default, Clone)]
pub struct EngineConfig {
  pub log: LogConfig,
  pub world: WorldConfig,
}

impl EngineConfig {
  pub fn set_log_config(mut self, log: LogConfig) -> Self {
    self.log = log;
    self
  }

  pub fn set_world_config(mut self, world: WorldConfig) -> Self {
    self.world = world;
    self
  }
}
