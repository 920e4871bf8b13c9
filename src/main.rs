use std::time::Duration;

use anyhow::Result;
use log::info;
use nova::{
  config::EngineConfig,
  ecs::{Component, EntityId, World},
  utils::logger::LogConfig,
  App,
};

#[derive(Component, Debug)]
struct Stats {
  a: i32,
  b: i32,
}

#[derive(Component, Debug)]
struct Tag {
  a: i32,
}

fn bump(_: &World, time: Duration, id: EntityId, stats: &mut Stats, tag: &mut Tag) {
  info!("bump entity {} after {:?}: {:?}, tag = {}", id, time, stats, tag.a);
  tag.a = 42;
  stats.a += 1;
}

fn report(world: &World, time: Duration, id: EntityId) {
  info!("report entity {} of {} after {:?}", id, world.entity_count(), time);
}

fn main() -> Result<()> {
  let config = EngineConfig::default().set_log_config(LogConfig::default().set_file_path(None));
  // RUST_LOG switches to env_logger's filtering
  if std::env::var_os("RUST_LOG").is_some() {
    env_logger::init();
  } else {
    config.log.clone().init()?;
  }

  let mut app = App::new();
  let world = app.create_world(0, config.world.clone())?;

  world.register_component::<Stats>()?;
  world.register_component::<Tag>()?;
  world.add_system::<(Stats, Tag), _>(bump)?;
  world.add_system::<(), _>(report)?;

  for _ in 0..4 {
    world.create_entity();
  }
  world.add_component_to_entity(0, Stats { a: 1, b: 2 })?;
  world.add_component_to_entity(2, Stats { a: 3, b: 4 })?;
  world.add_component_to_entity(2, Tag { a: 5 })?;

  world.init();
  for _ in 0..3 {
    world.run_systems()?;
  }

  let stats = world.get_component::<Stats>()?;
  for (id, stats) in stats.iter() {
    info!("entity {} ended with a = {}, b = {}", id, stats.a, stats.b);
  }

  Ok(())
}
