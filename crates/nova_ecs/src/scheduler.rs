use std::{collections::BTreeMap, time::Duration};

use log::debug;
#[cfg(feature = "debug")]
use log::trace;
use nova_utils::time::Clock;

use crate::{config::TickPolicy, systems::SystemFn, world::World, EcsError, Result};

struct StoredSystem {
  run: SystemFn,
  clock: Clock,
}

/// Named systems, dispatched in name order.
#[derive(Default)]
pub(crate) struct Scheduler {
  systems: BTreeMap<String, StoredSystem>,
  clock: Clock,
  policy: TickPolicy,
}

impl Scheduler {
  pub fn new(policy: TickPolicy) -> Self {
    Self {
      policy,
      ..Default::default()
    }
  }

  #[inline]
  pub fn policy(&self) -> TickPolicy {
    self.policy
  }

  pub fn add(&mut self, name: String, run: SystemFn) -> Result<()> {
    if self.systems.contains_key(&name) {
      return Err(EcsError::SystemAlreadyRegistered { name });
    }

    debug!("Adding System {}", name);
    self.systems.insert(
      name,
      StoredSystem {
        run,
        clock: Clock::new(),
      },
    );
    Ok(())
  }

  pub fn remove(&mut self, name: &str) -> Result<()> {
    debug!("Removing System {}", name);

    self
      .systems
      .remove(name)
      .map(|_| ())
      .ok_or_else(|| EcsError::SystemNotRegistered { name: name.into() })
  }

  #[inline]
  pub fn contains(&self, name: &str) -> bool {
    self.systems.contains_key(name)
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.systems.keys().map(String::as_str)
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.systems.len()
  }

  pub fn init(&mut self) {
    self.clock.restart();
    for system in self.systems.values_mut() {
      system.clock.restart();
    }
  }

  /// One tick: every live entity in ascending order, every system in name order.
  pub fn run(&mut self, world: &World) -> Result<()> {
    let shared = self.clock.restart();
    let policy = self.policy;

    let deltas = self
      .systems
      .values_mut()
      .map(|system| match policy {
        TickPolicy::Shared => shared,
        TickPolicy::PerSystem => system.clock.restart(),
      })
      .collect::<Vec<Duration>>();

    #[cfg(feature = "debug")]
    trace!(
      "Running {} Systems over {} Entities",
      self.systems.len(),
      world.entity_count()
    );

    for entity in world.entities().live_ids() {
      for (system, time) in self.systems.values_mut().zip(&deltas) {
        (system.run)(world, *time, entity)?;
      }
    }

    Ok(())
  }
}

#[cfg(test)]
mod test {
  use std::{cell::RefCell, rc::Rc, time::Duration};

  use super::Scheduler;
  use crate::{config::TickPolicy, EcsError, EntityId, World};

  fn recording(log: &Rc<RefCell<Vec<(String, EntityId)>>>, name: &str) -> crate::systems::SystemFn {
    let log = log.clone();
    let name = name.to_string();
    Box::new(move |_: &World, _: Duration, entity: EntityId| {
      log.borrow_mut().push((name.clone(), entity));
      Ok(())
    })
  }

  #[test]
  fn duplicate_name() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut scheduler = Scheduler::new(TickPolicy::Shared);

    scheduler.add("a".into(), recording(&log, "a")).unwrap();

    assert_eq!(
      scheduler.add("a".into(), recording(&log, "other")).unwrap_err(),
      EcsError::SystemAlreadyRegistered { name: "a".into() }
    );
    assert_eq!(scheduler.len(), 1);
  }

  #[test]
  fn remove_unknown() {
    let mut scheduler = Scheduler::new(TickPolicy::Shared);

    assert_eq!(
      scheduler.remove("x").unwrap_err(),
      EcsError::SystemNotRegistered { name: "x".into() }
    );
  }

  #[test]
  fn entity_major_name_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut scheduler = Scheduler::new(TickPolicy::Shared);
    scheduler.add("b".into(), recording(&log, "b")).unwrap();
    scheduler.add("a".into(), recording(&log, "a")).unwrap();

    let mut world = World::new();
    for _ in 0..3 {
      world.create_entity();
    }
    world.kill_entity(1).unwrap();

    scheduler.run(&world).unwrap();

    let expected = [("a", 0), ("b", 0), ("a", 2), ("b", 2)]
      .into_iter()
      .map(|(n, e)| (n.to_string(), e))
      .collect::<Vec<_>>();
    assert_eq!(*log.borrow(), expected);
    assert_eq!(scheduler.names().collect::<Vec<_>>(), vec!["a", "b"]);
  }

  #[test]
  fn shared_delta_is_identical() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut scheduler = Scheduler::new(TickPolicy::Shared);
    for name in ["a", "b", "c"] {
      let seen = seen.clone();
      scheduler
        .add(
          name.into(),
          Box::new(move |_: &World, time: Duration, _: EntityId| {
            std::thread::sleep(Duration::from_millis(1));
            seen.borrow_mut().push(time);
            Ok(())
          }),
        )
        .unwrap();
    }

    let mut world = World::new();
    world.create_entity();
    world.create_entity();
    scheduler.init();
    scheduler.run(&world).unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 6);
    assert!(seen.iter().all(|time| *time == seen[0]));
  }

  #[test]
  fn per_system_delta() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut scheduler = Scheduler::new(TickPolicy::PerSystem);
    for name in ["a", "b"] {
      let seen = seen.clone();
      scheduler
        .add(
          name.into(),
          Box::new(move |_: &World, time: Duration, _: EntityId| {
            seen.borrow_mut().push(time);
            Ok(())
          }),
        )
        .unwrap();
    }

    let mut world = World::new();
    world.create_entity();
    world.create_entity();

    scheduler.init();
    std::thread::sleep(Duration::from_millis(2));
    scheduler.run(&world).unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 4);
    assert_eq!(seen[0], seen[2]);
    assert_eq!(seen[1], seen[3]);
    assert!(seen.iter().all(|time| *time >= Duration::from_millis(2)));
  }
}
