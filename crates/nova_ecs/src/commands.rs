use std::marker::PhantomData;

#[cfg(feature = "debug")]
use log::trace;

use crate::{components::Component, world::World, EntityId, Result};

/// Structural changes queued while systems only hold a shared [`World`].
///
/// Applied in request order once the current tick's dispatch pass is over.
#[derive(Default)]
pub struct Commands {
  commands: Vec<Box<dyn Command>>,
}

impl Commands {
  pub fn new() -> Self {
    Commands::default()
  }

  pub fn create_entity(&mut self) {
    self.commands.push(Box::new(CreateEntityCommand { with: None }));
  }

  /// Creates an entity and hands its id to `with`, e.g. to attach components.
  pub fn create_entity_with<F>(&mut self, with: F)
  where
    F: FnOnce(&mut World, EntityId) -> Result<()> + 'static,
  {
    self.commands.push(Box::new(CreateEntityCommand {
      with: Some(Box::new(with)),
    }));
  }

  pub fn kill_entity(&mut self, entity: EntityId) {
    self.commands.push(Box::new(KillEntityCommand { id: entity }));
  }

  pub fn add_component<C: Component>(&mut self, entity: EntityId, component: C) {
    self.commands.push(Box::new(AddComponentCommand {
      id: entity,
      comp: component,
    }));
  }

  pub fn remove_component<C: Component>(&mut self, entity: EntityId) {
    self.commands.push(Box::new(RemoveComponentCommand::<C> {
      id: entity,
      marker: PhantomData,
    }));
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.commands.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.commands.is_empty()
  }

  /// Runs every queued command in order. All of them run even if one fails, the first
  /// error is returned.
  pub(crate) fn execute(commands: Vec<Box<dyn Command>>, world: &mut World) -> Result<()> {
    #[cfg(feature = "debug")]
    trace!("Executing {} Commands", commands.len());

    let mut result = Ok(());
    for cmd in commands {
      if let Err(err) = cmd.execute(world) {
        if result.is_ok() {
          result = Err(err);
        }
      }
    }
    result
  }

  pub(crate) fn take(&mut self) -> Vec<Box<dyn Command>> {
    std::mem::take(&mut self.commands)
  }
}

pub(crate) trait Command {
  fn execute(self: Box<Self>, world: &mut World) -> Result<()>;
}

type CreateHook = Box<dyn FnOnce(&mut World, EntityId) -> Result<()>>;

struct CreateEntityCommand {
  with: Option<CreateHook>,
}

impl Command for CreateEntityCommand {
  fn execute(self: Box<Self>, world: &mut World) -> Result<()> {
    let id = world.create_entity();
    match self.with {
      Some(with) => with(world, id),
      None => Ok(()),
    }
  }
}

struct KillEntityCommand {
  id: EntityId,
}

impl Command for KillEntityCommand {
  fn execute(self: Box<Self>, world: &mut World) -> Result<()> {
    world.kill_entity(self.id)
  }
}

struct AddComponentCommand<C> {
  id: EntityId,
  comp: C,
}

impl<C: Component> Command for AddComponentCommand<C> {
  fn execute(self: Box<Self>, world: &mut World) -> Result<()> {
    let AddComponentCommand { id, comp } = *self;
    world.add_component_to_entity(id, comp).map(|_| ())
  }
}

struct RemoveComponentCommand<C> {
  id: EntityId,
  marker: PhantomData<fn() -> C>,
}

impl<C: Component> Command for RemoveComponentCommand<C> {
  fn execute(self: Box<Self>, world: &mut World) -> Result<()> {
    world.remove_component_from_entity::<C>(self.id)
  }
}

#[cfg(test)]
mod test {
  use super::Commands;
  use crate::{self as nova_ecs, Component, EcsError, World};

  #[derive(Component, Debug, PartialEq)]
  struct A(u8);

  #[test]
  fn applied_in_order() {
    let mut world = World::new();
    world.register_component::<A>().unwrap();

    let mut cmds = Commands::new();
    cmds.create_entity();
    cmds.add_component(0, A(1));
    cmds.create_entity_with(|world, id| world.add_component_to_entity(id, A(2)).map(|_| ()));
    cmds.kill_entity(0);
    assert_eq!(cmds.len(), 4);

    Commands::execute(cmds.take(), &mut world).unwrap();

    assert!(cmds.is_empty());
    assert!(!world.is_alive(0));
    let a = world.get_component::<A>().unwrap();
    assert!(!a.has(0));
    assert_eq!(a.get(1).unwrap(), &A(2));
  }

  #[test]
  fn first_error_is_kept() {
    let mut world = World::new();
    world.register_component::<A>().unwrap();

    let mut cmds = Commands::new();
    cmds.kill_entity(5);
    cmds.create_entity();
    cmds.remove_component::<A>(9);

    assert_eq!(
      Commands::execute(cmds.take(), &mut world).unwrap_err(),
      EcsError::EntityNotAlive { entity: 5 }
    );
    assert_eq!(world.entity_count(), 1);
  }
}
