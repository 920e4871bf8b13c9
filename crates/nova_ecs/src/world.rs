use std::{
  cell::{Ref, RefCell, RefMut},
  mem,
};

use log::debug;

use crate::{
  commands::Commands,
  components::Component,
  config::{TickPolicy, WorldConfig},
  entity::EntityAllocator,
  query::{ComponentSet, Query},
  registry::ComponentRegistry,
  scheduler::Scheduler,
  storage::SparseStorage,
  systems::{into_system_fn, system_name_of, SystemCallback},
  EcsError, EntityId, Result,
};

/// Entities, their components and the systems run over them.
///
/// Component types only reach entities created after their registration: an entity
/// created earlier has no slot for the type until something grows the store past its id.
pub struct World {
  components: ComponentRegistry,
  entities: EntityAllocator,
  scheduler: Scheduler,
  commands: RefCell<Commands>,
}

impl Default for World {
  fn default() -> Self {
    Self::with_config(WorldConfig::default())
  }
}

impl World {
  pub fn new() -> Self {
    World::default()
  }

  pub fn with_config(config: WorldConfig) -> Self {
    debug!("Creating World");

    Self {
      components: ComponentRegistry::new(),
      entities: EntityAllocator::new(),
      scheduler: Scheduler::new(config.tick_policy),
      commands: RefCell::new(Commands::new()),
    }
  }

  #[inline]
  pub fn components(&self) -> &ComponentRegistry {
    &self.components
  }

  #[inline]
  pub fn entities(&self) -> &EntityAllocator {
    &self.entities
  }

  #[inline]
  pub fn tick_policy(&self) -> TickPolicy {
    self.scheduler.policy()
  }

  pub fn register_component<C: Component>(&mut self) -> Result<&mut SparseStorage<C>> {
    self.components.register::<C>()
  }

  /// Shared access to a store. Fails while a running system or a live [`Query`] holds it.
  pub fn get_component<C: Component>(&self) -> Result<Ref<'_, SparseStorage<C>>> {
    self.components.get::<C>()
  }

  pub fn get_component_mut<C: Component>(&mut self) -> Result<&mut SparseStorage<C>> {
    self.components.get_mut::<C>()
  }

  pub fn remove_component<C: Component>(&mut self) -> Result<()> {
    self.components.remove::<C>()
  }

  /// Overwrites `entity`'s slot. The slot must exist already.
  pub fn add_component_to_entity<C: Component>(
    &mut self,
    entity: EntityId,
    component: C,
  ) -> Result<&mut C> {
    self.components.get_mut::<C>()?.set(entity, component)
  }

  /// Builds the component from `args`, growing the store if the slot is missing.
  pub fn emplace_component_to_entity<C, A>(&mut self, entity: EntityId, args: A) -> Result<&mut C>
  where
    C: Component + From<A>,
  {
    Ok(self.components.get_mut::<C>()?.emplace(entity, args))
  }

  pub fn remove_component_from_entity<C: Component>(&mut self, entity: EntityId) -> Result<()> {
    self.components.get_mut::<C>()?.erase(entity)
  }

  pub fn create_entity(&mut self) -> EntityId {
    let id = self.entities.allocate();
    debug!("Creating entity {}", id);

    self.components.init_entity(id);
    id
  }

  pub fn kill_entity(&mut self, entity: EntityId) -> Result<()> {
    self.entities.release(entity)?;
    debug!("Killing entity {}", entity);

    self.components.erase_entity(entity);
    Ok(())
  }

  #[inline]
  pub fn is_alive(&self, entity: EntityId) -> bool {
    self.entities.is_alive(entity)
  }

  #[inline]
  pub fn entity_count(&self) -> usize {
    self.entities.len()
  }

  /// Registers `callback` under its type name, see [`system_name_of`].
  pub fn add_system<Q, F>(&mut self, callback: F) -> Result<()>
  where
    Q: ComponentSet,
    F: SystemCallback<Q> + 'static,
  {
    let name = system_name_of(&callback);
    self.add_named_system::<Q, F>(name, callback)
  }

  pub fn add_named_system<Q, F>(&mut self, name: impl Into<String>, callback: F) -> Result<()>
  where
    Q: ComponentSet,
    F: SystemCallback<Q> + 'static,
  {
    self
      .scheduler
      .add(name.into(), into_system_fn::<Q, F>(callback))
  }

  pub fn remove_system(&mut self, name: &str) -> Result<()> {
    self.scheduler.remove(name)
  }

  /// Always false while the systems themselves are running.
  #[inline]
  pub fn has_system(&self, name: &str) -> bool {
    self.scheduler.contains(name)
  }

  pub fn system_names(&self) -> Vec<&str> {
    self.scheduler.names().collect()
  }

  #[inline]
  pub fn system_count(&self) -> usize {
    self.scheduler.len()
  }

  /// Restarts the clocks, call it right before the first tick.
  pub fn init(&mut self) {
    self.scheduler.init();
  }

  /// Runs one tick, then applies the commands the systems queued.
  ///
  /// A failing system stops the tick. Queued commands are still applied, but the
  /// system's error is the one returned.
  pub fn run_systems(&mut self) -> Result<()> {
    let mut scheduler = mem::take(&mut self.scheduler);
    let result = scheduler.run(self);
    self.scheduler = scheduler;

    let applied = self.apply_commands();
    result.and(applied)
  }

  pub fn query<Q: ComponentSet>(&self) -> Result<Query<'_, Q>> {
    Query::new(self)
  }

  /// The deferred command queue.
  ///
  /// # Panics
  /// If a handle returned by an earlier call is still alive, see [`World::try_commands`].
  pub fn commands(&self) -> RefMut<'_, Commands> {
    self.commands.borrow_mut()
  }

  pub fn try_commands(&self) -> Result<RefMut<'_, Commands>> {
    self
      .commands
      .try_borrow_mut()
      .map_err(|_| EcsError::CommandsBorrowed)
  }

  pub fn apply_commands(&mut self) -> Result<()> {
    let commands = self.commands.get_mut().take();
    Commands::execute(commands, self)
  }
}
