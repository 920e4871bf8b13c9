use std::{
  any::{type_name, Any, TypeId},
  cell::{Ref, RefCell, RefMut},
  collections::hash_map::Entry,
};

use log::debug;
use rustc_hash::FxHashMap;

use crate::{components::Component, storage::SparseStorage, EcsError, EntityId, Result};

type SlotHook = fn(&mut dyn Any, EntityId);

struct ComponentEntry {
  name: &'static str,
  storage: Box<dyn Any>,
  init: SlotHook,
  erase: SlotHook,
}

impl ComponentEntry {
  fn new<C: Component>() -> Self {
    Self {
      name: type_name::<C>(),
      storage: Box::new(RefCell::new(SparseStorage::<C>::new())),
      init: init_slot::<C>,
      erase: erase_slot::<C>,
    }
  }

  fn cell<C: Component>(&self) -> Result<&RefCell<SparseStorage<C>>> {
    self
      .storage
      .downcast_ref()
      .ok_or_else(not_registered::<C>)
  }

  fn cell_mut<C: Component>(&mut self) -> Result<&mut RefCell<SparseStorage<C>>> {
    self
      .storage
      .downcast_mut()
      .ok_or_else(not_registered::<C>)
  }
}

fn init_slot<C: Component>(storage: &mut dyn Any, entity: EntityId) {
  if let Some(cell) = storage.downcast_mut::<RefCell<SparseStorage<C>>>() {
    cell.get_mut().init_slot(entity);
  }
}

fn erase_slot<C: Component>(storage: &mut dyn Any, entity: EntityId) {
  if let Some(cell) = storage.downcast_mut::<RefCell<SparseStorage<C>>>() {
    cell.get_mut().clear_slot(entity);
  }
}

fn not_registered<C: Component>() -> EcsError {
  EcsError::ComponentNotRegistered {
    component: type_name::<C>(),
  }
}

/// One [`SparseStorage`] per component type, plus the hooks that initialize and clear an
/// entity's slot without knowing the concrete type.
#[derive(Default)]
pub struct ComponentRegistry {
  entries: FxHashMap<TypeId, ComponentEntry>,
}

impl ComponentRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register<C: Component>(&mut self) -> Result<&mut SparseStorage<C>> {
    match self.entries.entry(TypeId::of::<C>()) {
      Entry::Occupied(_) => Err(EcsError::ComponentAlreadyRegistered {
        component: type_name::<C>(),
      }),
      Entry::Vacant(slot) => {
        debug!("Registering Component {}", type_name::<C>());
        let entry = slot.insert(ComponentEntry::new::<C>());
        Ok(entry.cell_mut::<C>()?.get_mut())
      }
    }
  }

  pub fn remove<C: Component>(&mut self) -> Result<()> {
    debug!("Removing Component {}", type_name::<C>());

    self
      .entries
      .remove(&TypeId::of::<C>())
      .map(|_| ())
      .ok_or_else(not_registered::<C>)
  }

  #[inline]
  pub fn contains<C: Component>(&self) -> bool {
    self.entries.contains_key(&TypeId::of::<C>())
  }

  pub fn get<C: Component>(&self) -> Result<Ref<'_, SparseStorage<C>>> {
    self
      .cell::<C>()?
      .try_borrow()
      .map_err(|_| borrowed::<C>())
  }

  pub fn get_mut<C: Component>(&mut self) -> Result<&mut SparseStorage<C>> {
    Ok(
      self
        .entries
        .get_mut(&TypeId::of::<C>())
        .ok_or_else(not_registered::<C>)?
        .cell_mut::<C>()?
        .get_mut(),
    )
  }

  /// Exclusive access through a shared registry, fails if the store is already borrowed.
  pub fn borrow_mut<C: Component>(&self) -> Result<RefMut<'_, SparseStorage<C>>> {
    self
      .cell::<C>()?
      .try_borrow_mut()
      .map_err(|_| borrowed::<C>())
  }

  /// Gives `entity` an empty slot in every registered store.
  pub(crate) fn init_entity(&mut self, entity: EntityId) {
    for entry in self.entries.values_mut() {
      (entry.init)(entry.storage.as_mut(), entity);
    }
  }

  /// Clears `entity`'s slot in every registered store that has one.
  pub(crate) fn erase_entity(&mut self, entity: EntityId) {
    for entry in self.entries.values_mut() {
      (entry.erase)(entry.storage.as_mut(), entity);
    }
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Type names of all registered components, sorted.
  pub fn names(&self) -> Vec<&'static str> {
    let mut names = self.entries.values().map(|e| e.name).collect::<Vec<_>>();
    names.sort_unstable();
    names
  }

  fn cell<C: Component>(&self) -> Result<&RefCell<SparseStorage<C>>> {
    self
      .entries
      .get(&TypeId::of::<C>())
      .ok_or_else(not_registered::<C>)?
      .cell::<C>()
  }
}

fn borrowed<C: Component>() -> EcsError {
  EcsError::ComponentBorrowed {
    component: type_name::<C>(),
  }
}
