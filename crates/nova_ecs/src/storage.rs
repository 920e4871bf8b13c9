#[cfg(feature = "debug")]
use log::trace;

use crate::{EcsError, EntityId, Result};

/// Id-addressed slots for one component type.
///
/// The slot sequence only ever grows. Reading past its end is an
/// [`EcsError::IndexOutOfRange`], reading a hole is an [`EcsError::SlotEmpty`].
pub struct SparseStorage<C> {
  slots: Vec<Option<C>>,
}

impl<C> Default for SparseStorage<C> {
  fn default() -> Self {
    Self { slots: Vec::new() }
  }
}

impl<C> SparseStorage<C> {
  pub fn new() -> Self {
    Self::default()
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.slots.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.slots.is_empty()
  }

  #[inline]
  pub fn has(&self, index: EntityId) -> bool {
    matches!(self.slots.get(index), Some(Some(_)))
  }

  pub fn get(&self, index: EntityId) -> Result<&C> {
    match self.slots.get(index) {
      Some(Some(component)) => Ok(component),
      Some(None) => Err(EcsError::SlotEmpty { index }),
      None => Err(self.out_of_range(index)),
    }
  }

  pub fn get_mut(&mut self, index: EntityId) -> Result<&mut C> {
    let len = self.slots.len();
    match self.slots.get_mut(index) {
      Some(Some(component)) => Ok(component),
      Some(None) => Err(EcsError::SlotEmpty { index }),
      None => Err(EcsError::IndexOutOfRange { index, len }),
    }
  }

  /// Overwrites an existing slot. Does not grow the storage.
  pub fn set(&mut self, index: EntityId, component: C) -> Result<&mut C> {
    let len = self.slots.len();
    let slot = self
      .slots
      .get_mut(index)
      .ok_or(EcsError::IndexOutOfRange { index, len })?;

    Ok(slot.insert(component))
  }

  /// Makes sure `index` has a slot and empties it.
  #[inline]
  pub fn init_slot(&mut self, index: EntityId) {
    self.init_slot_with(index, None);
  }

  pub fn init_slot_with(&mut self, index: EntityId, value: Option<C>) {
    #[cfg(feature = "debug")]
    trace!("Initializing slot {}", index);

    self.grow_to(index);
    self.slots[index] = value;
  }

  /// Builds a component from `args` into the slot, growing the storage if needed.
  pub fn emplace<A>(&mut self, index: EntityId, args: A) -> &mut C
  where
    C: From<A>,
  {
    self.grow_to(index);
    self.slots[index].insert(C::from(args))
  }

  pub fn erase(&mut self, index: EntityId) -> Result<()> {
    let len = self.slots.len();
    let slot = self
      .slots
      .get_mut(index)
      .ok_or(EcsError::IndexOutOfRange { index, len })?;

    *slot = None;
    Ok(())
  }

  /// Occupied slots in ascending id order.
  pub fn iter(&self) -> impl Iterator<Item = (EntityId, &C)> {
    self
      .slots
      .iter()
      .enumerate()
      .filter_map(|(index, slot)| slot.as_ref().map(|c| (index, c)))
  }

  pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut C)> {
    self
      .slots
      .iter_mut()
      .enumerate()
      .filter_map(|(index, slot)| slot.as_mut().map(|c| (index, c)))
  }

  /// Empties every slot. The length is kept.
  pub fn clear(&mut self) {
    self.slots.iter_mut().for_each(|slot| *slot = None);
  }

  /// Empties the slot if it exists, used when an entity is killed.
  pub(crate) fn clear_slot(&mut self, index: EntityId) {
    if let Some(slot) = self.slots.get_mut(index) {
      *slot = None;
    }
  }

  /// One disjoint mutable handle per slot, for projecting many entities at once.
  pub(crate) fn slots_mut(&mut self) -> Vec<Option<&mut C>> {
    self.slots.iter_mut().map(Option::as_mut).collect()
  }

  fn grow_to(&mut self, index: EntityId) {
    if index >= self.slots.len() {
      self.slots.resize_with(index + 1, || None);
    }
  }

  fn out_of_range(&self, index: EntityId) -> EcsError {
    EcsError::IndexOutOfRange {
      index,
      len: self.slots.len(),
    }
  }
}
