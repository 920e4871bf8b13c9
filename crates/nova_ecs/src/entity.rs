use std::collections::BTreeSet;

use crate::{EcsError, EntityId, Result};

/// Hands out entity ids, always reusing the smallest released one first.
#[derive(Default, Debug)]
pub struct EntityAllocator {
  free: BTreeSet<EntityId>,
  next_id: EntityId,
}

impl EntityAllocator {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn allocate(&mut self) -> EntityId {
    if let Some(id) = self.free.pop_first() {
      id
    } else {
      let id = self.next_id;
      self.next_id += 1;
      id
    }
  }

  /// Returns `entity` to the free pool. Releasing a dead id is rejected so the pool
  /// never holds duplicates.
  pub fn release(&mut self, entity: EntityId) -> Result<()> {
    if !self.is_alive(entity) {
      return Err(EcsError::EntityNotAlive { entity });
    }

    self.free.insert(entity);
    Ok(())
  }

  #[inline]
  pub fn is_alive(&self, entity: EntityId) -> bool {
    entity < self.next_id && !self.free.contains(&entity)
  }

  /// One past the highest id ever handed out.
  #[inline]
  pub fn ceiling(&self) -> EntityId {
    self.next_id
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.next_id - self.free.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Live ids in ascending order.
  pub fn live_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
    (0..self.next_id).filter(|id| !self.free.contains(id))
  }
}
