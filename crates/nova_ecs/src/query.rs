use std::{any::type_name, cell::RefMut, time::Duration};

#[cfg(feature = "debug")]
use log::trace;
use nova_ecs_macros::all_tuples;

use crate::{
  components::Component, registry::ComponentRegistry, storage::SparseStorage,
  systems::SystemCallback, world::World, EntityId, Result,
};

/// A fixed, ordered list of component types: `()`, a single component or a tuple of them.
pub trait ComponentSet: 'static {
  /// The borrowed stores, one per listed type.
  type Stores<'w>;
  /// One `&mut C` per listed type.
  type Item<'a>;

  fn names() -> Vec<&'static str>;
  fn borrow(registry: &ComponentRegistry) -> Result<Self::Stores<'_>>;
  fn contains(stores: &Self::Stores<'_>, entity: EntityId) -> bool;
  fn fetch<'a>(stores: &'a mut Self::Stores<'_>, entity: EntityId) -> Result<Self::Item<'a>>;
  /// Projects every entity of `entities` at once. Entities missing a component are skipped.
  fn fetch_many<'a>(
    stores: &'a mut Self::Stores<'_>,
    entities: &[EntityId],
  ) -> Vec<(EntityId, Self::Item<'a>)>;
}

impl ComponentSet for () {
  type Stores<'w> = ();
  type Item<'a> = ();

  fn names() -> Vec<&'static str> {
    Vec::new()
  }

  fn borrow(_: &ComponentRegistry) -> Result<Self::Stores<'_>> {
    Ok(())
  }

  #[inline]
  fn contains(_: &Self::Stores<'_>, _: EntityId) -> bool {
    true
  }

  #[inline]
  fn fetch<'a>(_: &'a mut Self::Stores<'_>, _: EntityId) -> Result<Self::Item<'a>> {
    Ok(())
  }

  fn fetch_many<'a>(
    _: &'a mut Self::Stores<'_>,
    entities: &[EntityId],
  ) -> Vec<(EntityId, Self::Item<'a>)> {
    entities.iter().map(|&entity| (entity, ())).collect()
  }
}

macro_rules! impl_component_set {
  ($($params:ident),*) => {
    #[allow(unused_parens, non_snake_case)]
    impl<$($params: Component),*> ComponentSet for ($($params),*) {
      type Stores<'w> = ($(RefMut<'w, SparseStorage<$params>>),*);
      type Item<'a> = ($(&'a mut $params),*);

      fn names() -> Vec<&'static str> {
        vec![$(type_name::<$params>()),*]
      }

      fn borrow(registry: &ComponentRegistry) -> Result<Self::Stores<'_>> {
        $(
          let $params = registry.borrow_mut::<$params>()?;
        )*
        Ok(($($params),*))
      }

      #[inline]
      fn contains(stores: &Self::Stores<'_>, entity: EntityId) -> bool {
        let ($($params),*) = stores;
        $($params.has(entity))&&*
      }

      #[inline]
      fn fetch<'a>(stores: &'a mut Self::Stores<'_>, entity: EntityId) -> Result<Self::Item<'a>> {
        let ($($params),*) = stores;
        Ok(($($params.get_mut(entity)?),*))
      }

      fn fetch_many<'a>(
        stores: &'a mut Self::Stores<'_>,
        entities: &[EntityId],
      ) -> Vec<(EntityId, Self::Item<'a>)> {
        let ($($params),*) = stores;
        $(
          let mut $params = $params.slots_mut();
        )*

        entities
          .iter()
          .filter_map(|&entity| Some((entity, ($($params.get_mut(entity)?.take()?),*))))
          .collect()
      }
    }
  };
}

all_tuples!(impl_component_set, 1, 12, C);

/// Entities owning every component of `Q`.
///
/// Holds exclusive borrows of the listed stores until dropped, so the world can still be
/// read through [`Query::world`] but those stores cannot be borrowed a second time.
pub struct Query<'w, Q: ComponentSet> {
  world: &'w World,
  stores: Q::Stores<'w>,
}

impl<'w, Q: ComponentSet> Query<'w, Q> {
  pub(crate) fn new(world: &'w World) -> Result<Self> {
    #[cfg(feature = "debug")]
    trace!("Querying Components {:?}", Q::names());

    Ok(Self {
      world,
      stores: Q::borrow(world.components())?,
    })
  }

  #[inline]
  pub fn world(&self) -> &'w World {
    self.world
  }

  #[inline]
  pub fn contains(&self, entity: EntityId) -> bool {
    self.world.is_alive(entity) && Q::contains(&self.stores, entity)
  }

  /// Matching live entities in ascending id order.
  pub fn entities(&self) -> Vec<EntityId> {
    self
      .world
      .entities()
      .live_ids()
      .filter(|&entity| Q::contains(&self.stores, entity))
      .collect()
  }

  /// Fails with the store's own error if any listed component is missing.
  pub fn components_of(&mut self, entity: EntityId) -> Result<Q::Item<'_>> {
    Q::fetch(&mut self.stores, entity)
  }

  /// Every matching entity paired with its components, in ascending id order.
  pub fn all(&mut self) -> Vec<(EntityId, Q::Item<'_>)> {
    let entities = self.entities();
    Q::fetch_many(&mut self.stores, &entities)
  }

  /// Calls `callback` for every matching entity in ascending id order.
  pub fn for_each<F: SystemCallback<Q>>(&mut self, time: Duration, mut callback: F) -> Result<()> {
    for entity in self.entities() {
      let item = Q::fetch(&mut self.stores, entity)?;
      callback.call(self.world, time, entity, item);
    }

    Ok(())
  }
}
