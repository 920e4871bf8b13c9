use std::{any::type_name, time::Duration};

use nova_ecs_macros::all_tuples;

use crate::{components::Component, query::ComponentSet, world::World, EntityId, Result};

/// A callback run once per entity owning every component of `Q`.
///
/// Implemented for every `FnMut(&World, Duration, EntityId, &mut C0, .., &mut Cn)`.
/// Closures need their argument types spelled out.
pub trait SystemCallback<Q: ComponentSet> {
  fn call(&mut self, world: &World, time: Duration, entity: EntityId, components: Q::Item<'_>);
}

impl<Func> SystemCallback<()> for Func
where
  Func: FnMut(&World, Duration, EntityId),
{
  #[inline]
  fn call(&mut self, world: &World, time: Duration, entity: EntityId, _: ()) {
    self(world, time, entity)
  }
}

macro_rules! impl_system_callback {
  ($($params:ident),*) => {
    #[allow(unused_parens, non_snake_case)]
    impl<Func, $($params: Component),*> SystemCallback<($($params),*)> for Func
    where
      Func: FnMut(&World, Duration, EntityId, $(&mut $params),*),
    {
      #[inline]
      fn call(
        &mut self,
        world: &World,
        time: Duration,
        entity: EntityId,
        components: <($($params),*) as ComponentSet>::Item<'_>,
      ) {
        let ($($params),*) = components;
        self(world, time, entity, $($params),*)
      }
    }
  };
}

all_tuples!(impl_system_callback, 1, 12, C);

/// The name a system gets when registered without one.
pub fn system_name_of<F>(_: &F) -> &'static str {
  type_name::<F>()
}

pub(crate) type SystemFn = Box<dyn FnMut(&World, Duration, EntityId) -> Result<()>>;

/// Wraps `callback` so it only runs for entities owning every component of `Q`.
pub(crate) fn into_system_fn<Q, F>(mut callback: F) -> SystemFn
where
  Q: ComponentSet,
  F: SystemCallback<Q> + 'static,
{
  Box::new(
    move |world: &World, time: Duration, entity: EntityId| -> Result<()> {
      let mut stores = Q::borrow(world.components())?;
      if !Q::contains(&stores, entity) {
        return Ok(());
      }

      let components = Q::fetch(&mut stores, entity)?;
      callback.call(world, time, entity, components);
      Ok(())
    },
  )
}
