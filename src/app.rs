use std::{collections::BTreeMap, fmt::Debug};

use log::debug;
use nova_ecs::{World, WorldConfig};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
  #[error("World key {0} already exists")]
  KeyAlreadyExists(String),
  #[error("World key {0} not found")]
  KeyNotFound(String),
}

/// Independent worlds addressed by key.
pub struct App<K = usize> {
  worlds: BTreeMap<K, World>,
}

impl<K> Default for App<K> {
  fn default() -> Self {
    Self {
      worlds: BTreeMap::new(),
    }
  }
}

impl<K: Ord + Debug> App<K> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Fails if `key` is taken, the world stored under it stays untouched.
  pub fn add_world(&mut self, key: K, world: World) -> Result<(), AppError> {
    if self.worlds.contains_key(&key) {
      return Err(AppError::KeyAlreadyExists(format!("{:?}", key)));
    }

    debug!("Adding World {:?}", key);
    self.worlds.insert(key, world);
    Ok(())
  }

  pub fn create_world(&mut self, key: K, config: WorldConfig) -> Result<&mut World, AppError> {
    if self.worlds.contains_key(&key) {
      return Err(AppError::KeyAlreadyExists(format!("{:?}", key)));
    }

    debug!("Creating World {:?}", key);
    Ok(self.worlds.entry(key).or_insert(World::with_config(config)))
  }

  pub fn world(&self, key: &K) -> Result<&World, AppError> {
    self.worlds.get(key).ok_or_else(|| not_found(key))
  }

  pub fn world_mut(&mut self, key: &K) -> Result<&mut World, AppError> {
    self.worlds.get_mut(key).ok_or_else(|| not_found(key))
  }

  pub fn remove_world(&mut self, key: &K) -> Result<World, AppError> {
    debug!("Removing World {:?}", key);
    self.worlds.remove(key).ok_or_else(|| not_found(key))
  }

  #[inline]
  pub fn contains(&self, key: &K) -> bool {
    self.worlds.contains_key(key)
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.worlds.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.worlds.is_empty()
  }

  pub fn keys(&self) -> impl Iterator<Item = &K> {
    self.worlds.keys()
  }
}

fn not_found<K: Debug>(key: &K) -> AppError {
  AppError::KeyNotFound(format!("{:?}", key))
}
