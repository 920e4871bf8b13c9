use thiserror::Error;

use crate::EntityId;

pub type Result<T, E = EcsError> = std::result::Result<T, E>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
  #[error("Component {component} already registered")]
  ComponentAlreadyRegistered { component: &'static str },
  #[error("Component {component} not registered")]
  ComponentNotRegistered { component: &'static str },
  #[error("Component {component} is already borrowed")]
  ComponentBorrowed { component: &'static str },
  #[error("System {name} already registered")]
  SystemAlreadyRegistered { name: String },
  #[error("System {name} not registered")]
  SystemNotRegistered { name: String },
  #[error("Index out of range: {index} (length {len})")]
  IndexOutOfRange { index: EntityId, len: usize },
  #[error("Index is empty: {index}")]
  SlotEmpty { index: EntityId },
  #[error("Command queue is already borrowed")]
  CommandsBorrowed,
  #[error("Entity {entity} is not alive")]
  EntityNotAlive { entity: EntityId },
}
