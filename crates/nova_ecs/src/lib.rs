pub mod commands;
pub mod components;
pub mod config;
pub mod entity;
pub mod error;
pub mod query;
pub mod registry;
pub(crate) mod scheduler;
pub mod storage;
pub mod systems;
pub mod world;

pub use commands::Commands;
pub use components::Component;
pub use config::{TickPolicy, WorldConfig};
pub use error::{EcsError, Result};
pub use nova_ecs_macros::Component;
pub use query::{ComponentSet, Query};
pub use storage::SparseStorage;
pub use systems::{system_name_of, SystemCallback};
pub use world::World;

pub type EntityId = usize;
