pub mod app;
pub mod config;

pub use log;
pub use nova_ecs as ecs;
pub use nova_utils as utils;

pub use app::{App, AppError};
pub use config::EngineConfig;
