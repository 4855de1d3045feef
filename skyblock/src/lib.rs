pub mod config;
pub mod manager;
pub mod seed;

pub use manager::{ManagerError, WorldHandle, WorldManager};
pub use seed::SeedSource;
