pub mod app_config;
pub mod database;
pub mod memory;
pub mod redis_repo;

#[cfg(feature = "kafka")]
pub mod events;

pub use database::{DbClient, PostgresInventory};
pub use memory::MemoryLeaseStore;
pub use redis_repo::RedisLeaseStore;

#[cfg(feature = "kafka")]
pub use events::EventProducer;
