//! Repository backends for the Pinhole URL shortener.
//!
//! [`InMemoryRepository`] is the process-local tier, [`MySqlRepository`] the
//! durable one, and [`TieredRepository`] composes the two.

pub mod memory;
pub mod mysql;
pub mod tiered;

pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;
pub use pinhole_core::{ReadRepository, Repository, StorageError, UrlRecord};
pub use tiered::TieredRepository;
