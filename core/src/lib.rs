//! vos Core - filesystem backends for the vos shell.
//!
//! [`MemoryFs`] keeps the whole tree in memory; [`Snapshot`] moves it to and
//! from a JSON file on the host so an installation survives restarts.

pub mod providers;
pub mod snapshot;

pub use providers::MemoryFs;
pub use snapshot::Snapshot;
pub use vos_sdk;
