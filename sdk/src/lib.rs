//! Collaborator contract between the vos shell and a virtual filesystem.
//!
//! The shell only ever talks to storage through [`FileSystem`]. Every path it
//! hands over is absolute; backends own normalization, layout, and
//! persistence.

mod error;
mod provider;

pub use error::{FsError, FsResult};
pub use provider::FileSystem;
