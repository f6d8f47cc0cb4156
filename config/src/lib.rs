//! vos Configuration System
//!
//! # Configuration Loading Priority
//!
//! 1. Compiled-in defaults
//! 2. `/etc/vos/vos.yaml` (system-wide)
//! 3. `~/.config/vos/vos.yaml` (user)
//! 4. `./vos.yaml` (project-local)
//! 5. `VOS_CONFIG=/path/to/config.yaml` (explicit)
//! 6. Environment variables (highest priority)
//!
//! # Example Configuration
//!
//! ```yaml
//! shell:
//!   prompt: "{cwd}> "
//!   loop_delay_ms: 100
//!
//! boot:
//!   core_path: /sys/core.json
//!
//! storage:
//!   snapshot: "~/.local/share/vos/fs.json"
//!
//! logging:
//!   level: info
//! ```

#![allow(missing_docs)]

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::{expand_host_path, ConfigLoader};
pub use types::*;

/// Load configuration from default locations.
///
/// Searches for config files in order and merges them.
/// Environment variables override file values.
pub fn load() -> Result<VosConfig, ConfigError> {
    ConfigLoader::new().load()
}

/// Load configuration from a specific file.
pub fn load_from_file(path: &str) -> Result<VosConfig, ConfigError> {
    ConfigLoader::new().with_file(path).load()
}
