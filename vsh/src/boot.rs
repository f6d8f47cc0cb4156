//! First-run installation of the core image and session startup.
//!
//! The interpreter a session runs is always built from the image persisted
//! in the virtual filesystem. On a fresh filesystem the canonical image is
//! written once; after that the persisted copy is loaded as-is.

use crate::error::{VshError, VshResult};
use crate::help;
use crate::shell::{Shell, ShellBuilder};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const CORE_NAME: &str = "vsh";
pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DEFAULT_CORE_PATH: &str = "/sys/core.json";

/// Persisted interpreter definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreImage {
    pub name: String,
    pub version: String,
    pub commands: Vec<String>,
    pub checksum: String,
}

fn compute_checksum(name: &str, version: &str, commands: &[String]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update(b"\n");
    hasher.update(version.as_bytes());
    hasher.update(b"\n");
    hasher.update(commands.join(",").as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

impl CoreImage {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        commands: Vec<String>,
    ) -> Self {
        let name = name.into();
        let version = version.into();
        let checksum = compute_checksum(&name, &version, &commands);
        Self {
            name,
            version,
            commands,
            checksum,
        }
    }

    /// The image this build installs: every built-in command enabled.
    pub fn canonical() -> Self {
        Self::new(
            CORE_NAME,
            CORE_VERSION,
            help::command_names().map(str::to_string).collect(),
        )
    }

    pub fn verify(&self) -> VshResult<()> {
        let expected = compute_checksum(&self.name, &self.version, &self.commands);
        if expected != self.checksum {
            return Err(VshError::Image(format!(
                "checksum mismatch for {} {}",
                self.name, self.version
            )));
        }
        Ok(())
    }

    pub fn to_json(&self) -> VshResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> VshResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStatus {
    Created,
    AlreadyPresent,
    Failed,
}

pub struct Bootloader {
    builder: ShellBuilder,
    core_path: String,
}

impl Bootloader {
    pub fn new(builder: ShellBuilder, core_path: impl Into<String>) -> Self {
        Self {
            builder,
            core_path: core_path.into(),
        }
    }

    /// Writes the canonical image unless one is already persisted. Write
    /// failures are reported on the terminal and are not fatal.
    pub async fn install(&self) -> InstallStatus {
        let fs = self.builder.fs();
        let terminal = self.builder.terminal();

        if fs.exists(&self.core_path).await {
            tracing::info!(path = %self.core_path, "core image already installed");
            terminal.write_line("OS core already exists.");
            return InstallStatus::AlreadyPresent;
        }

        terminal.write_line("Creating OS core...");
        let result = match CoreImage::canonical().to_json() {
            Ok(json) => fs.write_file(&self.core_path, &json).await.map_err(VshError::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                tracing::info!(path = %self.core_path, "core image installed");
                terminal.write_line("OS core created successfully.");
                InstallStatus::Created
            }
            Err(e) => {
                tracing::warn!(path = %self.core_path, error = %e, "core image install failed");
                terminal.write_error(&format!("Error creating OS core: {e}"));
                InstallStatus::Failed
            }
        }
    }

    /// Reads and verifies the persisted image.
    pub async fn load(&self) -> VshResult<CoreImage> {
        self.builder.terminal().write_line("Loading OS core...");

        let json = self.builder.fs().read_file(&self.core_path).await?;
        let image = CoreImage::from_json(&json)?;
        image.verify()?;

        if image.version != CORE_VERSION {
            tracing::warn!(
                persisted = %image.version,
                builtin = CORE_VERSION,
                "persisted core image version differs from this build"
            );
        }
        Ok(image)
    }

    /// Installs if needed, loads, and builds a session from the persisted
    /// image. Returns `None` after reporting a load failure.
    pub async fn start(self) -> Option<Shell> {
        self.builder.terminal().write_line("Bootloader starting...");
        self.install().await;

        let loaded = self.load().await;
        match loaded {
            Ok(image) => {
                tracing::info!(name = %image.name, version = %image.version, "core image loaded");
                self.builder.terminal().write_line("OS core loaded. Executing...");
                Some(self.builder.image(image).build())
            }
            Err(e) => {
                tracing::warn!(error = %e, "core image load failed");
                self.builder
                    .terminal()
                    .write_error(&format!("Error loading or executing OS core: {e}"));
                None
            }
        }
    }

    /// Full startup: install, load, then run the session until it stops.
    pub async fn boot(self) {
        if let Some(mut shell) = self.start().await {
            shell.run().await;
        }
    }
}
