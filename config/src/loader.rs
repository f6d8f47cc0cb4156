use crate::{ConfigError, VosConfig};
use regex::Regex;
use std::path::{Path, PathBuf};

pub struct ConfigLoader {
    explicit_file: Option<PathBuf>,
    search_paths: Vec<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        let mut search_paths = Vec::new();

        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(config_dir.join("vos/vos.yaml"));
        }
        search_paths.push(PathBuf::from("./vos.yaml"));

        #[cfg(unix)]
        search_paths.insert(0, PathBuf::from("/etc/vos/vos.yaml"));

        Self {
            explicit_file: None,
            search_paths,
        }
    }

    pub fn with_file(mut self, path: &str) -> Self {
        self.explicit_file = Some(PathBuf::from(path));
        self
    }

    pub fn load(&self) -> Result<VosConfig, ConfigError> {
        let mut config = VosConfig::default();

        if let Ok(env_path) = std::env::var("VOS_CONFIG") {
            config = self.parse_file(Path::new(&env_path))?;
        } else if let Some(ref explicit) = self.explicit_file {
            config = self.parse_file(explicit)?;
        } else {
            for path in &self.search_paths {
                if path.exists() {
                    let overlay = self.parse_file(path)?;
                    config = self.merge_configs(&config, &overlay);
                    tracing::debug!(path = %path.display(), "Merged config file");
                }
            }
        }

        self.apply_env_overrides(&mut config);
        self.validate(&config)?;
        Ok(config)
    }

    fn parse_file(&self, path: &Path) -> Result<VosConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        let expanded = self.expand_env_vars(&content);
        if path.extension().is_some_and(|ext| ext == "json") {
            Ok(serde_json::from_str(&expanded)?)
        } else {
            Ok(serde_yaml::from_str(&expanded)?)
        }
    }

    fn merge_configs(&self, base: &VosConfig, overlay: &VosConfig) -> VosConfig {
        let defaults = VosConfig::default();
        let mut result = base.clone();

        if overlay.shell != defaults.shell {
            result.shell = overlay.shell.clone();
        }
        if overlay.boot != defaults.boot {
            result.boot = overlay.boot.clone();
        }
        if overlay.storage != defaults.storage {
            result.storage = overlay.storage.clone();
        }
        if overlay.logging != defaults.logging {
            result.logging = overlay.logging.clone();
        }

        result
    }

    fn expand_env_vars(&self, content: &str) -> String {
        let Ok(re) = Regex::new(r"\$\{([^}]+)\}") else {
            return content.to_string();
        };
        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_default()
        })
        .to_string()
    }

    fn apply_env_overrides(&self, config: &mut VosConfig) {
        if let Ok(level) = std::env::var("VOS_LOG_LEVEL") {
            if let Ok(l) = serde_yaml::from_str(&level) {
                config.logging.level = l;
            }
        }
        if let Ok(snapshot) = std::env::var("VOS_SNAPSHOT") {
            config.storage.snapshot = snapshot;
        }
        if let Ok(delay) = std::env::var("VOS_LOOP_DELAY_MS") {
            if let Ok(ms) = delay.parse() {
                config.shell.loop_delay_ms = ms;
            }
        }
        if let Ok(core_path) = std::env::var("VOS_CORE_PATH") {
            if !core_path.is_empty() {
                config.boot.core_path = core_path;
            }
        }
    }

    fn validate(&self, config: &VosConfig) -> Result<(), ConfigError> {
        if !config.boot.core_path.starts_with('/') {
            return Err(ConfigError::InvalidValue(format!(
                "boot.core_path must be absolute, got '{}'",
                config.boot.core_path
            )));
        }
        Ok(())
    }
}

/// Expands `~` and `${VAR}` in a host path taken from the configuration.
pub fn expand_host_path(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(path).as_ref()),
    }
}
