use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use vos_sdk::{FsError, FsResult};

use crate::providers::memfs::MemEntry;
use crate::MemoryFs;

pub const SNAPSHOT_FORMAT: u32 = 1;

/// Serialized form of a [`MemoryFs`] tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub format: u32,
    pub(crate) entries: BTreeMap<String, MemEntry>,
}

impl Snapshot {
    pub(crate) fn from_entries(entries: BTreeMap<String, MemEntry>) -> Self {
        Self {
            format: SNAPSHOT_FORMAT,
            entries,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> FsResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FsError::internal(format!("failed to encode snapshot: {e}")))
    }

    pub fn from_json(json: &str) -> FsResult<Self> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| FsError::invalid_argument(format!("malformed snapshot: {e}")))?;
        if snapshot.format != SNAPSHOT_FORMAT {
            return Err(FsError::invalid_argument(format!(
                "unsupported snapshot format {} (expected {SNAPSHOT_FORMAT})",
                snapshot.format
            )));
        }
        Ok(snapshot)
    }
}

/// Loads a filesystem from `path`, or returns an empty one when the file does
/// not exist yet.
pub async fn load_or_new(path: &Path) -> FsResult<MemoryFs> {
    match tokio::fs::read_to_string(path).await {
        Ok(json) => {
            let fs = MemoryFs::from_snapshot(Snapshot::from_json(&json)?)?;
            tracing::info!(path = %path.display(), "Restored filesystem snapshot");
            Ok(fs)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "No snapshot found, starting with an empty filesystem");
            Ok(MemoryFs::new())
        }
        Err(e) => Err(FsError::internal(format!(
            "failed to read snapshot {}: {e}",
            path.display()
        ))),
    }
}

/// Writes the current tree of `fs` to `path`, creating parent directories on
/// the host as needed.
pub async fn save(fs: &MemoryFs, path: &Path) -> FsResult<()> {
    let json = fs.snapshot()?.to_json()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            FsError::internal(format!("failed to create {}: {e}", parent.display()))
        })?;
    }
    tokio::fs::write(path, json)
        .await
        .map_err(|e| FsError::internal(format!("failed to write snapshot {}: {e}", path.display())))?;
    tracing::info!(path = %path.display(), "Saved filesystem snapshot");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vos_sdk::FileSystem;

    #[tokio::test]
    async fn save_and_restore_tree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state/fs.json");

        let fs = MemoryFs::new();
        fs.write_file("/sys/core.json", "{\"name\":\"vsh\"}").await.unwrap();
        fs.create_directory("/home").await.unwrap();
        save(&fs, &path).await.unwrap();

        let restored = load_or_new(&path).await.unwrap();
        assert_eq!(
            restored.read_file("/sys/core.json").await.unwrap(),
            "{\"name\":\"vsh\"}"
        );
        assert_eq!(restored.list_files("/").await.unwrap(), vec!["home", "sys"]);
    }

    #[tokio::test]
    async fn missing_snapshot_yields_empty_fs() {
        let dir = tempfile::tempdir().unwrap();
        let fs = load_or_new(&dir.path().join("absent.json")).await.unwrap();
        assert!(fs.list_files("/").await.unwrap().is_empty());
    }

    #[test]
    fn rejects_unknown_format() {
        let json = r#"{"format": 99, "entries": {}}"#;
        assert!(matches!(
            Snapshot::from_json(json),
            Err(FsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn rejects_orphaned_entries() {
        let json = r#"{"format": 1, "entries": {"/a/b.txt": {"type": "file", "content": ""}}}"#;
        let snapshot = Snapshot::from_json(json).unwrap();
        assert!(MemoryFs::from_snapshot(snapshot).is_err());
    }
}
