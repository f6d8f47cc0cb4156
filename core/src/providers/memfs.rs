use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use vos_sdk::{FileSystem, FsError, FsResult};

use crate::snapshot::Snapshot;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct MemFile {
    pub(crate) content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum MemEntry {
    File(MemFile),
    Dir,
}

impl MemEntry {
    fn is_dir(&self) -> bool {
        matches!(self, Self::Dir)
    }
}

/// Flat path-keyed tree held entirely in memory.
///
/// Every key is a normalized absolute path; `/` always exists.
pub struct MemoryFs {
    entries: RwLock<HashMap<String, MemEntry>>,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFs {
    #[must_use]
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        entries.insert("/".to_string(), MemEntry::Dir);
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Rebuilds a filesystem from a snapshot. The root is re-created if the
    /// snapshot lacks it; entries whose parent is missing are rejected.
    pub fn from_snapshot(snapshot: Snapshot) -> FsResult<Self> {
        let mut entries: HashMap<String, MemEntry> = HashMap::new();
        entries.insert("/".to_string(), MemEntry::Dir);
        for (path, entry) in snapshot.entries {
            let path = Self::normalize_path(&path);
            if path == "/" {
                if !entry.is_dir() {
                    return Err(FsError::invalid_argument("snapshot root is not a directory"));
                }
                continue;
            }
            entries.insert(path, entry);
        }

        for path in entries.keys() {
            if let Some(parent) = Self::parent_path(path) {
                match entries.get(&parent) {
                    Some(MemEntry::Dir) => {}
                    Some(MemEntry::File(_)) => return Err(FsError::not_directory(parent)),
                    None => return Err(FsError::not_found(parent)),
                }
            }
        }

        Ok(Self {
            entries: RwLock::new(entries),
        })
    }

    pub fn snapshot(&self) -> FsResult<Snapshot> {
        let entries = self.read_entries()?;
        Ok(Snapshot::from_entries(
            entries
                .iter()
                .map(|(path, entry)| (path.clone(), entry.clone()))
                .collect(),
        ))
    }

    fn read_entries(&self) -> FsResult<RwLockReadGuard<'_, HashMap<String, MemEntry>>> {
        self.entries
            .read()
            .map_err(|_| FsError::internal("memfs lock poisoned"))
    }

    fn write_entries(&self) -> FsResult<RwLockWriteGuard<'_, HashMap<String, MemEntry>>> {
        self.entries
            .write()
            .map_err(|_| FsError::internal("memfs lock poisoned"))
    }

    /// Collapses separators, drops `.`, and accepts backslashes as
    /// separators. `..` is an ordinary name. Relative input is anchored at `/`.
    pub(crate) fn normalize_path(path: &str) -> String {
        let path = path.replace('\\', "/");
        let parts: Vec<&str> = path
            .split('/')
            .filter(|part| !part.is_empty() && *part != ".")
            .collect();
        format!("/{}", parts.join("/"))
    }

    fn parent_path(path: &str) -> Option<String> {
        if path == "/" {
            return None;
        }
        match path.rfind('/') {
            Some(0) | None => Some("/".to_string()),
            Some(idx) => Some(path[..idx].to_string()),
        }
    }

    fn check_parent(entries: &HashMap<String, MemEntry>, path: &str) -> FsResult<()> {
        let parent = Self::parent_path(path)
            .ok_or_else(|| FsError::already_exists(path))?;
        match entries.get(&parent) {
            Some(MemEntry::Dir) => Ok(()),
            Some(MemEntry::File(_)) => Err(FsError::not_directory(parent)),
            None => Err(FsError::not_found(parent)),
        }
    }

    fn create_parent_directories(
        entries: &mut HashMap<String, MemEntry>,
        path: &str,
    ) -> FsResult<()> {
        let mut missing = Vec::new();
        let mut current = Self::parent_path(path);
        while let Some(dir) = current {
            match entries.get(&dir) {
                Some(MemEntry::Dir) => break,
                Some(MemEntry::File(_)) => return Err(FsError::not_directory(dir)),
                None => {
                    current = Self::parent_path(&dir);
                    missing.push(dir);
                }
            }
        }
        for dir in missing.into_iter().rev() {
            tracing::debug!(path = %dir, "memfs: creating parent directory");
            entries.insert(dir, MemEntry::Dir);
        }
        Ok(())
    }
}

#[async_trait]
impl FileSystem for MemoryFs {
    async fn exists(&self, path: &str) -> bool {
        let path = Self::normalize_path(path);
        self.read_entries()
            .map(|entries| entries.contains_key(&path))
            .unwrap_or(false)
    }

    async fn list_files(&self, path: &str) -> FsResult<Vec<String>> {
        let path = Self::normalize_path(path);
        let entries = self.read_entries()?;

        let entry = entries
            .get(&path)
            .ok_or_else(|| FsError::not_found(&path))?;
        if !entry.is_dir() {
            return Err(FsError::not_directory(&path));
        }

        let prefix = if path == "/" {
            "/".to_string()
        } else {
            format!("{path}/")
        };

        let mut names: Vec<String> = entries
            .keys()
            .filter(|key| key.as_str() != path)
            .filter_map(|key| key.strip_prefix(&prefix))
            .filter(|rest| !rest.is_empty() && !rest.contains('/'))
            .map(str::to_string)
            .collect();
        names.sort();
        Ok(names)
    }

    async fn read_file(&self, path: &str) -> FsResult<String> {
        let path = Self::normalize_path(path);
        let entries = self.read_entries()?;
        match entries.get(&path) {
            Some(MemEntry::File(f)) => Ok(f.content.clone()),
            Some(MemEntry::Dir) => Err(FsError::is_directory(&path)),
            None => Err(FsError::not_found(&path)),
        }
    }

    async fn write_file(&self, path: &str, content: &str) -> FsResult<()> {
        let path = Self::normalize_path(path);
        let mut entries = self.write_entries()?;

        if let Some(MemEntry::Dir) = entries.get(&path) {
            return Err(FsError::is_directory(&path));
        }
        Self::create_parent_directories(&mut entries, &path)?;

        tracing::debug!(path = %path, bytes = content.len(), "memfs: write");
        entries.insert(
            path,
            MemEntry::File(MemFile {
                content: content.to_string(),
            }),
        );
        Ok(())
    }

    async fn create_file(&self, path: &str, content: &str) -> FsResult<()> {
        let path = Self::normalize_path(path);
        let mut entries = self.write_entries()?;

        if entries.contains_key(&path) {
            return Err(FsError::already_exists(&path));
        }
        Self::check_parent(&entries, &path)?;

        tracing::debug!(path = %path, "memfs: create file");
        entries.insert(
            path,
            MemEntry::File(MemFile {
                content: content.to_string(),
            }),
        );
        Ok(())
    }

    async fn create_directory(&self, path: &str) -> FsResult<()> {
        let path = Self::normalize_path(path);
        let mut entries = self.write_entries()?;

        if entries.contains_key(&path) {
            return Err(FsError::already_exists(&path));
        }
        Self::check_parent(&entries, &path)?;

        tracing::debug!(path = %path, "memfs: create directory");
        entries.insert(path, MemEntry::Dir);
        Ok(())
    }

    async fn delete_file(&self, path: &str) -> FsResult<()> {
        let path = Self::normalize_path(path);
        let mut entries = self.write_entries()?;

        match entries.get(&path) {
            Some(MemEntry::File(_)) => {
                entries.remove(&path);
                Ok(())
            }
            Some(MemEntry::Dir) => Err(FsError::is_directory(&path)),
            None => Err(FsError::not_found(&path)),
        }
    }

    async fn delete_directory(&self, path: &str) -> FsResult<()> {
        let path = Self::normalize_path(path);

        if path == "/" {
            return Err(FsError::permission_denied("cannot remove root"));
        }

        let mut entries = self.write_entries()?;
        match entries.get(&path) {
            Some(MemEntry::Dir) => {}
            Some(MemEntry::File(_)) => return Err(FsError::not_directory(&path)),
            None => return Err(FsError::not_found(&path)),
        }

        let prefix = format!("{path}/");
        if entries.keys().any(|k| k.starts_with(&prefix)) {
            return Err(FsError::directory_not_empty(&path));
        }

        entries.remove(&path);
        Ok(())
    }
}
