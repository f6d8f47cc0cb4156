use async_trait::async_trait;

use crate::error::FsResult;

/// Path-addressed text store the shell runs against.
///
/// All paths are absolute. Listing returns bare child names, not full paths.
#[async_trait]
pub trait FileSystem: Send + Sync {
    async fn exists(&self, path: &str) -> bool;

    async fn list_files(&self, path: &str) -> FsResult<Vec<String>>;

    async fn read_file(&self, path: &str) -> FsResult<String>;

    /// Creates or overwrites a file.
    async fn write_file(&self, path: &str, content: &str) -> FsResult<()>;

    /// Creates a new file; fails if the entry already exists.
    async fn create_file(&self, path: &str, content: &str) -> FsResult<()>;

    async fn create_directory(&self, path: &str) -> FsResult<()>;

    async fn delete_file(&self, path: &str) -> FsResult<()>;

    async fn delete_directory(&self, path: &str) -> FsResult<()>;
}

#[async_trait]
impl<P: FileSystem + ?Sized> FileSystem for Box<P> {
    async fn exists(&self, path: &str) -> bool {
        (**self).exists(path).await
    }

    async fn list_files(&self, path: &str) -> FsResult<Vec<String>> {
        (**self).list_files(path).await
    }

    async fn read_file(&self, path: &str) -> FsResult<String> {
        (**self).read_file(path).await
    }

    async fn write_file(&self, path: &str, content: &str) -> FsResult<()> {
        (**self).write_file(path, content).await
    }

    async fn create_file(&self, path: &str, content: &str) -> FsResult<()> {
        (**self).create_file(path, content).await
    }

    async fn create_directory(&self, path: &str) -> FsResult<()> {
        (**self).create_directory(path).await
    }

    async fn delete_file(&self, path: &str) -> FsResult<()> {
        (**self).delete_file(path).await
    }

    async fn delete_directory(&self, path: &str) -> FsResult<()> {
        (**self).delete_directory(path).await
    }
}

#[async_trait]
impl<P: FileSystem + ?Sized> FileSystem for std::sync::Arc<P> {
    async fn exists(&self, path: &str) -> bool {
        (**self).exists(path).await
    }

    async fn list_files(&self, path: &str) -> FsResult<Vec<String>> {
        (**self).list_files(path).await
    }

    async fn read_file(&self, path: &str) -> FsResult<String> {
        (**self).read_file(path).await
    }

    async fn write_file(&self, path: &str, content: &str) -> FsResult<()> {
        (**self).write_file(path, content).await
    }

    async fn create_file(&self, path: &str, content: &str) -> FsResult<()> {
        (**self).create_file(path, content).await
    }

    async fn create_directory(&self, path: &str) -> FsResult<()> {
        (**self).create_directory(path).await
    }

    async fn delete_file(&self, path: &str) -> FsResult<()> {
        (**self).delete_file(path).await
    }

    async fn delete_directory(&self, path: &str) -> FsResult<()> {
        (**self).delete_directory(path).await
    }
}
