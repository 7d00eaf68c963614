//! [`DurableStore`] that keeps each namespace in a JSON file.
//!
//! Namespace `locations` lives at `<dir>/locations.json`. Writes go through
//! [`tripgeo_fs::write_atomic`] so a crash mid-write leaves the previous
//! contents intact. Filesystem calls run on the blocking pool.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use tripgeo_core::{DurableStore, StoreError};

/// Directory-backed durable store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStore {
    dir: Utf8PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// File backing `namespace`.
    ///
    /// # Errors
    ///
    /// Namespaces may only contain ASCII letters, digits, `-` and `_`.
    pub fn path_for(&self, namespace: &str) -> Result<Utf8PathBuf, StoreError> {
        let valid = !namespace.is_empty()
            && namespace
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::unavailable(format!(
                "invalid namespace {namespace:?}"
            )));
        }
        Ok(self.dir.join(format!("{namespace}.json")))
    }
}

async fn blocking<T, F>(task: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce() -> std::io::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| StoreError::unavailable(format!("file task failed: {err}")))?
        .map_err(|err| StoreError::io(err.to_string()))
}

#[async_trait]
impl DurableStore for FileStore {
    async fn read(&self, namespace: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(namespace)?;
        blocking(move || tripgeo_fs::read_if_exists(&path)).await
    }

    async fn write(&self, namespace: &str, raw: &str) -> Result<(), StoreError> {
        let path = self.path_for(namespace)?;
        let raw = raw.to_owned();
        blocking(move || tripgeo_fs::write_atomic(&path, &raw)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp() -> TempDir {
        TempDir::new().expect("create temp dir")
    }

    fn store_in(temp: &TempDir) -> FileStore {
        let dir = Utf8PathBuf::from_path_buf(temp.path().join("cache")).expect("utf-8 path");
        FileStore::new(dir)
    }

    #[rstest]
    #[case("")]
    #[case("../escape")]
    #[case("a/b")]
    fn rejects_unsafe_namespaces(temp: TempDir, #[case] namespace: &str) {
        assert!(matches!(
            store_in(&temp).path_for(namespace),
            Err(StoreError::Unavailable { .. })
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn round_trips_through_the_directory(temp: TempDir) {
        let store = store_in(&temp);
        assert_eq!(store.read("routes").await.expect("read"), None);

        store.write("routes", "{\"k\":1}").await.expect("write");

        assert_eq!(
            store.read("routes").await.expect("read").as_deref(),
            Some("{\"k\":1}")
        );
        assert!(store.dir().join("routes.json").is_file());
    }
}
