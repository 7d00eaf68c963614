//! Driven port for persisting cache contents between runs.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by a durable store.
    pub enum StoreError {
        /// Reading or writing the backing medium failed.
        Io { message: String } => "store I/O failed: {message}",
        /// The store cannot be used at all.
        Unavailable { message: String } => "store unavailable: {message}",
    }
}

/// A namespaced blob store.
///
/// Each namespace holds one opaque string. Caches serialise their whole map
/// into it on every write.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Read the blob for `namespace`, or `None` if nothing was stored yet.
    async fn read(&self, namespace: &str) -> Result<Option<String>, StoreError>;

    /// Replace the blob for `namespace`.
    async fn write(&self, namespace: &str, raw: &str) -> Result<(), StoreError>;
}
