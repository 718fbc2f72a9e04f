// Traits for durable key-value preferences; sqlite and in-memory
// implementations live in the submodules

pub mod memory;
pub mod sqlite;

use std::collections::BTreeMap;

use async_trait::async_trait;

pub use memory::MemoryStore;
pub use sqlite::SqlitePreferenceStore;

/// Snapshot of one namespace, handed to `edit` closures.
pub type Preferences = BTreeMap<String, String>;

/// A durable string-keyed store scoped to one namespace. `edit` is the
/// only mutation path: the whole namespace is read, modified, and written
/// back in a single transaction. A closure error aborts the transaction.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    async fn edit(
        &self,
        apply: &(dyn for<'a> Fn(&'a mut Preferences) -> anyhow::Result<()> + Send + Sync),
    ) -> anyhow::Result<()>;
}
