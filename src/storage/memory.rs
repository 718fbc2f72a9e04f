use std::sync::Mutex;

use async_trait::async_trait;

use super::{PreferenceStore, Preferences};

/// Map-backed store for tests and ephemeral runs. `edit` applies the
/// closure to a copy and swaps it in on success, matching the abort
/// semantics of the sqlite store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Preferences>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for MemoryStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let prefs = self.inner.lock().unwrap();
        Ok(prefs.get(key).cloned())
    }

    async fn edit(
        &self,
        apply: &(dyn for<'a> Fn(&'a mut Preferences) -> anyhow::Result<()> + Send + Sync),
    ) -> anyhow::Result<()> {
        let mut prefs = self.inner.lock().unwrap();
        let mut next = prefs.clone();
        apply(&mut next)?;
        *prefs = next;
        Ok(())
    }
}
