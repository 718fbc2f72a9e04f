// Sqlite-backed preference store via sea-orm; one database transaction
// per edit

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use entities::preference::{self, Entity as Preference};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait,
};

use super::{PreferenceStore, Preferences};

pub struct SqlitePreferenceStore {
    conn: Arc<DatabaseConnection>,
    namespace: String,
}

impl SqlitePreferenceStore {
    pub fn new(conn: Arc<DatabaseConnection>, namespace: impl Into<String>) -> Self {
        Self {
            conn,
            namespace: namespace.into(),
        }
    }
}

#[async_trait]
impl PreferenceStore for SqlitePreferenceStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let row = Preference::find_by_id((self.namespace.clone(), key.to_string()))
            .one(self.conn.as_ref())
            .await
            .with_context(|| format!("failed to read preference key {}", key))?;
        Ok(row.map(|r| r.value))
    }

    async fn edit(
        &self,
        apply: &(dyn for<'a> Fn(&'a mut Preferences) -> anyhow::Result<()> + Send + Sync),
    ) -> anyhow::Result<()> {
        let txn = self
            .conn
            .begin()
            .await
            .context("failed to open preference transaction")?;

        let rows = Preference::find()
            .filter(preference::Column::Namespace.eq(self.namespace.as_str()))
            .all(&txn)
            .await
            .context("failed to load preference namespace")?;
        let before: Preferences = rows.into_iter().map(|r| (r.key, r.value)).collect();

        let mut prefs = before.clone();
        apply(&mut prefs)?;

        for key in before.keys() {
            if !prefs.contains_key(key) {
                Preference::delete_by_id((self.namespace.clone(), key.clone()))
                    .exec(&txn)
                    .await
                    .with_context(|| format!("failed to delete preference key {}", key))?;
            }
        }
        for (key, value) in &prefs {
            if before.get(key) != Some(value) {
                let model = preference::ActiveModel {
                    namespace: Set(self.namespace.clone()),
                    key: Set(key.clone()),
                    value: Set(value.clone()),
                };
                Preference::insert(model)
                    .on_conflict(
                        OnConflict::columns([
                            preference::Column::Namespace,
                            preference::Column::Key,
                        ])
                        .update_column(preference::Column::Value)
                        .to_owned(),
                    )
                    .exec(&txn)
                    .await
                    .with_context(|| format!("failed to write preference key {}", key))?;
            }
        }

        txn.commit()
            .await
            .context("failed to commit preference transaction")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::MigratorTrait;
    use sea_orm::{ConnectOptions, Database};

    async fn open_store() -> SqlitePreferenceStore {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1);
        let conn = Database::connect(opt).await.unwrap();
        migration::Migrator::up(&conn, None).await.unwrap();
        SqlitePreferenceStore::new(Arc::new(conn), "favorites")
    }

    #[tokio::test]
    async fn get_absent_key_is_none() {
        let store = open_store().await;
        assert_eq!(store.get("favorite_books").await.unwrap(), None);
    }

    #[tokio::test]
    async fn edit_roundtrip_and_delete() {
        let store = open_store().await;
        store
            .edit(&|prefs| {
                prefs.insert("a".into(), "1".into());
                prefs.insert("b".into(), "2".into());
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));

        store
            .edit(&|prefs| {
                prefs.insert("a".into(), "3".into());
                prefs.remove("b");
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("3"));
        assert_eq!(store.get("b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn failed_closure_leaves_rows_untouched() {
        let store = open_store().await;
        store
            .edit(&|prefs| {
                prefs.insert("a".into(), "1".into());
                Ok(())
            })
            .await
            .unwrap();

        let failed = store
            .edit(&|prefs| {
                prefs.insert("a".into(), "2".into());
                anyhow::bail!("midway failure")
            })
            .await;
        assert!(failed.is_err());
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn namespaces_are_isolated() {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1);
        let conn = Arc::new(Database::connect(opt).await.unwrap());
        migration::Migrator::up(conn.as_ref(), None).await.unwrap();

        let favorites = SqlitePreferenceStore::new(conn.clone(), "favorites");
        let other = SqlitePreferenceStore::new(conn, "settings");

        favorites
            .edit(&|prefs| {
                prefs.insert("k".into(), "fav".into());
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(other.get("k").await.unwrap(), None);
    }
}
