// Favorites kept in the preference store: an id membership set plus
// mirrored book summaries for offline display, always written together

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::models::BookSummary;
use crate::storage::{PreferenceStore, Preferences};

const IDS_KEY: &str = "favorite_books";
const DATA_KEY: &str = "favorite_books_data";

pub struct FavoritesStore {
    store: Arc<dyn PreferenceStore>,
}

impl FavoritesStore {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    pub async fn favorite_ids(&self) -> anyhow::Result<BTreeSet<String>> {
        let raw = self.store.get(IDS_KEY).await?;
        Ok(raw.as_deref().map(decode_ids).unwrap_or_default())
    }

    /// The mirrored summaries, in insertion order. A blob that fails to
    /// parse reads as empty rather than failing the caller.
    pub async fn favorite_books(&self) -> anyhow::Result<Vec<BookSummary>> {
        let raw = self.store.get(DATA_KEY).await?;
        Ok(raw.as_deref().map(decode_books).unwrap_or_default())
    }

    pub async fn is_favorite(&self, work_id: &str) -> anyhow::Result<bool> {
        Ok(self.favorite_ids().await?.contains(work_id))
    }

    /// Insert the id and upsert the summary in one transaction. Adding a
    /// book that is already a favorite replaces its summary, leaving a
    /// single entry per id.
    pub async fn add(&self, book: &BookSummary) -> anyhow::Result<()> {
        self.store
            .edit(&|prefs| {
                let mut ids = ids_in(prefs);
                ids.insert(book.work_id.clone());
                write_ids(prefs, &ids)?;

                let mut books = books_in(prefs);
                books.retain(|b| b.work_id != book.work_id);
                books.push(book.clone());
                write_books(prefs, &books)
            })
            .await
    }

    /// Drop the id and its summary in one transaction.
    pub async fn remove(&self, work_id: &str) -> anyhow::Result<()> {
        self.store
            .edit(&|prefs| {
                let mut ids = ids_in(prefs);
                ids.remove(work_id);
                write_ids(prefs, &ids)?;

                let mut books = books_in(prefs);
                books.retain(|b| b.work_id != work_id);
                write_books(prefs, &books)
            })
            .await
    }

    /// Flip membership and return the new state. The membership check and
    /// the mutation are two separate store operations, so two
    /// near-simultaneous toggles of the same book can observe the same
    /// starting state; the idempotent add/remove keep the stored data
    /// consistent either way.
    pub async fn toggle(&self, book: &BookSummary) -> anyhow::Result<bool> {
        if self.is_favorite(&book.work_id).await? {
            self.remove(&book.work_id).await?;
            Ok(false)
        } else {
            self.add(book).await?;
            Ok(true)
        }
    }
}

/// Screen-facing handle over [`FavoritesStore`]; no state of its own.
pub struct Favorites {
    store: FavoritesStore,
}

impl Favorites {
    pub fn new(store: FavoritesStore) -> Self {
        Self { store }
    }

    pub async fn is_favorite(&self, work_id: &str) -> anyhow::Result<bool> {
        self.store.is_favorite(work_id).await
    }

    pub async fn toggle(&self, book: &BookSummary) -> anyhow::Result<bool> {
        self.store.toggle(book).await
    }

    pub async fn list(&self) -> anyhow::Result<Vec<BookSummary>> {
        self.store.favorite_books().await
    }

    pub async fn add(&self, book: &BookSummary) -> anyhow::Result<()> {
        self.store.add(book).await
    }

    pub async fn remove(&self, work_id: &str) -> anyhow::Result<()> {
        self.store.remove(work_id).await
    }
}

fn ids_in(prefs: &Preferences) -> BTreeSet<String> {
    prefs.get(IDS_KEY).map(|s| decode_ids(s)).unwrap_or_default()
}

fn books_in(prefs: &Preferences) -> Vec<BookSummary> {
    prefs
        .get(DATA_KEY)
        .map(|s| decode_books(s))
        .unwrap_or_default()
}

fn decode_ids(raw: &str) -> BTreeSet<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

fn decode_books(raw: &str) -> Vec<BookSummary> {
    serde_json::from_str(raw).unwrap_or_default()
}

fn write_ids(prefs: &mut Preferences, ids: &BTreeSet<String>) -> anyhow::Result<()> {
    prefs.insert(IDS_KEY.to_string(), serde_json::to_string(ids)?);
    Ok(())
}

fn write_books(prefs: &mut Preferences, books: &[BookSummary]) -> anyhow::Result<()> {
    prefs.insert(DATA_KEY.to_string(), serde_json::to_string(books)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn book(id: &str, title: &str) -> BookSummary {
        BookSummary {
            work_id: id.to_string(),
            title: title.to_string(),
            authors: vec!["Frank Herbert".into()],
            cover_id: Some(11481354),
            first_publish_year: Some(1965),
            edition_count: Some(120),
        }
    }

    fn new_store() -> FavoritesStore {
        FavoritesStore::new(Arc::new(MemoryStore::new()))
    }

    async fn assert_lock_step(store: &FavoritesStore) {
        let ids = store.favorite_ids().await.unwrap();
        let data_ids: BTreeSet<String> = store
            .favorite_books()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.work_id)
            .collect();
        assert_eq!(ids, data_ids);
    }

    #[tokio::test]
    async fn empty_store_reads_empty() {
        let store = new_store();
        assert!(store.favorite_ids().await.unwrap().is_empty());
        assert!(store.favorite_books().await.unwrap().is_empty());
        assert!(!store.is_favorite("OL1W").await.unwrap());
    }

    #[tokio::test]
    async fn add_is_idempotent() {
        let store = new_store();
        store.add(&book("OL893415W", "Dune")).await.unwrap();
        store.add(&book("OL893415W", "Dune (reissue)")).await.unwrap();

        let ids = store.favorite_ids().await.unwrap();
        assert_eq!(ids.len(), 1);
        let books = store.favorite_books().await.unwrap();
        assert_eq!(books.len(), 1);
        // the later add overwrites the mirrored summary
        assert_eq!(books[0].title, "Dune (reissue)");
        assert_lock_step(&store).await;
    }

    #[tokio::test]
    async fn add_then_remove_restores_initial_state() {
        let store = new_store();
        store.add(&book("OL1W", "One")).await.unwrap();

        store.add(&book("OL2W", "Two")).await.unwrap();
        store.remove("OL2W").await.unwrap();

        let ids = store.favorite_ids().await.unwrap();
        assert_eq!(ids, BTreeSet::from(["OL1W".to_string()]));
        let books = store.favorite_books().await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].work_id, "OL1W");
        assert_lock_step(&store).await;
    }

    #[tokio::test]
    async fn toggle_twice_is_an_involution() {
        let store = new_store();
        let b = book("OL893415W", "Dune");

        assert!(store.toggle(&b).await.unwrap());
        assert!(store.is_favorite("OL893415W").await.unwrap());

        assert!(!store.toggle(&b).await.unwrap());
        assert!(!store.is_favorite("OL893415W").await.unwrap());
        assert!(store.favorite_books().await.unwrap().is_empty());
        assert_lock_step(&store).await;
    }

    #[tokio::test]
    async fn insertion_order_is_preserved() {
        let store = new_store();
        store.add(&book("OL3W", "Three")).await.unwrap();
        store.add(&book("OL1W", "One")).await.unwrap();
        store.add(&book("OL2W", "Two")).await.unwrap();

        let titles: Vec<String> = store
            .favorite_books()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["Three", "One", "Two"]);
    }

    #[tokio::test]
    async fn corrupt_data_blob_reads_as_empty() {
        let raw = Arc::new(MemoryStore::new());
        raw.edit(&|prefs| {
            prefs.insert(DATA_KEY.to_string(), "{not json".to_string());
            Ok(())
        })
        .await
        .unwrap();

        let store = FavoritesStore::new(raw);
        assert!(store.favorite_books().await.unwrap().is_empty());

        // a later add rebuilds both blobs from scratch
        store.add(&book("OL1W", "One")).await.unwrap();
        assert_eq!(store.favorite_books().await.unwrap().len(), 1);
        assert_lock_step(&store).await;
    }

    #[tokio::test]
    async fn controller_delegates() {
        let favorites = Favorites::new(new_store());
        let b = book("OL893415W", "Dune");

        assert!(favorites.toggle(&b).await.unwrap());
        assert!(favorites.is_favorite("OL893415W").await.unwrap());
        assert_eq!(favorites.list().await.unwrap().len(), 1);

        favorites.remove("OL893415W").await.unwrap();
        assert!(favorites.list().await.unwrap().is_empty());

        favorites.add(&b).await.unwrap();
        assert!(favorites.is_favorite("OL893415W").await.unwrap());
    }
}
