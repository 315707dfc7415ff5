use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

/// Process-local keyed table backing the in-memory stores.
///
/// Cloning the table shares the underlying map, so a store can be handed to
/// several services and still observe one consistent set of rows. Rows keep
/// their insertion order for listing.
pub struct InMemoryTable<K, V> {
    name: &'static str,
    rows: Arc<RwLock<Rows<K, V>>>,
}

struct Rows<K, V> {
    index: HashMap<K, usize>,
    entries: Vec<(K, V)>,
}

impl<K, V> Clone for InMemoryTable<K, V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            rows: Arc::clone(&self.rows),
        }
    }
}

impl<K, V> InMemoryTable<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rows: Arc::new(RwLock::new(Rows {
                index: HashMap::new(),
                entries: Vec::new(),
            })),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Inserts or replaces the row stored under `key`.
    pub async fn upsert(&self, key: K, value: V) {
        let mut rows = self.rows.write().await;
        match rows.index.get(&key).copied() {
            Some(position) => {
                rows.entries[position].1 = value;
            }
            None => {
                let position = rows.entries.len();
                rows.index.insert(key.clone(), position);
                rows.entries.push((key, value));
            }
        }
        debug!("{}: upserted row ({} rows)", self.name, rows.entries.len());
    }

    /// Inserts `value` unless some row already satisfies `is_same`; returns
    /// whichever row ends up stored. Check and insert happen under one write lock.
    pub async fn insert_or_existing<P>(&self, key: K, value: V, is_same: P) -> V
    where
        P: Fn(&V) -> bool,
    {
        let mut rows = self.rows.write().await;
        if let Some((_, existing)) = rows.entries.iter().find(|(_, row)| is_same(row)) {
            return existing.clone();
        }

        let position = rows.entries.len();
        rows.index.insert(key.clone(), position);
        rows.entries.push((key, value.clone()));
        value
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        let rows = self.rows.read().await;
        rows.index
            .get(key)
            .map(|&position| rows.entries[position].1.clone())
    }

    pub async fn contains(&self, key: &K) -> bool {
        self.rows.read().await.index.contains_key(key)
    }

    pub async fn any<P>(&self, predicate: P) -> bool
    where
        P: Fn(&V) -> bool,
    {
        self.rows
            .read()
            .await
            .entries
            .iter()
            .any(|(_, value)| predicate(value))
    }

    pub async fn filter<P>(&self, predicate: P) -> Vec<V>
    where
        P: Fn(&V) -> bool,
    {
        self.rows
            .read()
            .await
            .entries
            .iter()
            .filter(|(_, value)| predicate(value))
            .map(|(_, value)| value.clone())
            .collect()
    }

    pub async fn values(&self) -> Vec<V> {
        self.filter(|_| true).await
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_replaces_in_place() {
        let table: InMemoryTable<u32, &str> = InMemoryTable::new("test");
        table.upsert(1, "one").await;
        table.upsert(2, "two").await;
        table.upsert(1, "uno").await;

        assert_eq!(table.len().await, 2);
        assert_eq!(table.get(&1).await, Some("uno"));
        assert_eq!(table.values().await, vec!["uno", "two"]);
    }

    #[tokio::test]
    async fn test_insert_or_existing_keeps_first_match() {
        let table: InMemoryTable<u32, (u32, &str)> = InMemoryTable::new("pairs");

        let first = table.insert_or_existing(1, (10, "a"), |row| row.0 == 10).await;
        let second = table.insert_or_existing(2, (10, "b"), |row| row.0 == 10).await;
        let third = table.insert_or_existing(3, (20, "c"), |row| row.0 == 20).await;

        assert_eq!(first, (10, "a"));
        assert_eq!(second, (10, "a"));
        assert_eq!(third, (20, "c"));
        assert_eq!(table.len().await, 2);
        assert!(!table.contains(&2).await);
    }

    #[tokio::test]
    async fn test_clones_share_rows() {
        let table: InMemoryTable<u32, u32> = InMemoryTable::new("shared");
        let other = table.clone();
        other.upsert(7, 49).await;

        assert!(table.contains(&7).await);
        assert!(table.any(|v| *v == 49).await);
        assert_eq!(table.filter(|v| *v > 100).await, Vec::<u32>::new());
    }
}
