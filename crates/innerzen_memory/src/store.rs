//! Key-value persistence for the profile and both logs.
//!
//! Values are JSON documents stored under `"{namespace}:{key}"`. Both stores
//! implement [`Persistence`] on top of their [`KeyValueStore`] methods.

use anyhow::{Context, Result};
use async_trait::async_trait;
use innerzen_core::{keys, JournalEntry, MoodEntry, Persistence, UserProfile};
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Row, Sqlite};
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    fn namespace(&self) -> &str;
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn put(&self, key: &str, value: String) -> Result<()>;
}

fn scoped(namespace: &str, key: &str) -> String {
    format!("{}:{}", namespace, key)
}

async fn load_json<S, T>(store: &S, key: &str) -> Result<Option<T>>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    match store.get(key).await? {
        Some(raw) => {
            let value = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to deserialize '{}'", scoped(store.namespace(), key)))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

async fn save_json<S, T>(store: &S, key: &str, value: &T) -> Result<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)
        .with_context(|| format!("Failed to serialize '{}'", scoped(store.namespace(), key)))?;
    store.put(key, raw).await
}

/// JSON-over-key-value `Persistence` for a concrete store.
macro_rules! kv_persistence {
    ($store:ty) => {
        #[async_trait]
        impl Persistence for $store {
            async fn load_profile(&self) -> Result<Option<UserProfile>> {
                load_json(self, keys::PROFILE).await
            }

            async fn save_profile(&self, profile: &UserProfile) -> Result<()> {
                save_json(self, keys::PROFILE, profile).await
            }

            async fn load_mood_log(&self) -> Result<Vec<MoodEntry>> {
                Ok(load_json(self, keys::MOOD_HISTORY).await?.unwrap_or_default())
            }

            async fn save_mood_log(&self, log: &[MoodEntry]) -> Result<()> {
                save_json(self, keys::MOOD_HISTORY, log).await
            }

            async fn load_journal_log(&self) -> Result<Vec<JournalEntry>> {
                Ok(load_json(self, keys::JOURNAL_ENTRIES).await?.unwrap_or_default())
            }

            async fn save_journal_log(&self, log: &[JournalEntry]) -> Result<()> {
                save_json(self, keys::JOURNAL_ENTRIES, log).await
            }
        }
    };
}

kv_persistence!(InMemoryStore);
kv_persistence!(SqliteStore);

// ============================================================================
// In-memory
// ============================================================================

/// Process-local store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    namespace: String,
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            values: RwLock::new(HashMap::new()),
        }
    }

    /// Raw JSON under `key` in this store's namespace.
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .await
            .get(&scoped(&self.namespace, key))
            .cloned()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw(key).await)
    }

    async fn put(&self, key: &str, value: String) -> Result<()> {
        self.values
            .write()
            .await
            .insert(scoped(&self.namespace, key), value);
        Ok(())
    }
}

// ============================================================================
// SQLite
// ============================================================================

#[derive(Clone)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
    namespace: String,
}

impl SqliteStore {
    pub async fn open<P: AsRef<Path>>(db_path: P, namespace: impl Into<String>) -> Result<Self> {
        let db_url = format!("sqlite://{}?mode=rwc", db_path.as_ref().display());
        let pool = SqlitePoolOptions::new()
            .connect(&db_url)
            .await
            .with_context(|| format!("Failed to connect to SQLite database at {}", db_url))?;
        Self::with_pool(pool, namespace).await
    }

    /// Private in-memory database. A single connection, so every query sees
    /// the same database.
    pub async fn in_memory(namespace: impl Into<String>) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory SQLite database")?;
        Self::with_pool(pool, namespace).await
    }

    async fn with_pool(pool: Pool<Sqlite>, namespace: impl Into<String>) -> Result<Self> {
        let store = Self {
            pool,
            namespace: namespace.into(),
        };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                namespace TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (namespace, key)
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create kv table")?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv WHERE namespace = ? AND key = ?")
            .bind(&self.namespace)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to read '{}'", scoped(&self.namespace, key)))?;
        Ok(row.map(|r| r.get("value")))
    }

    async fn put(&self, key: &str, value: String) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        sqlx::query(
            "INSERT INTO kv (namespace, key, value, updated_at) VALUES (?, ?, ?, ?)
             ON CONFLICT(namespace, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(&self.namespace)
        .bind(key)
        .bind(&value)
        .bind(now)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to write '{}'", scoped(&self.namespace, key)))?;

        tracing::debug!("Saved {} ({} bytes)", scoped(&self.namespace, key), value.len());
        Ok(())
    }
}
