use crate::constants::ColourName;
use crate::database;
use serenity::all::{Colour, GuildId};
use sqlx::{Error as SqlxError, sqlite::SqlitePool};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Per-guild configuration entry. Fields are populated independently:
/// a lazy prefix lookup may create an entry that learns its colour later.
#[derive(Clone, Debug, Default)]
struct CachedGuild {
    prefix: Option<String>,
    colour: Option<ColourName>,
}

/// In-memory view of every observed guild's configuration.
///
/// Entries are created lazily (lookup miss fills in the process default)
/// or explicitly when a guild is observed, seeded from its durable
/// record. Nothing is ever evicted; guild counts are bounded by the
/// platform and entries are two small fields. The map lock is never held
/// across storage I/O.
pub struct GuildConfigCache {
    default_prefix: String,
    entries: Mutex<HashMap<i64, CachedGuild>>,
}

impl GuildConfigCache {
    pub fn new(default_prefix: String) -> Self {
        Self {
            default_prefix,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn default_prefix(&self) -> &str {
        &self.default_prefix
    }

    /// Resolves the string prefix for a message context. Direct messages
    /// use the process default; unknown guilds are cached with the
    /// default on first sight.
    pub async fn string_prefix(&self, guild_id: Option<GuildId>) -> String {
        let Some(guild_id) = guild_id else {
            return self.default_prefix.clone();
        };

        let mut entries = self.entries.lock().await;
        let entry = entries.entry(guild_id.get() as i64).or_default();

        entry
            .prefix
            .get_or_insert_with(|| self.default_prefix.clone())
            .clone()
    }

    /// Resolves the embed accent colour for a message context, defaulting
    /// to purple and caching the default on a miss.
    pub async fn colour(&self, guild_id: Option<GuildId>) -> Colour {
        let Some(guild_id) = guild_id else {
            return ColourName::default().resolve();
        };

        let mut entries = self.entries.lock().await;
        let entry = entries.entry(guild_id.get() as i64).or_default();

        entry.colour.get_or_insert_with(ColourName::default).resolve()
    }

    /// Called whenever a guild joins or becomes available: get-or-create
    /// the durable record, then seed whichever cache fields are still
    /// unset from it. Idempotent, so reconnect storms that replay the
    /// same guild are harmless. Returns whether a record was created.
    pub async fn observe_guild(&self, pool: &SqlitePool, guild_id: i64) -> Result<bool, SqlxError> {
        let (saved, created) =
            database::get_or_create_guild(pool, guild_id, &self.default_prefix).await?;

        let mut entries = self.entries.lock().await;
        let entry = entries.entry(guild_id).or_default();
        entry.prefix.get_or_insert_with(|| saved.prefix.clone());
        entry
            .colour
            .get_or_insert_with(|| ColourName::parse(&saved.colour).unwrap_or_default());

        Ok(created)
    }

    /// Write-through update for the configuration commands; storage is
    /// updated by the caller first.
    pub async fn set_prefix(&self, guild_id: i64, prefix: &str) {
        let mut entries = self.entries.lock().await;
        let entry = entries.entry(guild_id).or_default();
        entry.prefix = Some(prefix.to_string());
    }

    /// Write-through update for the configuration commands.
    pub async fn set_colour(&self, guild_id: i64, colour: ColourName) {
        let mut entries = self.entries.lock().await;
        let entry = entries.entry(guild_id).or_default();
        entry.colour = Some(colour);
    }

    #[cfg(test)]
    pub(crate) async fn entry_count(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::tests::test_pool;

    fn guild(id: u64) -> Option<GuildId> {
        Some(GuildId::new(id))
    }

    #[tokio::test]
    async fn direct_messages_use_the_process_default() {
        let cache = GuildConfigCache::new("?".to_string());

        assert_eq!(cache.string_prefix(None).await, "?");
        assert_eq!(cache.colour(None).await, Colour::PURPLE);
        assert_eq!(cache.entry_count().await, 0);
    }

    #[tokio::test]
    async fn lookup_miss_caches_the_default_once() {
        let cache = GuildConfigCache::new("?".to_string());

        assert_eq!(cache.string_prefix(guild(1)).await, "?");
        assert_eq!(cache.colour(guild(1)).await, Colour::PURPLE);
        assert_eq!(cache.entry_count().await, 1);

        // Repeated lookups are idempotent.
        assert_eq!(cache.string_prefix(guild(1)).await, "?");
        assert_eq!(cache.entry_count().await, 1);
    }

    #[tokio::test]
    async fn observe_seeds_from_the_durable_record() {
        let pool = test_pool().await;
        let cache = GuildConfigCache::new("?".to_string());

        database::guild::get_or_create(&pool, 1, "!").await.unwrap();
        database::guild::update_colour(&pool, 1, ColourName::Blue)
            .await
            .unwrap();

        let created = cache.observe_guild(&pool, 1).await.unwrap();
        assert!(!created);
        assert_eq!(cache.string_prefix(guild(1)).await, "!");
        assert_eq!(cache.colour(guild(1)).await, Colour::BLUE);
        assert_eq!(cache.entry_count().await, 1);
    }

    #[tokio::test]
    async fn observe_twice_creates_one_record_and_one_entry() {
        let pool = test_pool().await;
        let cache = GuildConfigCache::new("?".to_string());

        let first = cache.observe_guild(&pool, 1).await.unwrap();
        let second = cache.observe_guild(&pool, 1).await.unwrap();
        assert!(first);
        assert!(!second);

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM guilds")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
        assert_eq!(cache.entry_count().await, 1);
    }

    #[tokio::test]
    async fn concurrent_observers_create_exactly_one_record() {
        let pool = test_pool().await;
        let cache = GuildConfigCache::new("?".to_string());

        let (first, second) =
            tokio::join!(cache.observe_guild(&pool, 1), cache.observe_guild(&pool, 1));
        let (first, second) = (first.unwrap(), second.unwrap());
        assert!(first ^ second);

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM guilds")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
        assert_eq!(cache.entry_count().await, 1);
    }

    #[tokio::test]
    async fn observe_does_not_clobber_a_lazily_created_entry() {
        let pool = test_pool().await;
        let cache = GuildConfigCache::new("?".to_string());

        // A message arrived before the guild-available event.
        assert_eq!(cache.string_prefix(guild(1)).await, "?");

        database::guild::get_or_create(&pool, 1, "!").await.unwrap();
        cache.observe_guild(&pool, 1).await.unwrap();

        // The entry seeded by the lookup keeps its value for the process
        // lifetime; only the missing colour field was filled in.
        assert_eq!(cache.string_prefix(guild(1)).await, "?");
        assert_eq!(cache.colour(guild(1)).await, Colour::PURPLE);
    }

    #[tokio::test]
    async fn write_through_updates_are_visible_to_readers() {
        let cache = GuildConfigCache::new("?".to_string());

        cache.set_prefix(1, "!!").await;
        cache.set_colour(1, ColourName::Gold).await;

        assert_eq!(cache.string_prefix(guild(1)).await, "!!");
        assert_eq!(cache.colour(guild(1)).await, Colour::GOLD);
    }
}
