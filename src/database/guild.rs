use super::models::GuildModel;
use crate::constants::ColourName;
use sqlx::{Error as SqlxError, sqlite::SqlitePool};

/// Finds a guild configuration by its snowflake
pub async fn find_by_guild_id(
    pool: &SqlitePool,
    guild_id: i64,
) -> Result<Option<GuildModel>, SqlxError> {
    sqlx::query_as::<_, GuildModel>(
        "SELECT id, guild_id, prefix, colour, created_at FROM guilds WHERE guild_id = ?",
    )
    .bind(guild_id)
    .fetch_optional(pool)
    .await
}

/// Gets an existing guild configuration or creates one with the given
/// default prefix. Returns the stored model and whether a new row was
/// written. Safe under concurrent callers: the insert is a no-op when
/// another writer got there first.
pub async fn get_or_create(
    pool: &SqlitePool,
    guild_id: i64,
    default_prefix: &str,
) -> Result<(GuildModel, bool), SqlxError> {
    if let Some(existing) = find_by_guild_id(pool, guild_id).await? {
        return Ok((existing, false));
    }

    let created_at = chrono::Utc::now().to_rfc3339();

    let result = sqlx::query(
        "INSERT INTO guilds (guild_id, prefix, colour, created_at) VALUES (?, ?, ?, ?)
         ON CONFLICT(guild_id) DO NOTHING",
    )
    .bind(guild_id)
    .bind(default_prefix)
    .bind(ColourName::default().as_str())
    .bind(&created_at)
    .execute(pool)
    .await?;

    let saved = find_by_guild_id(pool, guild_id)
        .await?
        .ok_or(SqlxError::RowNotFound)?;

    Ok((saved, result.rows_affected() > 0))
}

/// Updates a guild's command prefix
pub async fn update_prefix(
    pool: &SqlitePool,
    guild_id: i64,
    prefix: &str,
) -> Result<GuildModel, SqlxError> {
    sqlx::query("UPDATE guilds SET prefix = ? WHERE guild_id = ?")
        .bind(prefix)
        .bind(guild_id)
        .execute(pool)
        .await?;

    find_by_guild_id(pool, guild_id)
        .await?
        .ok_or(SqlxError::RowNotFound)
}

/// Updates a guild's embed accent colour
pub async fn update_colour(
    pool: &SqlitePool,
    guild_id: i64,
    colour: ColourName,
) -> Result<GuildModel, SqlxError> {
    sqlx::query("UPDATE guilds SET colour = ? WHERE guild_id = ?")
        .bind(colour.as_str())
        .bind(guild_id)
        .execute(pool)
        .await?;

    find_by_guild_id(pool, guild_id)
        .await?
        .ok_or(SqlxError::RowNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::tests::test_pool;

    #[tokio::test]
    async fn get_or_create_writes_defaults_once() {
        let pool = test_pool().await;

        let (saved, created) = get_or_create(&pool, 42, "?").await.unwrap();
        assert!(created);
        assert_eq!(saved.guild_id, 42);
        assert_eq!(saved.prefix, "?");
        assert_eq!(saved.colour, "purple");

        let (again, created) = get_or_create(&pool, 42, "!").await.unwrap();
        assert!(!created);
        assert_eq!(again.prefix, "?");
        assert_eq!(again.id, saved.id);
    }

    #[tokio::test]
    async fn find_returns_none_for_unknown_guild() {
        let pool = test_pool().await;

        assert_eq!(find_by_guild_id(&pool, 7).await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_prefix_persists() {
        let pool = test_pool().await;

        get_or_create(&pool, 42, "?").await.unwrap();
        let updated = update_prefix(&pool, 42, "!!").await.unwrap();
        assert_eq!(updated.prefix, "!!");

        let reloaded = find_by_guild_id(&pool, 42).await.unwrap().unwrap();
        assert_eq!(reloaded.prefix, "!!");
    }

    #[tokio::test]
    async fn update_colour_persists() {
        let pool = test_pool().await;

        get_or_create(&pool, 42, "?").await.unwrap();
        let updated = update_colour(&pool, 42, ColourName::Blue).await.unwrap();
        assert_eq!(updated.colour, "blue");
    }

    #[tokio::test]
    async fn update_on_missing_guild_reports_row_not_found() {
        let pool = test_pool().await;

        let err = update_prefix(&pool, 9000, "!").await.unwrap_err();
        assert!(matches!(err, SqlxError::RowNotFound));
    }
}
