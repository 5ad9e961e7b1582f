pub mod guild;
pub mod models;

use crate::env;
use sqlx::{Error as SqlxError, sqlite::SqlitePool};

/// Connects to the database and runs migrations
pub async fn connect() -> Result<SqlitePool, SqlxError> {
    let database_url = env::database_url()
        .map(|opt| opt.unwrap_or_else(|| env::DEFAULT_DATABASE_URL.to_string()))
        .map_err(|err| SqlxError::Configuration(err.to_string().into()))?;

    let pool = SqlitePool::connect(&database_url).await?;

    // Run migrations
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

pub use models::GuildModel;

pub use guild::{
    find_by_guild_id as find_guild, get_or_create as get_or_create_guild,
    update_colour as update_guild_colour, update_prefix as update_guild_prefix,
};

#[cfg(test)]
pub(crate) mod tests {
    use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

    /// In-memory database with the real migrations applied.
    ///
    /// Single connection: every `sqlite::memory:` connection is its own
    /// database, so a larger pool would scatter the tables.
    pub async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("failed to open in-memory database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("failed to run migrations");

        pool
    }
}
