use crate::{Data, Error};
use poise::{self, BoxFuture, serenity_prelude as serenity};

pub fn event_handler<'a>(
    ctx: &'a serenity::Context,
    event: &'a serenity::FullEvent,
    framework: poise::FrameworkContext<'a, Data, Error>,
    data: &'a Data,
) -> BoxFuture<'a, Result<(), Error>> {
    Box::pin(async move { handle_guild_create(ctx, event, framework, data).await })
}

/// Ensures a configuration record and cache entry exist for every guild
/// the client joins or sees become available. The gateway replays every
/// guild on reconnect, so this runs often and must stay idempotent.
async fn handle_guild_create(
    _ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    let serenity::FullEvent::GuildCreate { guild, .. } = event else {
        return Ok(());
    };

    let created = data
        .guild_cache
        .observe_guild(&data.database, guild.id.get() as i64)
        .await?;

    if created {
        tracing::info!(guild_id = guild.id.get(), "created a configuration entry for guild");
    }

    Ok(())
}
