use crate::{
    Context, Data, Error,
    constants::{ColourName, colors},
    database,
    functions::format::discord::inline_code,
};
use poise::serenity_prelude as serenity;

const MAX_PREFIX_LENGTH: usize = 8;

pub fn setup() -> Result<Vec<poise::Command<Data, Error>>, Error> {
    Ok(vec![prefix(), colour()])
}

/// Shows or changes the command prefix for this server.
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    category = "Settings",
    required_permissions = "MANAGE_GUILD"
)]
pub async fn prefix(
    ctx: Context<'_>,
    #[description = "The new prefix, 1 to 8 characters"] new_prefix: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };
    let data = ctx.data();
    let snowflake = guild_id.get() as i64;

    let Some(new_prefix) = new_prefix else {
        let current = data.guild_cache.string_prefix(Some(guild_id)).await;
        send_styled(
            ctx,
            format!("The prefix here is {}.", inline_code(&current)),
        )
        .await?;
        return Ok(());
    };

    let Some(new_prefix) = normalize_prefix(&new_prefix) else {
        send_rejection(
            ctx,
            format!("Prefixes have to be between 1 and {MAX_PREFIX_LENGTH} characters."),
        )
        .await?;
        return Ok(());
    };

    // Write through: durable record first, then the cache entry.
    database::get_or_create_guild(&data.database, snowflake, data.guild_cache.default_prefix())
        .await?;
    database::update_guild_prefix(&data.database, snowflake, &new_prefix).await?;
    data.guild_cache.set_prefix(snowflake, &new_prefix).await;

    send_styled(
        ctx,
        format!(
            "Done. Commands here now start with {}.",
            inline_code(&new_prefix)
        ),
    )
    .await?;

    Ok(())
}

/// Shows or changes the embed accent colour for this server.
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    category = "Settings",
    required_permissions = "MANAGE_GUILD"
)]
pub async fn colour(
    ctx: Context<'_>,
    #[description = "The new accent colour"] choice: Option<ColourName>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };
    let data = ctx.data();
    let snowflake = guild_id.get() as i64;

    let Some(choice) = choice else {
        send_styled(ctx, "This is the accent colour configured here.").await?;
        return Ok(());
    };

    database::get_or_create_guild(&data.database, snowflake, data.guild_cache.default_prefix())
        .await?;
    database::update_guild_colour(&data.database, snowflake, choice).await?;
    data.guild_cache.set_colour(snowflake, choice).await;

    send_styled(
        ctx,
        format!("Done. Embeds here are now framed in {choice}."),
    )
    .await?;

    Ok(())
}

/// Confirmation embeds carry the guild's accent colour, freshly resolved
/// so an update is visible in its own confirmation.
async fn send_styled(ctx: Context<'_>, description: impl Into<String>) -> Result<(), Error> {
    let colour = ctx.data().guild_cache.colour(ctx.guild_id()).await;
    let embed = serenity::CreateEmbed::new()
        .description(description.into())
        .colour(colour);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

async fn send_rejection(ctx: Context<'_>, description: impl Into<String>) -> Result<(), Error> {
    let embed = serenity::CreateEmbed::new()
        .description(description.into())
        .colour(colors::ERROR);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// A prefix is stored trimmed and must stay short enough that users can
/// still recognize a command invocation.
fn normalize_prefix(raw: &str) -> Option<String> {
    let trimmed = raw.trim();

    if trimmed.is_empty() || trimmed.len() > MAX_PREFIX_LENGTH {
        return None;
    }

    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::normalize_prefix;

    #[test]
    fn surrounding_whitespace_is_stripped() {
        assert_eq!(normalize_prefix("  ! "), Some("!".to_string()));
    }

    #[test]
    fn empty_prefixes_are_rejected() {
        assert_eq!(normalize_prefix(""), None);
        assert_eq!(normalize_prefix("   "), None);
    }

    #[test]
    fn oversized_prefixes_are_rejected() {
        assert_eq!(normalize_prefix("commander"), None);
    }

    #[test]
    fn short_prefixes_pass_through() {
        assert_eq!(normalize_prefix("f!"), Some("f!".to_string()));
    }
}
