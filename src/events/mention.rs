use crate::{Data, Error, constants};
use poise::{self, BoxFuture, serenity_prelude as serenity};
use rand::seq::SliceRandom;

pub fn event_handler<'a>(
    ctx: &'a serenity::Context,
    event: &'a serenity::FullEvent,
    framework: poise::FrameworkContext<'a, Data, Error>,
    data: &'a Data,
) -> BoxFuture<'a, Result<(), Error>> {
    Box::pin(async move { handle_mention(ctx, event, framework, data).await })
}

/// Answers a message that is nothing but a mention of the bot with the
/// guild's current prefix. Messages with any other content fall through
/// to normal command processing.
async fn handle_mention(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    // Edited messages take the same path as new ones.
    let message = match event {
        serenity::FullEvent::Message { new_message } => new_message,
        serenity::FullEvent::MessageUpdate { new: Some(message), .. } => message,
        _ => return Ok(()),
    };

    if message.author.bot {
        return Ok(());
    }

    if !is_exact_mention(&message.content, framework.bot_id.get()) {
        return Ok(());
    }

    if !data.settings.prefix_on_mention {
        return Ok(());
    }

    state_prefix(ctx, data, message).await
}

/// States the configured prefix using a random satire string, framed
/// with the guild's accent colour.
async fn state_prefix(
    ctx: &serenity::Context,
    data: &Data,
    message: &serenity::Message,
) -> Result<(), Error> {
    let prefix = data.guild_cache.string_prefix(message.guild_id).await;
    let colour = data.guild_cache.colour(message.guild_id).await;

    let response = {
        let mut rng = rand::thread_rng();
        let template = constants::PREFIX_RESPONSES
            .choose(&mut rng)
            .copied()
            .unwrap_or(constants::PREFIX_RESPONSES[0]);
        template(&prefix)
    };

    let embed = serenity::CreateEmbed::new()
        .description(response)
        .colour(colour);
    message
        .channel_id
        .send_message(
            ctx,
            serenity::CreateMessage::new().embed(embed),
        )
        .await?;

    Ok(())
}

/// The canonical mention (`<@id>`) and the legacy nickname mention
/// (`<@!id>`) both count; anything beyond the mention itself does not.
fn is_exact_mention(content: &str, bot_id: u64) -> bool {
    let trimmed = content.trim();

    trimmed == format!("<@{bot_id}>") || trimmed == format!("<@!{bot_id}>")
}

#[cfg(test)]
mod tests {
    use super::is_exact_mention;

    const BOT_ID: u64 = 1234567890;

    #[test]
    fn canonical_mention_matches() {
        assert!(is_exact_mention("<@1234567890>", BOT_ID));
    }

    #[test]
    fn nickname_mention_matches() {
        assert!(is_exact_mention("<@!1234567890>", BOT_ID));
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        assert!(is_exact_mention("  <@1234567890>  ", BOT_ID));
    }

    #[test]
    fn mention_with_trailing_text_does_not_match() {
        assert!(!is_exact_mention("<@1234567890> help", BOT_ID));
    }

    #[test]
    fn other_users_do_not_match() {
        assert!(!is_exact_mention("<@999>", BOT_ID));
    }

    #[test]
    fn role_mentions_do_not_match() {
        assert!(!is_exact_mention("<@&1234567890>", BOT_ID));
    }
}
