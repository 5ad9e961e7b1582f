use crate::{
    Data, Error,
    constants::{self, colors},
    env::Settings,
    functions::format::discord::inline_code,
};
use poise::{FrameworkError, serenity_prelude as serenity};
use rand::seq::SliceRandom;

/// Reports an error to the console and, when enabled, to the bot owners.
///
/// This is the single funnel every other component routes failures
/// through, so it must never fail itself: owners that cannot be resolved
/// are skipped and refused deliveries are swallowed.
pub async fn report_error(http: &serenity::Http, settings: &Settings, error: &Error) {
    tracing::error!(error = %error, "encountered an unhandled exception");

    deliver_report(http, settings, &render_report(error)).await;
}

/// Sends an already-rendered report to every configured owner as a file
/// attachment. No-op when owner reporting is disabled.
pub async fn deliver_report(http: &serenity::Http, settings: &Settings, report: &str) {
    if !settings.report_errors {
        return;
    }

    for owner_id in &settings.owner_ids {
        let Ok(owner) = http.get_user(serenity::UserId::new(*owner_id)).await else {
            continue;
        };

        let attachment =
            serenity::CreateAttachment::bytes(report.as_bytes().to_vec(), "error_report.txt");
        let _ = owner
            .direct_message(http, serenity::CreateMessage::new().add_file(attachment))
            .await;
    }
}

/// Renders an error and its cause chain as plain text.
pub fn render_report(error: &Error) -> String {
    let mut report = format!("error: {error}\n");

    let mut source = error.source();
    while let Some(cause) = source {
        report.push_str(&format!("caused by: {cause}\n"));
        source = cause.source();
    }

    report.push_str(&format!("\ndebug: {error:?}\n"));
    report
}

/// Classifies every framework error and decides what, if anything, the
/// invoking user gets to see. Expected noise (unknown commands, failed
/// checks) stays silent; handler blow-ups are reported and answered with
/// a generic apology; recognized usage errors get a tailored message.
/// Anything else is dropped deliberately.
pub async fn handle_framework_error(error: FrameworkError<'_, Data, Error>) {
    match error {
        // Non-command messages that happened to start with the prefix.
        FrameworkError::UnknownCommand { .. } => {}

        FrameworkError::CommandCheckFailed { .. } | FrameworkError::NotAnOwner { .. } => {}

        FrameworkError::Command { ctx, error, .. } => {
            report_error(&ctx.serenity_context().http, &ctx.data().settings, &error).await;
            send_error_reply(ctx, generic_failure_response()).await;
        }

        FrameworkError::CommandPanic { ctx, payload, .. } => {
            let error: Error = payload
                .unwrap_or_else(|| "command handler panicked".to_string())
                .into();
            report_error(&ctx.serenity_context().http, &ctx.data().settings, &error).await;
            send_error_reply(ctx, generic_failure_response()).await;
        }

        FrameworkError::ArgumentParse { ctx, input, error, .. } => {
            let response = match input {
                Some(input) => format!(
                    "I couldn't make sense of {}: {error}",
                    inline_code(input)
                ),
                None => format!("I couldn't read the arguments for that command: {error}"),
            };
            send_error_reply(ctx, response).await;
        }

        FrameworkError::SubcommandRequired { ctx, .. } => {
            send_error_reply(ctx, "That command only works with a subcommand.").await;
        }

        FrameworkError::CooldownHit { ctx, remaining_cooldown, .. } => {
            send_error_reply(
                ctx,
                format!(
                    "Easy there. Try again in {} second(s).",
                    remaining_cooldown.as_secs().max(1)
                ),
            )
            .await;
        }

        FrameworkError::MissingBotPermissions { ctx, missing_permissions, .. } => {
            send_error_reply(
                ctx,
                format!("I'm missing the {missing_permissions} permission(s) to do that."),
            )
            .await;
        }

        FrameworkError::MissingUserPermissions { ctx, missing_permissions, .. } => {
            let response = match missing_permissions {
                Some(missing) => format!("You need the {missing} permission(s) to do that."),
                None => "You don't have permission to do that.".to_string(),
            };
            send_error_reply(ctx, response).await;
        }

        FrameworkError::GuildOnly { ctx, .. } => {
            send_error_reply(ctx, "That command only works in a server.").await;
        }

        FrameworkError::DmOnly { ctx, .. } => {
            send_error_reply(ctx, "That command only works in direct messages.").await;
        }

        FrameworkError::NsfwOnly { ctx, .. } => {
            send_error_reply(ctx, "That command only works in age-restricted channels.").await;
        }

        // Failures inside event handlers have no requester to answer.
        FrameworkError::EventHandler { error, ctx, framework, .. } => {
            report_error(
                &ctx.http,
                &framework.user_data.settings,
                &error,
            )
            .await;
        }

        FrameworkError::Setup { error, .. } => {
            tracing::error!(error = %error, "client setup failed");
        }

        // Deliberate: unrecognized classes are not surfaced to the user.
        other => {
            tracing::debug!(error = %other, "dropping unrecognized framework error");
        }
    }
}

fn generic_failure_response() -> &'static str {
    let mut rng = rand::thread_rng();
    constants::UNHANDLED_RESPONSES
        .choose(&mut rng)
        .copied()
        .unwrap_or(constants::UNHANDLED_RESPONSES[0])
}

/// Error responses are framed with the fixed error accent, never the
/// guild's configured colour. Sending is best effort.
async fn send_error_reply(ctx: crate::Context<'_>, description: impl Into<String>) {
    let embed = serenity::CreateEmbed::new()
        .description(description.into())
        .colour(colors::ERROR);

    let _ = ctx.send(poise::CreateReply::default().embed(embed)).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("connection refused")
        }
    }

    impl std::error::Error for Inner {}

    #[derive(Debug)]
    struct Outer(Inner);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("storage lookup failed")
        }
    }

    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn render_report_includes_the_cause_chain() {
        let error: Error = Box::new(Outer(Inner));
        let report = render_report(&error);

        assert!(report.contains("error: storage lookup failed"));
        assert!(report.contains("caused by: connection refused"));
    }

    #[test]
    fn generic_failure_response_comes_from_the_pool() {
        let response = generic_failure_response();
        assert!(constants::UNHANDLED_RESPONSES.contains(&response));
    }
}
