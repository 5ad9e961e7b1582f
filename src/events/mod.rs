use crate::{Data, Error};
use poise::{self, BoxFuture, serenity_prelude as serenity};

pub mod guild;
pub mod mention;

pub type EventHandler = for<'a> fn(
    &'a serenity::Context,
    &'a serenity::FullEvent,
    poise::FrameworkContext<'a, Data, Error>,
    &'a Data,
) -> BoxFuture<'a, Result<(), Error>>;

/// Returns the list of registered event handlers
pub fn load_all() -> &'static [EventHandler] {
    &[mention::event_handler, guild::event_handler]
}

/// Dispatches the incoming event to every registered handler in order.
/// A handler error surfaces as a framework event-handler error and ends
/// up in the error reporter; there is no user to answer for most events.
pub fn dispatch<'a>(
    ctx: &'a serenity::Context,
    event: &'a serenity::FullEvent,
    framework: poise::FrameworkContext<'a, Data, Error>,
    data: &'a Data,
) -> BoxFuture<'a, Result<(), Error>> {
    Box::pin(async move {
        for handler in load_all() {
            handler(ctx, event, framework, data).await?;
        }
        Ok(())
    })
}
