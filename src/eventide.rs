use crate::cache::GuildConfigCache;
use crate::commands::{self, ExtensionFailure};
use crate::env::Settings;
use crate::{errors, events};
use poise::serenity_prelude as serenity;
use serenity::prelude::TypeMapKey;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;

/// How long an edited message keeps re-entering command resolution.
const EDIT_TRACKING_WINDOW: Duration = Duration::from_secs(3600);

pub fn gateway_intents() -> serenity::GatewayIntents {
    serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT
}

/// Shared state handed to every command and event handler.
pub struct Data {
    pub settings: Settings,
    pub shard_manager: Arc<serenity::ShardManager>,
    pub database: SqlitePool,
    pub guild_cache: GuildConfigCache,
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

struct ShardManagerContainer;

impl TypeMapKey for ShardManagerContainer {
    type Value = Arc<serenity::ShardManager>;
}

/// Builds the Poise framework. Extensions load here, strictly before
/// any gateway connection exists, so no event can reach an unregistered
/// handler set.
pub fn build_framework(settings: Settings, database: SqlitePool) -> poise::Framework<Data, Error> {
    let (commands, failures) = commands::load_all();

    poise::Framework::builder()
        .options(framework_options(commands, &settings))
        .setup(move |ctx, ready, framework| {
            let settings = settings.clone();
            let database = database.clone();
            let failures = failures.clone();
            Box::pin(async move {
                setup_framework(ctx, ready, framework, settings, database, failures).await
            })
        })
        .build()
}

pub async fn run_client(
    token: String,
    intents: serenity::GatewayIntents,
    framework: poise::Framework<Data, Error>,
    database: SqlitePool,
) -> Result<(), Error> {
    let mut client = serenity::Client::builder(token, intents)
        .framework(framework)
        .await?;

    {
        let mut data = client.data.write().await;
        data.insert::<ShardManagerContainer>(client.shard_manager.clone());
    }

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutting down");
            shard_manager.shutdown_all().await;
        }
    });

    client.start_autosharded().await?;

    // The gateway is fully closed once start returns. In-flight handlers
    // may still hold pool connections; close() waits for them to drain
    // before releasing the storage layer.
    database.close().await;

    Ok(())
}

fn framework_options(
    commands: Vec<poise::Command<Data, Error>>,
    settings: &Settings,
) -> poise::FrameworkOptions<Data, Error> {
    poise::FrameworkOptions {
        commands,
        prefix_options: prefix_options(),
        owners: settings
            .owner_ids
            .iter()
            .copied()
            .map(serenity::UserId::new)
            .collect(),
        on_error: |error| Box::pin(errors::handle_framework_error(error)),
        post_command: |ctx| {
            Box::pin(async move {
                tracing::info!(
                    command = %ctx.command().qualified_name,
                    "command executed successfully"
                );
            })
        },
        event_handler: events::dispatch,
        ..Default::default()
    }
}

/// Commands are always invocable by mentioning the bot; the string
/// prefix is resolved per guild through the cache. Edits re-enter
/// command resolution, so fixing a typo re-runs a command — and editing
/// a message whose command already succeeded runs it a second time.
fn prefix_options() -> poise::PrefixFrameworkOptions<Data, Error> {
    poise::PrefixFrameworkOptions {
        dynamic_prefix: Some(resolve_prefix),
        mention_as_prefix: true,
        edit_tracker: Some(Arc::new(poise::EditTracker::for_timespan(
            EDIT_TRACKING_WINDOW,
        ))),
        execute_untracked_edits: true,
        ..Default::default()
    }
}

fn resolve_prefix(
    ctx: poise::PartialContext<'_, Data, Error>,
) -> poise::BoxFuture<'_, Result<Option<String>, Error>> {
    Box::pin(async move {
        let data = ctx.framework.user_data;
        Ok(Some(data.guild_cache.string_prefix(ctx.guild_id).await))
    })
}

async fn setup_framework(
    ctx: &serenity::Context,
    ready: &serenity::Ready,
    framework: &poise::Framework<Data, Error>,
    settings: Settings,
    database: SqlitePool,
    failures: Vec<ExtensionFailure>,
) -> Result<Data, Error> {
    register_commands(ctx, framework).await?;
    let shard_manager = extract_shard_manager(ctx).await;

    tracing::info!(user = %ready.user.name, id = ready.user.id.get(), "logged in");

    // Extension load failures predate the gateway; deliver them now that
    // the owners are reachable.
    for failure in &failures {
        tracing::warn!(extension = failure.name, "delivering deferred load report");
        errors::deliver_report(&ctx.http, &settings, &failure.report).await;
    }

    let guild_cache = GuildConfigCache::new(settings.default_prefix.clone());

    Ok(Data {
        settings,
        shard_manager,
        database,
        guild_cache,
    })
}

async fn register_commands(
    ctx: &serenity::Context,
    framework: &poise::Framework<Data, Error>,
) -> Result<(), Error> {
    poise::builtins::register_globally(ctx, &framework.options().commands).await?;
    Ok(())
}

async fn extract_shard_manager(ctx: &serenity::Context) -> Arc<serenity::ShardManager> {
    let data = ctx.data.read().await;
    data.get::<ShardManagerContainer>()
        .cloned()
        .expect("Shard manager missing from TypeMap")
}
