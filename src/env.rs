pub const DEFAULT_DATABASE_URL: &str = "sqlite://eventide.db";
pub const DEFAULT_PREFIX: &str = "?";

type EnvError = Box<dyn std::error::Error + Send + Sync>;
type EnvResult<T> = Result<T, EnvError>;

/// Read-only runtime configuration, resolved once at startup.
#[derive(Clone, Debug)]
pub struct Settings {
    pub default_prefix: String,
    pub report_errors: bool,
    pub prefix_on_mention: bool,
    pub owner_ids: Vec<u64>,
}

impl Settings {
    pub fn from_env() -> EnvResult<Self> {
        Ok(Self {
            default_prefix: default_prefix()?,
            report_errors: report_errors()?,
            prefix_on_mention: prefix_on_mention()?,
            owner_ids: owner_ids()?,
        })
    }
}

/// Gets the Discord bot token from environment
pub fn discord_token() -> EnvResult<String> {
    dotenvy::var("DISCORD_TOKEN").map_err(|e| Box::new(e) as EnvError)
}

/// Gets the database URL from environment
pub fn database_url() -> EnvResult<Option<String>> {
    match dotenvy::var("DATABASE_URL") {
        Ok(value) => Ok(Some(value)),
        Err(dotenvy::Error::EnvVar(std::env::VarError::NotPresent)) => Ok(None),
        Err(e) => Err(Box::new(e) as EnvError),
    }
}

/// Command prefix used until a guild configures its own
pub fn default_prefix() -> EnvResult<String> {
    match dotenvy::var("EVENTIDE_DEFAULT_PREFIX") {
        Ok(value) => Ok(value),
        Err(dotenvy::Error::EnvVar(std::env::VarError::NotPresent)) => {
            Ok(DEFAULT_PREFIX.to_string())
        }
        Err(e) => Err(Box::new(e) as EnvError),
    }
}

/// Whether unhandled errors are forwarded to the owners via direct message
pub fn report_errors() -> EnvResult<bool> {
    bool_var("EVENTIDE_REPORT_ERRORS", true)
}

/// Whether a bare mention of the bot is answered with the current prefix
pub fn prefix_on_mention() -> EnvResult<bool> {
    bool_var("EVENTIDE_PREFIX_ON_MENTION", true)
}

/// Comma-separated list of Discord user IDs that receive error reports
pub fn owner_ids() -> EnvResult<Vec<u64>> {
    match dotenvy::var("EVENTIDE_OWNER_IDS") {
        Ok(value) => {
            let mut ids = Vec::new();
            for raw in value.split(',') {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    continue;
                }

                let parsed: u64 = trimmed.parse().map_err(|err| Box::new(err) as EnvError)?;
                ids.push(parsed);
            }
            Ok(ids)
        }
        Err(dotenvy::Error::EnvVar(std::env::VarError::NotPresent)) => Ok(Vec::new()),
        Err(e) => Err(Box::new(e) as EnvError),
    }
}

fn bool_var(name: &str, default: bool) -> EnvResult<bool> {
    match dotenvy::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|err| Box::new(err) as EnvError),
        Err(dotenvy::Error::EnvVar(std::env::VarError::NotPresent)) => Ok(default),
        Err(e) => Err(Box::new(e) as EnvError),
    }
}
