/*

Copyright 2025 Lealt

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.

*/

use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

mod cache;
mod commands;
mod constants;
mod database;
mod env;
mod errors;
mod eventide;
mod events;
mod functions;

pub use eventide::{Context, Data, Error};

#[tokio::main]
async fn main() -> Result<(), eventide::Error> {
    dotenv().ok();
    init_tracing();

    let token = env::discord_token()?;
    let settings = env::Settings::from_env()?;
    let intents = eventide::gateway_intents();
    let database = database::connect()
        .await
        .map_err(|err| -> eventide::Error { Box::new(err) })?;

    let framework = eventide::build_framework(settings, database.clone());
    eventide::run_client(token, intents, framework, database).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
