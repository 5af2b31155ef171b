//! Telegram bot.
//!
//! The bot is a thin client: it turns chat commands into engine requests and
//! sends back the confirmation text and the QR image.

use engine::Engine;
use teloxide::prelude::*;

mod commands;
mod handlers;

#[derive(Clone)]
pub struct ConfigParameters {
    allowed_users: Option<Vec<UserId>>,
    bot_username: Option<String>,
    engine: Engine,
}

pub struct Bot {
    token: String,
    allowed_users: Option<Vec<UserId>>,
    engine: Engine,
}

impl Bot {
    pub fn new(
        token: &str,
        allowed_users: Option<Vec<UserId>>,
        engine: Engine,
    ) -> Result<Self, String> {
        if token.trim().is_empty() {
            return Err("missing telegram bot token".to_string());
        }

        Ok(Self {
            token: token.to_string(),
            allowed_users,
            engine,
        })
    }

    pub fn builder() -> BotBuilder {
        BotBuilder::default()
    }

    pub async fn run(&self) {
        tracing::info!("Starting telegram bot...");

        let bot = teloxide::Bot::new(&self.token);
        if let Err(err) = bot.set_my_commands(commands::bot_commands()).await {
            tracing::warn!("failed to register bot commands: {err}");
        }
        let bot_username = match bot.get_me().await {
            Ok(me) => me.user.username,
            Err(err) => {
                tracing::warn!("failed to fetch bot username, accepting any @mention: {err}");
                None
            }
        };

        let parameters = ConfigParameters {
            allowed_users: self.allowed_users.clone(),
            bot_username,
            engine: self.engine.clone(),
        };

        let handler =
            dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

        tracing::info!(
            "Telegram bot started, banks from {}",
            self.engine.registry_path().display()
        );
        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![parameters])
            .default_handler(|upd| async move {
                tracing::trace!("Unhandled update: {:?}", upd);
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}

#[derive(Default, Debug)]
pub struct BotBuilder {
    token: String,
    allowed_users: Option<Vec<UserId>>,
    engine: Option<Engine>,
}

impl BotBuilder {
    pub fn token(mut self, token: &str) -> BotBuilder {
        self.token = token.to_string();
        self
    }

    /// Telegram user ids allowed to use the bot. Empty means everyone.
    pub fn allowed_users(mut self, allowed_users: impl IntoIterator<Item = u64>) -> BotBuilder {
        let allowed_users: Vec<UserId> = allowed_users.into_iter().map(UserId).collect();
        if !allowed_users.is_empty() {
            self.allowed_users = Some(allowed_users);
        }
        self
    }

    pub fn engine(mut self, engine: Engine) -> BotBuilder {
        self.engine = Some(engine);
        self
    }

    pub fn build(self) -> Result<Bot, String> {
        tracing::info!("Initializing telegram bot...");
        let engine = self
            .engine
            .ok_or_else(|| "telegram bot needs an engine".to_string())?;
        Bot::new(&self.token, self.allowed_users, engine)
    }
}
