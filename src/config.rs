use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_FEEDBACK_DELAY_MS: u64 = 1500;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("BOT_TOKEN is not set")]
    MissingToken,
    #[error("{name} must be a number of milliseconds, got {value:?}")]
    InvalidDelay { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    /// Question bank to use instead of the bundled one
    pub questions_path: Option<PathBuf>,
    /// Pause between answer feedback and the next question
    pub feedback_delay: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup("BOT_TOKEN")
            .or_else(|| lookup("TELOXIDE_TOKEN"))
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let questions_path = lookup("QUESTIONS_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let feedback_delay = match lookup("FEEDBACK_DELAY_MS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidDelay {
                    name: "FEEDBACK_DELAY_MS",
                    value,
                })?,
            None => DEFAULT_FEEDBACK_DELAY_MS,
        };

        Ok(Self {
            bot_token,
            questions_path,
            feedback_delay: Duration::from_millis(feedback_delay),
        })
    }
}
