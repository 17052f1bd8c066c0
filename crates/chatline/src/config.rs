//! Runtime settings.
//!
//! Settings are read from the process environment first and from a `.env`
//! file in the working directory second. The file is never written back
//! into the environment.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display};
use std::path::Path;
use std::{env, fs};

use chatline_openai_model::{OpenAIConfig, OpenAIConfigBuilder};

/// Variable holding the model API key. Required.
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
/// Variable overriding the model name.
pub const MODEL_VAR: &str = "CHATLINE_MODEL";
/// Variable overriding the endpoint base URL.
pub const BASE_URL_VAR: &str = "CHATLINE_BASE_URL";

/// The model used when [`MODEL_VAR`] is not set.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
/// Gemini's OpenAI-compatible endpoint.
pub const DEFAULT_BASE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai";

const DOTENV_FILE: &str = ".env";

/// Settings needed to reach the model.
#[derive(Clone)]
pub struct Settings {
    api_key: String,
    model: String,
    base_url: String,
}

impl Settings {
    /// Loads settings from the process environment, falling back to the
    /// `.env` file in the working directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_then(read_dotenv(Path::new(DOTENV_FILE))))
    }

    /// Loads settings through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = get(API_KEY_VAR).ok_or(ConfigError::MissingApiKey {
            var: API_KEY_VAR,
        })?;
        let model = get(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_owned());
        let base_url =
            get(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());

        Ok(Self {
            api_key,
            model,
            base_url,
        })
    }

    /// Returns the model name.
    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the endpoint base URL.
    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the provider configuration for these settings.
    pub fn openai_config(&self) -> OpenAIConfig {
        OpenAIConfigBuilder::with_api_key(&self.api_key)
            .with_model(&self.model)
            .with_base_url(&self.base_url)
            .build()
    }
}

impl Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Errors raised while loading [`Settings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The API key is neither in the environment nor in `.env`.
    MissingApiKey {
        /// Name of the variable that was looked up.
        var: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingApiKey { var } => write!(
                f,
                "{var} is not set; export it or add it to {DOTENV_FILE}"
            ),
        }
    }
}

impl StdError for ConfigError {}

/// Looks a variable up in the process environment, then in `dotenv`.
fn env_then(
    dotenv: HashMap<String, String>,
) -> impl Fn(&str) -> Option<String> {
    move |key| env::var(key).ok().or_else(|| dotenv.get(key).cloned())
}

fn read_dotenv(path: &Path) -> HashMap<String, String> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            debug!("loaded settings from {}", path.display());
            parse_dotenv(&contents)
        }
        Err(_) => HashMap::new(),
    }
}

/// Parses `KEY=value` lines. Blank lines and `#` comments are skipped, an
/// optional `export ` prefix is accepted and matching quotes around the
/// value are removed.
fn parse_dotenv(contents: &str) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        vars.insert(key.to_owned(), unquote(value.trim()).to_owned());
    }
    vars
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
