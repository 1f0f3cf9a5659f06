//! Runtime configuration for chat-relay.
//!
//! Every knob is a CLI flag that can also be supplied through the process
//! environment (optionally via a `.env` file loaded before parsing).

use std::fmt;

use clap::Parser;

/// Model used when neither the request nor the environment names one.
pub const FALLBACK_MODEL: &str = "gpt-4.1-mini";

/// Root of the upstream OpenAI-compatible API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "chat-relay",
    version,
    about = "Streaming relay for developer/user chat completions"
)]
pub struct Cli {
    /// HTTP listen address.
    #[arg(long, env = "RELAY_LISTEN", default_value = "0.0.0.0:8000")]
    pub listen: String,

    /// Upstream API credential.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Default model when a request does not name one.
    #[arg(long, env = "OPENAI_MODEL")]
    pub model: Option<String>,

    /// Base URL of the upstream API.
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, env = "RELAY_LOG_JSON")]
    pub log_json: bool,
}

/// Per-process settings consulted by the chat handler.
///
/// Values are trimmed and blank ones normalised to `None`, so an
/// exported-but-blank variable behaves like an unset one.
#[derive(Clone, Default)]
pub struct RelaySettings {
    api_key: Option<String>,
    default_model: Option<String>,
}

impl RelaySettings {
    pub fn new(api_key: Option<String>, default_model: Option<String>) -> Self {
        Self {
            api_key: non_empty(api_key),
            default_model: non_empty(default_model),
        }
    }

    pub fn from_cli(cli: &Cli) -> Self {
        Self::new(cli.api_key.clone(), cli.model.clone())
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn default_model(&self) -> Option<&str> {
        self.default_model.as_deref()
    }

    /// Model to send upstream for a request that asked for `requested`.
    pub fn resolve_model(&self, requested: Option<&str>) -> String {
        resolve_model(requested, self.default_model())
    }
}

impl fmt::Debug for RelaySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelaySettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("default_model", &self.default_model)
            .finish()
    }
}

/// Request > environment > [`FALLBACK_MODEL`]. Values are trimmed; blank
/// ones count as absent.
pub fn resolve_model(requested: Option<&str>, env_default: Option<&str>) -> String {
    trimmed(requested)
        .or(trimmed(env_default))
        .unwrap_or(FALLBACK_MODEL)
        .to_string()
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    trimmed(value.as_deref()).map(str::to_string)
}
