use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;
use timehook_engine::{
    ApiSettings, RegistrationRequest, RunSettings, TransportSettings, DEFAULT_BASE_URL,
};
use timehook_logging::LogSettings;

#[derive(Parser, Debug)]
#[command(
    name = "timehook",
    version,
    about = "Schedule a delayed webhook with timehook.io and follow it to completion"
)]
pub struct Cli {
    /// Webhook URL
    #[arg(long, default_value = "https://httpstat.us/200")]
    pub url: String,

    /// Webhook body in JSON
    #[arg(long, default_value = r#"{"msg" : "from timehook client"}"#)]
    pub body: String,

    /// Delay in seconds
    #[arg(long, default_value_t = 5)]
    pub delay: u32,

    /// API key
    #[arg(long = "key", env = "TIMEHOOK_KEY", hide_env_values = true, hide = true)]
    pub key: Option<String>,

    /// Base URL of the timehook API
    #[arg(long, env = "TIMEHOOK_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Milliseconds between two state polls
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval_ms: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub request_timeout_secs: u64,

    /// Diagnostic log level written to stderr (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "off", value_parser = parse_level)]
    pub log_level: LevelFilter,

    /// Also write diagnostics to this file (implies at least info level)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// The credential, ignoring an empty variable.
    pub fn api_key(&self) -> Option<String> {
        self.key.clone().filter(|key| !key.is_empty())
    }

    pub fn registration(&self) -> RegistrationRequest {
        RegistrationRequest::new(self.url.clone(), self.body.clone(), self.delay)
    }

    pub fn api_settings(&self, api_key: String) -> ApiSettings {
        ApiSettings {
            base_url: self.api_url.clone(),
            api_key,
        }
    }

    pub fn transport_settings(&self) -> TransportSettings {
        TransportSettings {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..TransportSettings::default()
        }
    }

    pub fn run_settings(&self) -> RunSettings {
        RunSettings {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    pub fn log_settings(&self) -> LogSettings {
        let level = match (&self.log_file, self.log_level) {
            (Some(_), LevelFilter::Off) => LevelFilter::Info,
            (_, level) => level,
        };
        LogSettings {
            level,
            file: self.log_file.clone(),
        }
    }
}

fn parse_level(raw: &str) -> Result<LevelFilter, String> {
    raw.parse().map_err(|_| format!("unknown log level {raw:?}"))
}
