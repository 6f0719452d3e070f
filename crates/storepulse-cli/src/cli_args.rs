use std::path::PathBuf;

use clap::Parser;
use storepulse_gateway::{DEFAULT_DASHBOARD_PASSWORD, DEFAULT_DASHBOARD_USER};
use storepulse_hibot::{DEFAULT_HIBOT_BASE_URL, DEFAULT_HIBOT_CHANNEL_TYPE};
use storepulse_report::DEFAULT_DAILY_CAP;

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_port(value: &str) -> Result<u16, String> {
    let parsed = value
        .parse::<u16>()
        .map_err(|error| format!("failed to parse port: {error}"))?;
    if parsed == 0 {
        return Err("port must be in range 1..=65535".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Parser)]
#[command(
    name = "storepulse",
    about = "Retail conversation-activity dashboard backed by the Hibot messaging API",
    version
)]
/// Public struct `Cli` used across StorePulse components.
pub struct Cli {
    #[arg(
        long = "hibot-base-url",
        env = "HIBOT_BASE_URL",
        default_value = DEFAULT_HIBOT_BASE_URL,
        help = "Base URL of the upstream messaging API (login and conversations endpoints live below it)"
    )]
    pub hibot_base_url: String,

    #[arg(
        long = "hibot-app-id",
        env = "HIBOT_APP_ID",
        help = "Upstream application identifier used to obtain a bearer token"
    )]
    pub hibot_app_id: Option<String>,

    #[arg(
        long = "hibot-app-secret",
        env = "HIBOT_APP_SECRET",
        hide_env_values = true,
        help = "Upstream application secret used to obtain a bearer token"
    )]
    pub hibot_app_secret: Option<String>,

    #[arg(
        long = "hibot-channel-type",
        env = "HIBOT_CHANNEL_TYPE",
        default_value = DEFAULT_HIBOT_CHANNEL_TYPE,
        help = "Channel filter sent with every conversation fetch"
    )]
    pub hibot_channel_type: String,

    #[arg(
        long = "hibot-timeout-ms",
        env = "HIBOT_TIMEOUT_MS",
        default_value_t = 30_000,
        value_parser = parse_positive_u64,
        help = "Per-request upstream timeout in milliseconds (values below 1000 are raised to 1000)"
    )]
    pub hibot_timeout_ms: u64,

    #[arg(
        long = "dashboard-user",
        env = "DASHBOARD_USER",
        default_value = DEFAULT_DASHBOARD_USER,
        help = "Basic-auth username guarding the dashboard"
    )]
    pub dashboard_user: String,

    #[arg(
        long = "dashboard-pass",
        env = "DASHBOARD_PASS",
        default_value = DEFAULT_DASHBOARD_PASSWORD,
        hide_env_values = true,
        hide_default_value = true,
        help = "Basic-auth password guarding the dashboard"
    )]
    pub dashboard_pass: String,

    #[arg(
        long = "bind-host",
        env = "STOREPULSE_BIND_HOST",
        default_value = "0.0.0.0",
        help = "Host or IP address the dashboard server listens on"
    )]
    pub bind_host: String,

    #[arg(
        long,
        env = "PORT",
        default_value_t = 5001,
        value_parser = parse_port,
        help = "TCP port the dashboard server listens on"
    )]
    pub port: u16,

    #[arg(
        long = "static-dir",
        env = "STOREPULSE_STATIC_DIR",
        default_value = ".",
        help = "Directory containing the dashboard index.html"
    )]
    pub static_dir: PathBuf,

    #[arg(
        long = "report-timezone",
        env = "STOREPULSE_TIMEZONE",
        default_value = "UTC",
        help = "IANA timezone used for day bucketing, 'today', and the monthly fetch window"
    )]
    pub report_timezone: String,

    #[arg(
        long = "daily-cap",
        env = "STOREPULSE_DAILY_CAP",
        default_value_t = DEFAULT_DAILY_CAP,
        value_parser = parse_positive_u64,
        help = "Per-store daily outbound conversation cap shown in the agent table"
    )]
    pub daily_cap: u64,

    #[arg(
        long = "identity-overrides",
        env = "STOREPULSE_IDENTITY_OVERRIDES",
        help = "Optional JSON file of {name, store, role} entries replacing the built-in override table"
    )]
    pub identity_overrides: Option<PathBuf>,

    #[arg(
        long = "hidden-stores",
        env = "STOREPULSE_HIDDEN_STORES",
        value_delimiter = ',',
        help = "Comma-separated store buckets hidden from the store filter and agent table"
    )]
    pub hidden_stores: Vec<String>,
}
