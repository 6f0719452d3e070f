//! Cli -> runtime configuration wiring and server start.

use std::sync::Arc;

use anyhow::{Context, Result};
use storepulse_core::parse_report_timezone;
use storepulse_gateway::{run_dashboard_server, DashboardCredentials, DashboardServerConfig};
use storepulse_hibot::{HibotClient, HibotConfig};
use storepulse_report::IdentityOverrideTable;

use crate::Cli;

#[derive(Debug, Clone)]
/// Fully validated configuration for one server process.
pub struct StartupConfig {
    pub hibot: HibotConfig,
    pub dashboard: DashboardServerConfig,
}

pub fn build_startup_config(cli: &Cli) -> Result<StartupConfig> {
    let timezone = parse_report_timezone(&cli.report_timezone)
        .with_context(|| format!("invalid --report-timezone '{}'", cli.report_timezone))?;

    let identity_overrides = match cli.identity_overrides.as_deref() {
        Some(path) => IdentityOverrideTable::load(path).with_context(|| {
            format!("failed to load --identity-overrides '{}'", path.display())
        })?,
        None => IdentityOverrideTable::builtin(),
    };
    if identity_overrides.is_empty() {
        tracing::warn!("identity override table is empty; only the naming pattern applies");
    }

    let hidden_stores = cli
        .hidden_stores
        .iter()
        .map(|store| store.trim())
        .filter(|store| !store.is_empty())
        .map(str::to_string)
        .collect();

    let hibot = HibotConfig {
        base_url: cli.hibot_base_url.trim().to_string(),
        app_id: cli.hibot_app_id.clone(),
        app_secret: cli.hibot_app_secret.clone(),
        channel_type: cli.hibot_channel_type.clone(),
        request_timeout_ms: cli.hibot_timeout_ms,
    };

    let dashboard = DashboardServerConfig {
        bind: bind_address(&cli.bind_host, cli.port),
        credentials: DashboardCredentials {
            username: cli.dashboard_user.clone(),
            password: cli.dashboard_pass.clone(),
        },
        static_dir: cli.static_dir.clone(),
        timezone,
        daily_cap: cli.daily_cap,
        hidden_stores,
        identity_overrides,
    };

    Ok(StartupConfig { hibot, dashboard })
}

fn bind_address(host: &str, port: u16) -> String {
    let host = host.trim();
    if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

pub async fn run_storepulse(cli: Cli) -> Result<()> {
    let StartupConfig { hibot, dashboard } = build_startup_config(&cli)?;
    let client = HibotClient::new(hibot).context("failed to build upstream http client")?;
    if !client.has_credentials() {
        tracing::warn!(
            "HIBOT_APP_ID/HIBOT_APP_SECRET not set; report requests will fail until configured"
        );
    }
    run_dashboard_server(dashboard, Arc::new(client)).await
}

#[cfg(test)]
mod tests {
    use super::{bind_address, build_startup_config};
    use crate::Cli;
    use clap::Parser;
    use std::path::PathBuf;
    use storepulse_report::RoleCode;
    use tempfile::tempdir;

    fn parse_cli(args: &[&str]) -> Cli {
        let mut owned = vec!["storepulse"];
        owned.extend_from_slice(args);
        Cli::try_parse_from(owned).expect("cli should parse")
    }

    #[test]
    fn unit_bind_address_brackets_ipv6_hosts() {
        assert_eq!(bind_address("0.0.0.0", 5001), "0.0.0.0:5001");
        assert_eq!(bind_address("::1", 8080), "[::1]:8080");
        assert_eq!(bind_address("[::1]", 8080), "[::1]:8080");
    }

    #[test]
    fn functional_startup_config_maps_cli_flags() {
        let cli = parse_cli(&[
            "--hibot-base-url",
            "http://127.0.0.1:9000/api ",
            "--hibot-app-id",
            "app",
            "--hibot-app-secret",
            "secret",
            "--hibot-timeout-ms",
            "5000",
            "--dashboard-user",
            "ops",
            "--dashboard-pass",
            "s3cret",
            "--bind-host",
            "127.0.0.1",
            "--port",
            "9090",
            "--static-dir",
            "/srv/storepulse",
            "--report-timezone",
            "America/Santiago",
            "--daily-cap",
            "40",
            "--hidden-stores",
            " Jefe de Venta , ,Canal Digital",
        ]);
        let config = build_startup_config(&cli).expect("config should build");

        assert_eq!(config.hibot.base_url, "http://127.0.0.1:9000/api");
        assert_eq!(config.hibot.app_id.as_deref(), Some("app"));
        assert_eq!(config.hibot.request_timeout_ms, 5000);
        assert_eq!(config.dashboard.bind, "127.0.0.1:9090");
        assert_eq!(config.dashboard.credentials.username, "ops");
        assert!(!config.dashboard.credentials.uses_default_password());
        assert_eq!(config.dashboard.static_dir, PathBuf::from("/srv/storepulse"));
        assert_eq!(config.dashboard.timezone, chrono_tz::America::Santiago);
        assert_eq!(config.dashboard.daily_cap, 40);
        assert_eq!(
            config.dashboard.hidden_stores,
            vec!["Jefe de Venta".to_string(), "Canal Digital".to_string()]
        );
        assert_eq!(config.dashboard.identity_overrides.len(), 4);
    }

    #[test]
    fn regression_startup_config_rejects_unknown_timezone() {
        let cli = parse_cli(&["--report-timezone", "Mars/Olympus_Mons"]);
        let error = build_startup_config(&cli).expect_err("unknown timezone must fail");
        assert!(error.to_string().contains("--report-timezone"));
    }

    #[test]
    fn functional_startup_config_loads_override_file() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("overrides.json");
        std::fs::write(
            &path,
            r#"[{"name": "Lucia", "store": "Canal Digital", "role": "SUP"}]"#,
        )
        .expect("write overrides");
        let cli = parse_cli(&["--identity-overrides", path.to_str().expect("utf8 path")]);
        let config = build_startup_config(&cli).expect("config should build");

        let table = &config.dashboard.identity_overrides;
        assert_eq!(table.len(), 1);
        let entry = table.lookup(" lucia ").expect("override present");
        assert_eq!(entry.store, "Canal Digital");
        assert_eq!(entry.role, RoleCode::Supervisor);
        assert!(table.lookup("Camila").is_none());
    }

    #[test]
    fn functional_startup_config_accepts_empty_override_file() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("overrides.json");
        std::fs::write(&path, "[]").expect("write overrides");
        let cli = parse_cli(&["--identity-overrides", path.to_str().expect("utf8 path")]);
        let config = build_startup_config(&cli).expect("config should build");
        assert!(config.dashboard.identity_overrides.is_empty());
        assert!(config.dashboard.identity_overrides.lookup("Camila").is_none());
    }

    #[test]
    fn regression_startup_config_reports_malformed_override_file() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("overrides.json");
        std::fs::write(&path, r#"{"name": "Lucia"}"#).expect("write overrides");
        let cli = parse_cli(&["--identity-overrides", path.to_str().expect("utf8 path")]);
        let error = build_startup_config(&cli).expect_err("malformed file must fail");
        assert!(error.to_string().contains("--identity-overrides"));
    }
}
