//! Wellora CLI server
//!
//! Headless meal-logging backend suitable for deployment as a systemd
//! service, container or standalone process.
//!
//! ```sh
//! # Run with default config (~/.config/wellora/config.toml)
//! wellora
//!
//! # Custom config path
//! wellora --config /etc/wellora/config.toml
//!
//! # Override the port
//! wellora --api-port 9090
//!
//! # Validate config without starting
//! wellora --check
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{error, info};

use wellora::config::{AppConfig, ConfigError};
use wellora::server::{init_tracing, ServerHandle, ServerOptions};

/// Wellora: meal logging and nutrition analytics.
#[derive(Parser, Debug)]
#[command(
    name = "wellora",
    version,
    about = "Meal logging and nutrition analytics backend",
    long_about = "Wellora REST API server for logging meals against a food catalog \
                  and computing cached daily / weekly nutrition analytics.\n\n\
                  Default config: ~/.config/wellora/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "WELLORA_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the default admin user.
    #[arg(long)]
    no_admin: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(wellora::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);

    match &load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            if !cli.check {
                error!("Using default configuration.");
            }
        }
    }

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.api_port {
        info!("CLI override: api_port = {}", port);
        config.server.api_port = port;
    }
    if let Some(ref level) = cli.log_level {
        info!("CLI override: log_level = {}", level);
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        return match check_config(&config_path, &config, load_error.as_ref()) {
            Ok(summary) => {
                println!("{}", summary);
                Ok(())
            }
            Err(message) => {
                eprintln!("❌ {}", message);
                Err(message.into())
            }
        };
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_admin: !cli.no_admin,
    })
    .await?;

    handle.install_signal_handler();
    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}

/// Outcome of `--check`: the summary to print, or why the file was rejected.
fn check_config(
    path: &Path,
    config: &AppConfig,
    load_error: Option<&ConfigError>,
) -> Result<String, String> {
    if let Some(e) = load_error {
        return Err(format!(
            "Configuration is invalid: {}: {}",
            path.display(),
            e
        ));
    }
    let rate_limit = if config.rate_limit.enabled {
        format!(
            "{} writes / {}s",
            config.rate_limit.max_requests, config.rate_limit.window_seconds
        )
    } else {
        "disabled".to_string()
    };
    let summary = [
        "✅ Configuration is valid".to_string(),
        format!("   Config file : {}", path.display()),
        format!(
            "   API address : {}:{}",
            config.server.api_host, config.server.api_port
        ),
        format!("   Database    : {}", config.database.url),
        format!("   Log level   : {}", config.logging.level),
        format!("   Cache TTL   : {}s", config.cache.ttl_seconds),
        format!("   Rate limit  : {}", rate_limit),
    ]
    .join("\n");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "wellora-cli-{}-{}.toml",
            name,
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn run_check(path: &Path) -> Result<String, String> {
        match AppConfig::load(path) {
            Ok(config) => check_config(path, &config, None),
            Err(e) => check_config(path, &AppConfig::default(), Some(&e)),
        }
    }

    #[test]
    fn check_rejects_unparseable_config() {
        let path = write_config("broken", "server = [broken");
        let err = run_check(&path).unwrap_err();
        assert!(err.starts_with("Configuration is invalid"));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn check_summarises_loaded_config() {
        let path = write_config(
            "ok",
            "[server]\napi_port = 9090\n\n[rate_limit]\nenabled = false\n",
        );

        let summary = run_check(&path).unwrap();
        assert!(summary.starts_with("✅ Configuration is valid"));
        assert!(summary.contains(":9090"));
        assert!(summary.contains("Rate limit  : disabled"));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn check_rejects_missing_file() {
        let path = std::env::temp_dir().join("wellora-cli-does-not-exist.toml");
        assert!(run_check(&path).is_err());
    }
}
