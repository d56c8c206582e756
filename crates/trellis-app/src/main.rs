mod cli;
mod session;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;
use trellis_common::TrellisError;
use trellis_config::{toml_loader, validation, TrellisConfig};
use trellis_layout::{SharedWorkspace, Workspace};
use trellis_ui::TokioScheduler;

use session::{default_workspace, Session};

fn load_config(args: &cli::Args) -> Result<TrellisConfig, TrellisError> {
    match &args.config {
        Some(path) => {
            let config = toml_loader::load_from_path(path)?;
            validation::validate(&config)?;
            Ok(config)
        }
        None => Ok(trellis_config::load_config()?),
    }
}

fn load_workspace(args: &cli::Args) -> Result<SharedWorkspace, TrellisError> {
    let workspace = match &args.layout {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            Workspace::from_json(&json).map_err(|e| {
                TrellisError::Other(format!("invalid layout {}: {e}", path.display()))
            })?
        }
        None => default_workspace(),
    };
    Ok(workspace.into_shared())
}

/// `--log-level` accepts either a bare level or a full filter directive.
fn log_directive(flag: Option<&str>, config: &TrellisConfig) -> String {
    match flag {
        Some(flag) if flag.contains('=') => flag.to_string(),
        Some(level) => format!("trellis={level}"),
        None => format!("trellis={}", config.logging.level.as_filter_str()),
    }
}

async fn run(args: cli::Args, config: TrellisConfig) -> Result<(), TrellisError> {
    let domain = load_workspace(&args)?;
    let scheduler = TokioScheduler::from_current()
        .ok_or_else(|| TrellisError::Other("no tokio runtime".into()))?;
    let settle = config.toast.duration() + Duration::from_millis(100);

    let session = Session::start(config, domain, Arc::new(scheduler))?;
    session.finish_loading();
    if let Some(pane_id) = session.cycle_active_stack()? {
        tracing::info!(pane_id = %pane_id, "cycled stacked pane");
    }

    tokio::time::sleep(settle).await;
    println!(
        "{}",
        serde_json::to_string_pretty(&session.summary())
            .map_err(|e| TrellisError::Other(e.to_string()))?
    );
    session.shutdown();
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = cli::parse();

    let (config, config_error) = match load_config(&args) {
        Ok(config) => (config, None),
        Err(e) => (TrellisConfig::default(), Some(e)),
    };

    let directive = log_directive(args.log_level.as_deref(), &config);
    let filter = EnvFilter::from_default_env()
        .add_directive(directive.parse().unwrap_or_else(|_| LevelFilter::INFO.into()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Trellis v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(e) = config_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    if args.print_config {
        println!("{}", trellis_config::config_to_json(&config));
        return;
    }

    if let Err(e) = run(args, config).await {
        tracing::error!("Session failed: {e}");
        std::process::exit(1);
    }
    tracing::info!("Shutdown complete");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_directive_prefers_flag() {
        let config = TrellisConfig::default();
        assert_eq!(log_directive(None, &config), "trellis=info");
        assert_eq!(log_directive(Some("debug"), &config), "trellis=debug");
        assert_eq!(
            log_directive(Some("trellis_layout=trace"), &config),
            "trellis_layout=trace"
        );
    }
}
