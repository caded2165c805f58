use anyhow::{Context, Result};
use tracing::{error, info};
use tunnel_plugin::app;
use tunnel_plugin::cli::Cli;
use tunnel_plugin::config::FlagValues;
use tunnel_plugin::engine::DryRunEngine;
use tunnel_plugin::error::PluginError;
use tunnel_plugin::logging;
use tunnel_plugin::overlay::{self, PLUGIN_OPTIONS_VAR};

#[tokio::main]
async fn main() -> Result<()> {
    let flags = FlagValues::from(Cli::parse_args());

    logging::init_logging(flags.log_level()).context("Failed to initialize logging system")?;

    info!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = match app::prepare(flags, overlay::from_env(PLUGIN_OPTIONS_VAR)) {
        Ok(config) => config,
        Err(e) => {
            // Configuration error. Exit with a dedicated code so supervisors do not restart.
            error!("{}", e);
            std::process::exit(e.exit_code());
        }
    };

    let engine = DryRunEngine::stdout(config);
    if let Err(e) = app::launch(engine).await {
        let e = PluginError::from(e);
        error!("{}", e);
        std::process::exit(e.exit_code());
    }

    info!("Shutdown complete");
    Ok(())
}
