use crate::assembler;
use crate::config::FlagValues;
use crate::engine::{Engine, EngineGuard};
use crate::error::{LaunchError, ParseError, PluginError};
use crate::overlay::{self, OptionSet};
use crate::proxy::ProxyConfig;
use std::future::Future;
use tracing::{debug, info};

/// Merge the decoded overlay onto `flags` and build the engine configuration.
///
/// A missing overlay variable is not an error; any other decoding failure is.
pub fn prepare(
    flags: FlagValues,
    overlay: Result<OptionSet, ParseError>,
) -> Result<ProxyConfig, PluginError> {
    let flags = match overlay {
        Ok(options) => {
            debug!("Applying {} plugin option(s) from environment", options.len());
            overlay::apply(flags, &options)
        }
        Err(ParseError::Missing { var }) => {
            debug!("{} not set, using command-line flags only", var);
            flags
        }
        Err(e) => return Err(e.into()),
    };

    if flags.vpn {
        info!("VPN mode requested; socket protection is left to the engine host");
    }

    Ok(assembler::generate(&flags)?)
}

/// Start `engine` and run it until a termination signal arrives.
pub async fn launch<E: Engine>(engine: E) -> Result<(), LaunchError> {
    launch_until(engine, shutdown_signal()).await
}

/// Start `engine` and run it until `shutdown` completes.
///
/// The engine is closed on the way out, including when `shutdown` fails.
/// A start failure is returned without closing.
pub async fn launch_until<E, F>(mut engine: E, shutdown: F) -> Result<(), LaunchError>
where
    E: Engine,
    F: Future<Output = std::io::Result<()>>,
{
    engine.start()?;
    let guard = EngineGuard::new(engine);
    info!("Engine started. Waiting for termination signal.");

    shutdown.await?;

    info!("Shutdown signal received, closing engine...");
    drop(guard);
    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
